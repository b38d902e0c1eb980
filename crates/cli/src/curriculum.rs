//! Default curriculum: the first- and second-year courses the grade model
//! takes as input, grouped by semester

pub static SEMESTERS: [(&str, &[&str]); 4] = [
    (
        "Semester 1",
        &["I1100", "M1100", "M1101", "P1100", "P1101", "S1101", "PHYS100", "PHYS101"],
    ),
    (
        "Semester 2",
        &["I1101", "M1102", "M1103", "M1104", "M1105", "M1106", "M1107"],
    ),
    (
        "Semester 3",
        &["I2201", "I2202", "I2203", "I2204", "I2205", "S2250", "M2250", "M2251"],
    ),
    (
        "Semester 4",
        &["I2206", "I2207", "I2208", "I2209", "I2210", "I2211", "I2234"],
    ),
];

/// All curriculum courses in semester order
pub fn all_courses() -> impl Iterator<Item = &'static str> {
    SEMESTERS
        .iter()
        .flat_map(|(_, courses)| courses.iter().copied())
}
