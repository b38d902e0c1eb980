//! Grade predictor HTTP service
//!
//! Serves a pre-trained grade regressor over HTTP. The binary wires
//! configuration, logging and model loading around the router defined here.

pub mod api;
pub mod config;
