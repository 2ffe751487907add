//! Metadata extraction for aerial footage.
//!
//! Probes video files for their technical properties and, when a companion
//! flight log sits next to the video, recovers the flight trajectory with
//! per-point camera settings and derived speed and heading.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extract;
pub mod flight;
pub mod geo;
pub mod telemetry;
pub mod utils;

pub use error::AppError;
