pub mod builder;
pub mod kinematics;
pub mod model;

pub use builder::FlightBuilder;
pub use model::{FlightMetadata, HomePosition, TelemetryPoint};
