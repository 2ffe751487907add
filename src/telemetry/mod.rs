pub mod parser;
pub mod record;

pub use parser::{LINES_PER_ENTRY, TelemetryParser};
pub use record::{CameraSettingsPoint, EntryError, ParseStats, RawTelemetryRecord, TelemetryLog};
