pub mod collector;
pub mod error;
pub mod matcher;
pub mod records;
pub mod report;
pub mod targets;

pub use collector::Collector;
pub use error::{Error, Result};
pub use records::{InfoItem, InputRecord, LookupOutcome};
pub use report::ReportWriter;
pub use targets::{TargetList, TargetReader};
