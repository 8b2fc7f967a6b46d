mod reader;

pub use reader::{TargetList, TargetReader, SEPARATOR};
