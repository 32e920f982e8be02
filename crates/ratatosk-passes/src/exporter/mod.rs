//! Backend exporters.

mod schedule;

pub use schedule::{Schedule, ScheduleExporter, ScheduleOp};
