pub mod chart;
pub mod parameters;
pub mod schedule;

pub use chart::ChartScreen;
pub use parameters::{ParameterField, ParametersScreen};
pub use schedule::ScheduleScreen;
