pub mod calculations;
pub mod decision;
pub mod schedule;

pub use schedule::IrrigationSchedule;
