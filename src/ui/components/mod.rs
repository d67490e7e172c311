pub mod gauge;
pub mod input;

pub use gauge::{count_gauge, depth_gauge, moisture_gauge};
pub use input::InputWidget;
