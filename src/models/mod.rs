pub mod decision;
pub mod observation;
pub mod parameters;

pub use decision::*;
pub use observation::*;
pub use parameters::*;
