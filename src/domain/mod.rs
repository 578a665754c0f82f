pub mod announcement;
pub mod farmer;
pub mod program;

pub use announcement::*;
pub use farmer::*;
pub use program::*;
