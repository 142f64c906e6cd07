//! Domain models for clinical intake.

mod answers;
mod submission;
mod template;

pub use answers::*;
pub use submission::*;
pub use template::*;
