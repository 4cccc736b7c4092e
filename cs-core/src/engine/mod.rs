//! Power sequencing engine
//!
//! Contains the sequence walker and the blocking delay primitive.

mod delay;
mod walker;

pub use delay::{Delay, ThreadDelay};
pub use walker::{PowerHal, SequenceTable};
