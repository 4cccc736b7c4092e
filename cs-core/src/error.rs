//! Error re-exports
//!
//! The unified error type lives in the cs-error crate so every camseq
//! component shares one taxonomy.

pub use cs_error::{CamseqError, Result};
