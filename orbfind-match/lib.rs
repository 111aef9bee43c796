//! Brute-force Hamming matching and ranking of binary descriptors.
//!
//! ```text
//! query descriptors ─┐
//!                    ├─> match_descriptors / match_mutual -> select_top
//! train descriptors ─┘
//! ```

pub mod matcher;
pub mod selection;

pub use matcher::{match_descriptors, match_mutual, BruteForceMatcher};
pub use selection::select_top;
