//! Pure game rules for HXBIT: leveling curves, stat point tiers, the stat
//! enumeration and the validation errors shown to users verbatim.

pub mod error;
pub mod leveling;
pub mod stats;

pub use error::ValidationError;
pub use leveling::{Completion, Curve, LevelProgress, ProgressEvent};
pub use stats::{Stat, StatBlock};
