//! Regions of a numeric sequence
//!
//! - [`Scope`]: peak or valley region as emitted by the scanner
//! - [`Region`]: interval borrowed over its sequence, with neighbor queries
//! - [`RegionScanner`]: one-pass detector producing scopes innermost first

mod orientation;
mod scanner;
mod scope;

pub use orientation::Orientation;
pub use scanner::{find_peaks, find_valleys, RegionScanner};
pub use scope::{Region, Scope};
