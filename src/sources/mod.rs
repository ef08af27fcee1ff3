//! Source implementations with conditional compilation support.
//!
//! # Feature Flags
//!
//! - `source-jikan` - Enables the Jikan catalog source
//! - `source-animechan` - Enables the Animechan quote source
//! - `all-sources` - Enables all sources (default)
//!
//! Build with only the catalog:
//! ```bash
//! cargo build --no-default-features --features source-jikan
//! ```

#[cfg(feature = "source-jikan")]
pub mod jikan;

#[cfg(feature = "source-animechan")]
pub mod animechan;

#[cfg(feature = "source-jikan")]
pub use jikan::{JikanSource, ResourceKind};

#[cfg(feature = "source-animechan")]
pub use animechan::AnimechanSource;
