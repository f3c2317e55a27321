//! Application context for Vitrine storefronts.
//!
//! Holds the pieces the interactive shell passes down to components:
//!
//! - [`StorefrontConfig`] - store-level configuration
//! - [`Aside`] - which overlay panel is open, as an explicit context
//!   object rather than process-wide state, so server-rendered
//!   previews can hold independent instances
//! - [`Navigation`] - read/write access to the current location

pub mod aside;
pub mod config;
pub mod navigation;

pub use aside::{Aside, AsideKind};
pub use config::StorefrontConfig;
pub use navigation::{Location, MemoryNavigation, Navigation};
