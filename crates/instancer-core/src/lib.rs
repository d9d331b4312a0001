//! # instancer-core - Core Domain Types
//!
//! Foundation crate for the instancer client. Provides domain types, error
//! handling, logging setup, and the pure functions every screen derives its
//! display from.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, regex, tracing, url).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`ChallengeInfo`], [`Tag`] - Challenge metadata as served by the backend
//! - [`Deployment`], [`PortValue`] - A live challenge instance and its port mappings
//! - [`ChallengeSummary`] - Catalog entry (info plus optional deployment)
//! - [`is_deployed()`] - The one definition of "this challenge is live"
//!
//! ### Routing (`route`)
//! - [`Route`] - Every screen the client can show
//! - [`login_redirect()`], [`post_login_route()`] - Session gate redirects with
//!   return-target validation
//!
//! ### Derived Views
//! - [`format_countdown()`] - `HH:MM:SS` rendering of a remaining duration
//! - [`present_ports()`] - Port mappings to links / `nc` commands
//! - [`CatalogFilter`] - Include/exclude/search predicate for the catalog
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use instancer_core::prelude::*;
//! ```

pub mod countdown;
pub mod error;
pub mod filter;
pub mod logging;
pub mod ports;
pub mod route;
pub mod types;

/// Prelude for common imports used throughout all instancer crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use countdown::{format_countdown, seconds_remaining};
pub use error::{Error, Result, ResultExt};
pub use filter::{CatalogFilter, Facets, STATUS_ACTIVE, STATUS_INACTIVE};
pub use ports::{present_ports, PortEntry, PortsView};
pub use route::{is_valid_challenge_id, login_redirect, post_login_route, Route};
pub use types::{
    is_deployed, now_epoch, AppPhase, ChallengeInfo, ChallengeSummary, Deployment, PortValue,
    Profile, ProfileUpdate, Tag,
};
