//! # instancer-api - Instancer Backend Client
//!
//! REST boundary between the client and the instancer backend: typed
//! requests, and one place where server status strings become errors.
//!
//! Depends on [`instancer_core`] for domain types.
//!
//! ## Public API
//!
//! ### Client
//! - [`InstancerApi`] - Async operations against the backend (Send variant)
//! - [`HttpInstancerClient`] - reqwest implementation
//!
//! ### Protocol Decoding
//! - [`ApiError`] - Decoded failure of an API call
//! - [`ApiStatus`] - The `status` vocabulary
//! - [`decode_deploy()`], [`decode_challenge()`], ... - Map `(HTTP code, body)`
//!   to a typed result

pub mod client;
pub mod protocol;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{HttpInstancerClient, InstancerApi, LocalInstancerApi};
pub use protocol::{
    decode_challenge, decode_challenges, decode_deploy, decode_deployment, decode_preview,
    decode_profile, decode_profile_update, decode_terminate, decode_token, ApiError, ApiResult,
    ApiStatus, AuthFailure,
};
