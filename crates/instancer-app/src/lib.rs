//! instancer-app - Application state and orchestration for the instancer client
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: the session gate, challenge loader, deployment controller and
//! countdown, the catalog and account screens, settings, session storage,
//! CAPTCHA solving, and the Engine that frontends drive.

pub mod account;
pub mod actions;
pub mod captcha;
pub mod catalog;
pub mod challenge_view;
pub mod config;
pub mod engine;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod signals;
pub mod state;
pub mod timer;
pub mod token_store;

// Re-export primary types
pub use captcha::{CaptchaSolver, CommandCaptchaSolver, ConfiguredCaptcha, NoCaptcha};
pub use challenge_view::{ChallengeView, ControlAction, ControllerState, LoadState};
pub use config::{load_settings, ClientConfig, Settings};
pub use engine::{ChallengeSnapshot, Engine, StateSnapshot};
pub use handler::{Task, UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::AppState;
pub use token_store::TokenStore;
