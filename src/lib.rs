//! # eawatch - terminal client for server-side EA signals
//!
//! A terminal companion for a trading-signal backend. Users sign in, create
//! and start/stop "EA monitors" (a symbol, timeframe and indicator the server
//! evaluates), and watch signals, quotes, news and mentor indicators refresh
//! on timers. The client computes nothing itself: every signal comes from the
//! backend.
//!
//! ## Architecture
//!
//! - **API**: the [`api::Backend`] seam and its reqwest implementation
//! - **Session**: persisted sign-in state and 403 handling
//! - **Store**: the shared cache of backend data, with stale-response fencing
//! - **Polling**: per-screen refresh timers torn down on navigation
//! - **Overlay**: the draggable floating signal badge
//! - **State**: UI state reduced from actions into effects
//! - **Events**: terminal input mapped to actions
//! - **UI**: ratatui screens and widgets
//! - **Config**: layered configuration

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod overlay;
pub mod polling;
pub mod session;
pub mod state;
pub mod store;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use session::Session;
pub use store::EaStore;
