//! Signal backend integration.
//!
//! This module provides the [`Backend`] seam, its reqwest implementation and
//! the wire types the backend speaks.

mod client;
pub mod endpoints;
mod models;

pub use client::{ApiClient, ApiClientBuilder, Backend};
#[cfg(test)]
pub use client::MockBackend;
pub use models::{
    Branding, Broker, IndicatorConfig, LoginRequest, LoginResponse, LoginRole, ManualSignal,
    MentorIndicator, Monitor, MonitorConfig, MonitorStatus, NewMonitor, NewsItem, Quote,
    SignalKind, SymbolCatalog, UpcomingAlert,
};
