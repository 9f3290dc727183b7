//! Application-level state.

use super::Notification;
use std::time::{Duration, Instant};

/// The current view/screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Login,
    Dashboard,
    Monitors,
    Brokers,
    News,
    Indicators,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Login,
        View::Dashboard,
        View::Monitors,
        View::Brokers,
        View::News,
        View::Indicators,
    ];

    /// Views reachable from the tab bar once signed in.
    pub const TABS: [View; 5] = [
        View::Dashboard,
        View::Monitors,
        View::Brokers,
        View::News,
        View::Indicators,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Dashboard => "Dashboard",
            Self::Monitors => "Monitors",
            Self::Brokers => "Brokers",
            Self::News => "News",
            Self::Indicators => "Indicators",
        }
    }

    pub fn requires_session(self) -> bool {
        self != Self::Login
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Keystrokes go to the focused form.
    Editing,
    /// A yes/no prompt is open.
    Confirm,
}

/// Row cursors for the lists that live only in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursors {
    pub brokers: usize,
    pub news: usize,
    pub indicators: usize,
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    notification_expires: Option<Instant>,
    /// Requests started from the UI that have not answered yet.
    pub in_flight: usize,
    pub cursors: ListCursors,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// State for a fresh launch, on the login screen unless already signed in.
    pub fn new(signed_in: bool) -> Self {
        if signed_in {
            Self {
                current_view: View::Dashboard,
                ..Default::default()
            }
        } else {
            Self {
                current_view: View::Login,
                input_mode: InputMode::Editing,
                ..Default::default()
            }
        }
    }

    /// Check if in an input mode.
    pub fn is_editing(&self) -> bool {
        self.input_mode == InputMode::Editing
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn notify(&mut self, notification: Notification, now: Instant) {
        self.notification_expires = Some(now + Duration::from_secs(notification.duration_secs));
        self.notification = Some(notification);
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
        self.notification_expires = None;
    }

    /// Drop the notification once its time is up.
    pub fn expire_notification(&mut self, now: Instant) {
        if self.notification_expires.is_some_and(|at| now >= at) {
            self.dismiss_notification();
        }
    }
}
