//! UI state for eawatch.
//!
//! Data mirrored from the backend lives in [`crate::store::EaStore`]. This
//! module holds what only the terminal cares about: the current view, form
//! contents, pending confirmations, notifications and the signal badge.
//!
//! It follows a unidirectional flow: input becomes an [`Action`], the
//! [`UiStore`] reduces it and may hand back an [`Effect`] for the app to
//! carry out against the backend. Results come back as further actions.

mod app_state;
mod forms;

pub use app_state::{AppState, InputMode, ListCursors, View};
pub use forms::{
    INDICATORS, LoginField, LoginForm, MonitorField, MonitorForm, TIMEFRAMES, TextInput,
};

use crate::api::{LoginRole, Monitor, MonitorConfig};
use crate::config::Config;
use crate::error::Result;
use crate::overlay::{Overlay, resolve_active_signal};
use crate::store::StoreState;
use ratatui::layout::{Position, Rect};
use std::time::Instant;
use tokio::sync::mpsc;

const ACCOUNT_INACTIVE: &str = "Your account is inactive. Please contact support.";

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    SetInputMode(InputMode),
    Back,

    // Lists
    ScrollUp,
    ScrollDown,

    // Form editing
    InputChar(char),
    InputBackspace,
    CursorLeft,
    CursorRight,
    NextField,
    PrevField,
    OpenMonitorForm,
    /// Enter: submit the focused form or act on the selected row.
    Submit,

    // Session
    LoginSucceeded { user_type: Option<String> },
    LoginFailed(String),
    Logout,
    SignedOut,
    ForcedLogout,

    // Monitors
    RequestDelete,
    ConfirmYes,
    ConfirmNo,
    ToggleMonitor,
    MonitorAdded(String),
    MonitorDeleted(String),
    MonitorToggled(Monitor),

    // Market data
    CycleCategory,

    // Mentor indicators
    IndicatorSelected(String),

    /// A request started from the UI failed.
    RequestFailed(String),

    // Signal badge
    ToggleOverlay,
    PointerDown(Position),
    PointerDrag(Position),
    PointerUp(Position),
    Resize(u16, u16),

    // UI actions
    Refresh,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,
    Tick,

    // Quit
    Quit,
}

/// Work the app performs on behalf of a reduced action.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Login {
        role: LoginRole,
        email: String,
        password: String,
    },
    Logout,
    AddMonitor {
        name: String,
        config: MonitorConfig,
    },
    DeleteMonitor {
        id: String,
        name: String,
    },
    ToggleMonitor {
        id: String,
    },
    SelectMonitorOffset(i32),
    SetQuoteCategory(Option<String>),
    SelectIndicator {
        id: String,
        name: String,
    },
    /// Restart the current view's refresh plan.
    Remount,
}

/// A delete awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub name: String,
}

/// A notification to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration_secs: 10,
        }
    }
}

/// The UI state store.
#[derive(Debug)]
pub struct UiStore {
    /// Application state.
    pub app: AppState,
    pub login: LoginForm,
    pub monitor_form: MonitorForm,
    pub pending_delete: Option<PendingDelete>,
    pub overlay: Overlay,
    overlay_enabled: bool,
    /// Minimum on-screen time for routine notifications.
    notification_secs: u64,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl UiStore {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>, config: &Config, signed_in: bool) -> Self {
        Self {
            app: AppState::new(signed_in),
            login: LoginForm::default(),
            monitor_form: MonitorForm::default(),
            pending_delete: None,
            overlay: Overlay::new(config.overlay.tap_threshold),
            overlay_enabled: config.overlay.enabled,
            notification_secs: config.ui.notification_secs,
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// A sender for background tasks to report back through.
    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Point the badge at whichever signal currently has priority.
    pub fn sync_overlay(&mut self, data: &StoreState) {
        let signal = if self.overlay_enabled && self.app.current_view.requires_session() {
            resolve_active_signal(data.feeds.manual_signal.as_ref(), data.monitors.selected())
        } else {
            None
        };
        self.overlay.set_signal(signal);
    }

    fn notify(&mut self, notification: Notification) {
        let notification = if notification.level <= NotificationLevel::Success {
            Notification {
                duration_secs: notification.duration_secs.max(self.notification_secs),
                ..notification
            }
        } else {
            notification
        };
        self.app.notify(notification, Instant::now());
    }

    fn finish_request(&mut self) {
        self.app.in_flight = self.app.in_flight.saturating_sub(1);
    }

    fn start_request(&mut self, effect: Effect) -> Option<Effect> {
        self.app.in_flight += 1;
        Some(effect)
    }

    /// Apply an action to update state.
    ///
    /// `data` is the latest store snapshot, used for list lengths and the
    /// current selection.
    pub fn reduce(&mut self, action: Action, data: &StoreState) -> Option<Effect> {
        match action {
            // Navigation
            Action::SetView(view) => self.set_view(view),
            Action::SetInputMode(mode) => {
                self.app.input_mode = mode;
                None
            }
            Action::Back => {
                self.back();
                None
            }

            // Lists
            Action::ScrollUp => self.scroll(-1, data),
            Action::ScrollDown => self.scroll(1, data),

            // Form editing
            Action::InputChar(c) => {
                match (self.app.current_view, self.app.input_mode) {
                    (View::Login, _) => self.login.input_char(c),
                    (View::Monitors, InputMode::Editing) => self.monitor_form.input_char(c),
                    _ => {}
                }
                None
            }
            Action::InputBackspace => {
                match (self.app.current_view, self.app.input_mode) {
                    (View::Login, _) => self.login.backspace(),
                    (View::Monitors, InputMode::Editing) => self.monitor_form.backspace(),
                    _ => {}
                }
                None
            }
            Action::CursorLeft | Action::CursorRight => {
                let forward = matches!(action, Action::CursorRight);
                self.move_cursor(forward);
                None
            }
            Action::NextField => {
                match self.app.current_view {
                    View::Login => self.login.next_field(),
                    View::Monitors if self.app.is_editing() => self.monitor_form.next_field(),
                    _ => {}
                }
                None
            }
            Action::PrevField => {
                match self.app.current_view {
                    View::Login => self.login.prev_field(),
                    View::Monitors if self.app.is_editing() => self.monitor_form.prev_field(),
                    _ => {}
                }
                None
            }
            Action::OpenMonitorForm => {
                if self.app.current_view == View::Monitors {
                    self.monitor_form.focus = MonitorField::Name;
                    self.app.input_mode = InputMode::Editing;
                }
                None
            }
            Action::Submit => self.submit(data),

            // Session
            Action::LoginSucceeded { user_type } => {
                self.finish_request();
                self.login.reset();
                self.login.error = None;
                tracing::info!(?user_type, "signed in");
                self.notify(Notification::success("Signed in"));
                self.enter(View::Dashboard)
            }
            Action::LoginFailed(message) => {
                self.finish_request();
                self.login.submitting = false;
                self.login.error = Some(message);
                None
            }
            Action::Logout => {
                if self.app.current_view == View::Login {
                    None
                } else {
                    Some(Effect::Logout)
                }
            }
            Action::SignedOut => {
                self.sign_out();
                self.notify(Notification::info("Signed out"));
                Some(Effect::Remount)
            }
            Action::ForcedLogout => {
                self.sign_out();
                self.login.error = Some(ACCOUNT_INACTIVE.to_string());
                self.notify(Notification::error(ACCOUNT_INACTIVE));
                Some(Effect::Remount)
            }

            // Monitors
            Action::RequestDelete => {
                if !self.on_monitor_view() || self.app.input_mode != InputMode::Normal {
                    return None;
                }
                let monitor = data.monitors.selected()?;
                self.pending_delete = Some(PendingDelete {
                    id: monitor.id.clone(),
                    name: monitor.name.clone(),
                });
                self.app.input_mode = InputMode::Confirm;
                None
            }
            Action::ConfirmYes => {
                let pending = self.pending_delete.take()?;
                self.app.input_mode = InputMode::Normal;
                self.start_request(Effect::DeleteMonitor {
                    id: pending.id,
                    name: pending.name,
                })
            }
            Action::ConfirmNo => {
                self.pending_delete = None;
                self.app.input_mode = InputMode::Normal;
                None
            }
            Action::ToggleMonitor => {
                if !self.on_monitor_view() || self.app.input_mode != InputMode::Normal {
                    return None;
                }
                let id = data.monitors.selected()?.id.clone();
                self.start_request(Effect::ToggleMonitor { id })
            }
            Action::MonitorAdded(name) => {
                self.finish_request();
                self.monitor_form = MonitorForm::default();
                self.notify(Notification::success(format!("Monitor \"{name}\" created")));
                None
            }
            Action::MonitorDeleted(name) => {
                self.finish_request();
                self.notify(Notification::success(format!("Monitor \"{name}\" deleted")));
                None
            }
            Action::MonitorToggled(monitor) => {
                self.finish_request();
                let verb = if monitor.is_running() { "started" } else { "stopped" };
                self.notify(Notification::success(format!("{} {verb}", monitor.name)));
                None
            }

            // Market data
            Action::CycleCategory => {
                if self.app.current_view != View::Dashboard {
                    return None;
                }
                let next = data
                    .market
                    .next_category(data.market.category.as_deref());
                Some(Effect::SetQuoteCategory(next))
            }

            // Mentor indicators
            Action::IndicatorSelected(name) => {
                self.finish_request();
                self.notify(Notification::success(format!("Using {name}")));
                None
            }

            Action::RequestFailed(message) => {
                self.finish_request();
                self.notify(Notification::error(message));
                None
            }

            // Signal badge
            Action::ToggleOverlay => {
                self.overlay.toggle();
                None
            }
            Action::PointerDown(at) => {
                self.overlay.pointer_down(at);
                None
            }
            Action::PointerDrag(at) => {
                self.overlay.pointer_move(at);
                None
            }
            Action::PointerUp(at) => {
                if let Some(gesture) = self.overlay.pointer_up(at) {
                    tracing::trace!(?gesture, "overlay gesture");
                }
                None
            }
            Action::Resize(width, height) => {
                self.overlay.resize(Rect::new(0, 0, width, height));
                None
            }

            // UI actions
            Action::Refresh => Some(Effect::Remount),
            Action::ToggleHelp => {
                self.app.show_help = !self.app.show_help;
                None
            }
            Action::ShowNotification(notification) => {
                self.notify(notification);
                None
            }
            Action::DismissNotification => {
                self.app.dismiss_notification();
                None
            }
            Action::Tick => {
                self.app.expire_notification(Instant::now());
                None
            }

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
                None
            }
        }
    }

    fn on_monitor_view(&self) -> bool {
        matches!(self.app.current_view, View::Dashboard | View::Monitors)
    }

    fn set_view(&mut self, view: View) -> Option<Effect> {
        // Only a successful login leaves the login screen.
        if view == self.app.current_view || self.app.current_view == View::Login {
            return None;
        }
        if view == View::Login {
            return None;
        }
        self.enter(view)
    }

    fn enter(&mut self, view: View) -> Option<Effect> {
        self.app.current_view = view;
        self.app.input_mode = if view == View::Login {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
        self.app.show_help = false;
        self.pending_delete = None;
        Some(Effect::Remount)
    }

    fn sign_out(&mut self) {
        self.login.reset();
        self.monitor_form = MonitorForm::default();
        self.app.cursors = ListCursors::default();
        self.app.in_flight = 0;
        self.overlay.set_signal(None);
        self.enter(View::Login);
    }

    fn back(&mut self) {
        if self.app.show_help {
            self.app.show_help = false;
        } else if self.pending_delete.take().is_some() {
            self.app.input_mode = InputMode::Normal;
        } else if self.app.current_view == View::Monitors && self.app.is_editing() {
            self.app.input_mode = InputMode::Normal;
        } else if self.app.notification.is_some() {
            self.app.dismiss_notification();
        }
    }

    fn scroll(&mut self, delta: i32, data: &StoreState) -> Option<Effect> {
        let step = |current: usize, len: usize| -> usize {
            let next = (current as i64 + i64::from(delta)).max(0) as usize;
            next.min(len.saturating_sub(1))
        };
        match self.app.current_view {
            View::Dashboard | View::Monitors if self.app.input_mode == InputMode::Normal => {
                return Some(Effect::SelectMonitorOffset(delta));
            }
            View::Monitors if self.app.is_editing() => {
                if delta < 0 {
                    self.monitor_form.prev_field();
                } else {
                    self.monitor_form.next_field();
                }
            }
            View::Brokers => {
                self.app.cursors.brokers = step(self.app.cursors.brokers, data.feeds.brokers.len())
            }
            View::News => self.app.cursors.news = step(self.app.cursors.news, data.feeds.news.len()),
            View::Indicators => {
                self.app.cursors.indicators = step(
                    self.app.cursors.indicators,
                    data.feeds.mentor_indicators.len(),
                )
            }
            View::Login => {
                if delta < 0 {
                    self.login.prev_field();
                } else {
                    self.login.next_field();
                }
            }
            _ => {}
        }
        None
    }

    fn move_cursor(&mut self, forward: bool) {
        match self.app.current_view {
            View::Login => match self.login.focus {
                LoginField::Email if forward => self.login.email.cursor_right(),
                LoginField::Email => self.login.email.cursor_left(),
                LoginField::Password if forward => self.login.password.cursor_right(),
                LoginField::Password => self.login.password.cursor_left(),
                LoginField::Role => self.login.toggle_role(),
            },
            View::Monitors if self.app.is_editing() => match self.monitor_form.focus {
                MonitorField::Name if forward => self.monitor_form.name.cursor_right(),
                MonitorField::Name => self.monitor_form.name.cursor_left(),
                MonitorField::Symbol if forward => self.monitor_form.symbol.cursor_right(),
                MonitorField::Symbol => self.monitor_form.symbol.cursor_left(),
                MonitorField::Timeframe | MonitorField::Indicator => {
                    self.monitor_form.cycle(forward)
                }
            },
            _ => {}
        }
    }

    fn submit(&mut self, data: &StoreState) -> Option<Effect> {
        match (self.app.current_view, self.app.input_mode) {
            (View::Login, _) => {
                if self.login.submitting {
                    return None;
                }
                let email = self.login.email.value().trim().to_string();
                let password = self.login.password.value().to_string();
                if email.is_empty() || password.is_empty() {
                    self.login.error = Some("Email and password are required".to_string());
                    return None;
                }
                self.login.submitting = true;
                self.login.error = None;
                self.start_request(Effect::Login {
                    role: self.login.role,
                    email,
                    password,
                })
            }
            (_, InputMode::Confirm) => self.reduce(Action::ConfirmYes, data),
            (View::Monitors, InputMode::Editing) => {
                let (name, config) = self.monitor_form.to_request();
                if name.is_empty() {
                    self.notify(Notification::warning("Name is required"));
                    self.monitor_form.focus = MonitorField::Name;
                    return None;
                }
                if config.symbol.is_empty() {
                    self.notify(Notification::warning("Symbol is required"));
                    self.monitor_form.focus = MonitorField::Symbol;
                    return None;
                }
                self.app.input_mode = InputMode::Normal;
                self.start_request(Effect::AddMonitor { name, config })
            }
            (View::Indicators, InputMode::Normal) => {
                let indicator = data.feeds.mentor_indicators.get(self.app.cursors.indicators)?;
                let effect = Effect::SelectIndicator {
                    id: indicator.id.clone(),
                    name: indicator.name.clone(),
                };
                self.start_request(effect)
            }
            _ => None,
        }
    }
}
