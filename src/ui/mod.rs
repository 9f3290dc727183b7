//! UI rendering using ratatui.
//!
//! Screens only read: the UI store for view state and a store snapshot for
//! data. Nothing here changes state.

mod layout;
mod theme;
mod widgets;

pub use layout::{Layout, centered_box, centered_rect};
pub use theme::Theme;

use crate::config::KeyBindings;
use crate::state::{InputMode, UiStore, View};
use crate::store::StoreState;
use ratatui::Frame;
use widgets::{
    AddMonitorDialog, BrokerList, ConfirmDialog, Dashboard, HelpPanel, IndicatorList, LoginScreen,
    MonitorList, NewsList, SignalBadge, StatusBar, TabBar,
};

/// Everything a widget may read while drawing one frame.
#[derive(Clone, Copy)]
pub struct Screen<'a> {
    pub ui: &'a UiStore,
    pub data: &'a StoreState,
    pub theme: &'a Theme,
    pub keys: &'a KeyBindings,
}

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI.
    pub fn render(frame: &mut Frame, screen: Screen<'_>) {
        let layout = Layout::new(frame.area());

        StatusBar::render(frame, layout.status_area, screen);
        TabBar::render(frame, layout.tab_area, screen);

        match screen.ui.app.current_view {
            View::Login => LoginScreen::render(frame, layout.main_area, screen),
            View::Dashboard => Dashboard::render(frame, layout.main_area, screen),
            View::Monitors => {
                MonitorList::render(frame, layout.main_area, screen);
                if screen.ui.app.input_mode == InputMode::Editing {
                    AddMonitorDialog::render(frame, layout.main_area, screen);
                }
            }
            View::Brokers => BrokerList::render(frame, layout.main_area, screen),
            View::News => NewsList::render(frame, layout.main_area, screen),
            View::Indicators => IndicatorList::render(frame, layout.main_area, screen),
        }

        if let Some(pending) = &screen.ui.pending_delete {
            ConfirmDialog::render(frame, layout.main_area, pending);
        }

        SignalBadge::render(frame, screen);

        // Render help panel if visible
        if screen.ui.app.show_help {
            HelpPanel::render(frame, frame.area(), screen.keys);
        }

        // Render notification if present
        if let Some(notification) = &screen.ui.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }
    }
}
