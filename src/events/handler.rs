//! Maps terminal events to actions.

use super::{Event, InputEvent, Key};
use crate::config::KeyBindings;
use crate::state::{Action, InputMode, View};
use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

/// The slice of UI state key handling depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputContext {
    pub view: View,
    pub input_mode: InputMode,
    pub show_help: bool,
}

/// Handles input events and produces actions.
#[derive(Debug, Clone)]
pub struct EventHandler {
    keybindings: KeyBindings,
    mouse_support: bool,
}

impl EventHandler {
    pub fn new(keybindings: KeyBindings, mouse_support: bool) -> Self {
        Self {
            keybindings,
            mouse_support,
        }
    }

    /// Translate one terminal event.
    pub fn handle(&self, event: &Event, ctx: InputContext) -> Option<Action> {
        match event {
            Event::Tick => Some(Action::Tick),
            Event::Key(key) => self.handle_key(*key, ctx),
            Event::Mouse(mouse) if self.mouse_support => self.handle_mouse(*mouse),
            Event::Resize(width, height) => Some(Action::Resize(*width, *height)),
            _ => None,
        }
    }

    /// Handle a key event and return an optional action.
    fn handle_key(&self, key: KeyEvent, ctx: InputContext) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let input = InputEvent::from(key);
        if input.matches("Ctrl+c") {
            return Some(Action::Quit);
        }

        match ctx.input_mode {
            InputMode::Confirm => self.handle_confirm_mode(input),
            InputMode::Editing => self.handle_editing_mode(input),
            InputMode::Normal => self.handle_normal_mode(input, ctx),
        }
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        let at = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Action::PointerDown(at)),
            MouseEventKind::Drag(MouseButton::Left) => Some(Action::PointerDrag(at)),
            MouseEventKind::Up(MouseButton::Left) => Some(Action::PointerUp(at)),
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    fn handle_confirm_mode(&self, input: InputEvent) -> Option<Action> {
        match input.key {
            Key::Char('y') | Key::Char('Y') | Key::Enter => Some(Action::ConfirmYes),
            Key::Char('n') | Key::Char('N') | Key::Escape => Some(Action::ConfirmNo),
            _ => None,
        }
    }

    fn handle_editing_mode(&self, input: InputEvent) -> Option<Action> {
        match input.key {
            Key::Escape => Some(Action::Back),
            Key::Enter => Some(Action::Submit),
            Key::Tab | Key::Down => Some(Action::NextField),
            Key::BackTab | Key::Up => Some(Action::PrevField),
            Key::Backspace => Some(Action::InputBackspace),
            Key::Left => Some(Action::CursorLeft),
            Key::Right => Some(Action::CursorRight),
            _ => input.text().map(Action::InputChar),
        }
    }

    fn handle_normal_mode(&self, input: InputEvent, ctx: InputContext) -> Option<Action> {
        let keys = &self.keybindings;

        if ctx.show_help {
            return (input.matches(&keys.help) || input.matches(&keys.back))
                .then_some(Action::ToggleHelp);
        }

        // Global shortcuts
        if input.matches(&keys.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&keys.help) {
            return Some(Action::ToggleHelp);
        }
        if input.matches(&keys.refresh) {
            return Some(Action::Refresh);
        }
        if input.matches(&keys.logout) {
            return Some(Action::Logout);
        }
        if input.matches(&keys.toggle_overlay) {
            return Some(Action::ToggleOverlay);
        }
        if input.matches(&keys.back) {
            return Some(Action::Back);
        }

        // View switching
        let views = [
            (&keys.dashboard, View::Dashboard),
            (&keys.monitors, View::Monitors),
            (&keys.brokers, View::Brokers),
            (&keys.news, View::News),
            (&keys.indicators, View::Indicators),
        ];
        if let Some((_, view)) = views.iter().find(|(binding, _)| input.matches(binding)) {
            return Some(Action::SetView(*view));
        }

        // Navigation
        if input.matches(&keys.up) || input.key == Key::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&keys.down) || input.key == Key::Down {
            return Some(Action::ScrollDown);
        }
        if input.matches(&keys.select) {
            return Some(Action::Submit);
        }

        // View-specific actions
        match ctx.view {
            View::Dashboard => self.handle_dashboard_view(input),
            View::Monitors => self.handle_monitors_view(input),
            _ => None,
        }
    }

    fn handle_dashboard_view(&self, input: InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.cycle_category) {
            return Some(Action::CycleCategory);
        }
        self.handle_monitor_keys(input)
    }

    fn handle_monitors_view(&self, input: InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.add_monitor) {
            return Some(Action::OpenMonitorForm);
        }
        self.handle_monitor_keys(input)
    }

    fn handle_monitor_keys(&self, input: InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.delete_monitor) {
            return Some(Action::RequestDelete);
        }
        if input.matches(&self.keybindings.toggle_monitor) {
            return Some(Action::ToggleMonitor);
        }
        None
    }
}
