//! Text entry for the login and add-monitor forms.

use crate::api::{IndicatorConfig, LoginRole, MonitorConfig};

/// Timeframes offered when creating a monitor.
pub const TIMEFRAMES: [&str; 7] = ["M1", "M5", "M15", "M30", "H1", "H4", "D1"];

/// Indicator types offered when creating a monitor.
pub const INDICATORS: [&str; 5] = ["RSI", "MACD", "EMA", "BOLLINGER", "STOCHASTIC"];

/// Single-line text buffer with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars.
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Add a character at the cursor.
    pub fn push_char(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Remove the character before the cursor.
    pub fn pop_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.value.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }
}

impl From<&str> for TextInput {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
    Role,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: TextInput,
    pub password: TextInput,
    pub role: LoginRole,
    pub focus: LoginField,
    /// Set while the request is on the wire.
    pub submitting: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Role,
            LoginField::Role => LoginField::Email,
        };
    }

    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Role,
            LoginField::Password => LoginField::Email,
            LoginField::Role => LoginField::Password,
        };
    }

    pub fn toggle_role(&mut self) {
        self.role = match self.role {
            LoginRole::User => LoginRole::Admin,
            LoginRole::Admin => LoginRole::User,
        };
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            LoginField::Email => Some(&mut self.email),
            LoginField::Password => Some(&mut self.password),
            LoginField::Role => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.focused_input() {
            Some(input) => input.push_char(c),
            None if c == ' ' => self.toggle_role(),
            None => {}
        }
    }

    pub fn backspace(&mut self) {
        if let Some(input) = self.focused_input() {
            input.pop_char();
        }
    }

    /// Forget the password; keep the email for the next attempt.
    pub fn reset(&mut self) {
        self.password.clear();
        self.focus = LoginField::Email;
        self.submitting = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorField {
    #[default]
    Name,
    Symbol,
    Timeframe,
    Indicator,
}

/// The add-monitor form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorForm {
    pub name: TextInput,
    pub symbol: TextInput,
    pub timeframe: usize,
    pub indicator: usize,
    pub focus: MonitorField,
}

impl Default for MonitorForm {
    fn default() -> Self {
        Self {
            name: TextInput::default(),
            symbol: TextInput::default(),
            // H1
            timeframe: 4,
            indicator: 0,
            focus: MonitorField::Name,
        }
    }
}

impl MonitorForm {
    pub fn timeframe(&self) -> &'static str {
        TIMEFRAMES[self.timeframe % TIMEFRAMES.len()]
    }

    pub fn indicator(&self) -> &'static str {
        INDICATORS[self.indicator % INDICATORS.len()]
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            MonitorField::Name => MonitorField::Symbol,
            MonitorField::Symbol => MonitorField::Timeframe,
            MonitorField::Timeframe => MonitorField::Indicator,
            MonitorField::Indicator => MonitorField::Name,
        };
    }

    pub fn prev_field(&mut self) {
        self.focus = match self.focus {
            MonitorField::Name => MonitorField::Indicator,
            MonitorField::Symbol => MonitorField::Name,
            MonitorField::Timeframe => MonitorField::Symbol,
            MonitorField::Indicator => MonitorField::Timeframe,
        };
    }

    /// Step the focused choice field forwards or backwards.
    pub fn cycle(&mut self, forward: bool) {
        let step = |index: usize, len: usize| {
            if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            }
        };
        match self.focus {
            MonitorField::Timeframe => self.timeframe = step(self.timeframe, TIMEFRAMES.len()),
            MonitorField::Indicator => self.indicator = step(self.indicator, INDICATORS.len()),
            _ => {}
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            MonitorField::Name => self.name.push_char(c),
            MonitorField::Symbol => self.symbol.push_char(c.to_ascii_uppercase()),
            MonitorField::Timeframe | MonitorField::Indicator if c == ' ' => self.cycle(true),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            MonitorField::Name => self.name.pop_char(),
            MonitorField::Symbol => self.symbol.pop_char(),
            _ => {}
        }
    }

    /// Monitor name and configuration as entered.
    pub fn to_request(&self) -> (String, MonitorConfig) {
        let config = MonitorConfig {
            symbol: self.symbol.value().trim().to_string(),
            timeframe: self.timeframe().to_string(),
            indicator: IndicatorConfig {
                kind: self.indicator().to_string(),
                parameters: Default::default(),
            },
        };
        (self.name.value().trim().to_string(), config)
    }
}
