//! Sign-in form.

use ratatui::{
    Frame,
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::api::LoginRole;
use crate::state::{LoginField, TextInput};
use crate::ui::{Screen, centered_box};

pub struct LoginScreen;

const LABEL_WIDTH: u16 = 10;

fn masked(input: &TextInput) -> String {
    "•".repeat(input.value().chars().count())
}

impl LoginScreen {
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let Screen { ui, data, theme, .. } = screen;
        let form = &ui.login;
        let popup = centered_box(48, 13, area);
        frame.render_widget(Clear, popup);

        let label = |text: &str, field: LoginField| {
            let style = if form.focus == field {
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Span::styled(format!("{text:<width$}", width = LABEL_WIDTH as usize), style)
        };

        let role = match form.role {
            LoginRole::User => "( user )   admin",
            LoginRole::Admin => "  user   ( admin )",
        };

        let status = if form.submitting {
            Line::from(Span::styled("Signing in...", theme.muted()))
        } else if let Some(error) = &form.error {
            Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red)))
        } else {
            Line::from("")
        };

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                label("Email", LoginField::Email),
                Span::raw(form.email.value().to_string()),
            ]),
            Line::from(""),
            Line::from(vec![
                label("Password", LoginField::Password),
                Span::raw(masked(&form.password)),
            ]),
            Line::from(""),
            Line::from(vec![label("Role", LoginField::Role), Span::raw(role)]),
            Line::from(""),
            status,
            Line::from(""),
            Line::from(Span::styled(
                "Tab next · Space switch role · Enter sign in",
                theme.muted(),
            )),
        ];

        let title = format!(" {} ", data.feeds.system_name());
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(title)
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(theme.border(true)),
            );
        frame.render_widget(paragraph, popup);

        let cursor_row = match form.focus {
            LoginField::Email => Some((2, form.email.cursor())),
            LoginField::Password => Some((4, form.password.cursor())),
            LoginField::Role => None,
        };
        if let Some((row, column)) = cursor_row.filter(|_| !form.submitting) {
            let x = popup.x + 1 + LABEL_WIDTH + column as u16;
            let y = popup.y + row;
            if x < popup.right().saturating_sub(1) && y < popup.bottom() {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_password_is_masked_per_char() {
        let input = TextInput::from("pässword");
        assert_eq!(masked(&input), "••••••••");
        assert_eq!(masked(&TextInput::default()), "");
    }
}
