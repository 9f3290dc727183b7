//! Yes/no prompt for destructive actions.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::state::PendingDelete;
use crate::ui::centered_box;

pub struct ConfirmDialog;

impl ConfirmDialog {
    pub fn render(frame: &mut Frame, area: Rect, pending: &PendingDelete) {
        let popup = centered_box(44, 6, area);
        frame.render_widget(Clear, popup);

        let lines = vec![
            Line::from(format!("Delete monitor \"{}\"?", pending.name)),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[y]",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" delete   "),
                Span::styled("[n]", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" keep"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Confirm ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
        frame.render_widget(paragraph, popup);
    }
}
