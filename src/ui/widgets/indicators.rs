//! Mentor indicator catalogue.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::{render_empty, truncate_string};
use crate::ui::Screen;

pub struct IndicatorList;

impl IndicatorList {
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let Screen { ui, data, theme, keys } = screen;
        let indicators = &data.feeds.mentor_indicators;

        let header = Row::new(["", "Name", "Mentor", "Signal", "Description"])
            .style(theme.header())
            .height(1)
            .bottom_margin(1);

        let rows = indicators.iter().map(|indicator| {
            let signal = indicator.current_signal.unwrap_or_default();
            Row::new(vec![
                Cell::from(if indicator.selected { "●" } else { " " })
                    .style(Style::default().fg(theme.primary)),
                Cell::from(truncate_string(&indicator.name, 24)),
                Cell::from(indicator.mentor_name.clone().unwrap_or_default()),
                Cell::from(signal.to_string()).style(theme.signal(signal)),
                Cell::from(indicator.description.clone().unwrap_or_default()).style(theme.muted()),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(24),
                Constraint::Length(16),
                Constraint::Length(8),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(" Mentor indicators [{} to use] ", keys.select))
                .borders(Borders::ALL)
                .border_style(theme.border(true)),
        )
        .row_highlight_style(theme.selected())
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        if !indicators.is_empty() {
            state.select(Some(ui.app.cursors.indicators.min(indicators.len() - 1)));
        }
        frame.render_stateful_widget(table, area, &mut state);

        if indicators.is_empty() {
            render_empty(frame, area, "No mentor indicators available.");
        }
    }
}
