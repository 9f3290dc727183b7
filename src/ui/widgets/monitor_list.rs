//! Monitor configuration screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use super::{format_price, format_time, render_empty, truncate_string};
use crate::api::Monitor;
use crate::ui::{Screen, Theme};
use std::collections::HashMap;

/// Monitor list widget.
pub struct MonitorList;

impl MonitorList {
    /// Render the monitor table and the details of the selected one.
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let Screen { data, theme, keys, .. } = screen;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(7)])
            .split(area);

        let monitors = data.monitors.monitors();
        let header = Row::new(["Name", "Symbol", "TF", "Indicator", "Status", "Signal", "Price"])
            .style(theme.header())
            .height(1)
            .bottom_margin(1);

        let rows = monitors.iter().map(|m| {
            let status_style = if m.is_running() {
                Style::default().fg(theme.buy)
            } else {
                theme.muted()
            };
            Row::new(vec![
                Cell::from(truncate_string(&m.name, 30)),
                Cell::from(m.config.symbol.clone()),
                Cell::from(m.config.timeframe.clone()),
                Cell::from(m.config.indicator.kind.clone()),
                Cell::from(m.status.to_string()).style(status_style),
                Cell::from(m.signal().to_string()).style(theme.signal(m.signal())),
                Cell::from(format_price(m.last_price)),
            ])
        });

        let title = format!(
            " Monitors ({}) [{} add  {} start/stop  {} delete] ",
            monitors.len(),
            keys.add_monitor,
            keys.toggle_monitor,
            keys.delete_monitor
        );
        let table = Table::new(
            rows,
            [
                Constraint::Min(14),
                Constraint::Length(9),
                Constraint::Length(5),
                Constraint::Length(11),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(theme.border(true)),
        )
        .row_highlight_style(theme.selected())
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(data.monitors.selected_index());
        frame.render_stateful_widget(table, chunks[0], &mut state);

        if monitors.is_empty() {
            render_empty(frame, chunks[0], "No monitors yet.");
        }

        let mentor = data
            .feeds
            .selected_indicator()
            .map(|i| i.name.as_str())
            .unwrap_or("none");
        render_details(frame, chunks[1], data.monitors.selected(), mentor, theme);
    }
}

/// `name=value` pairs sorted by name. Values the server could not compute
/// show as `-`.
fn indicator_summary(values: &HashMap<String, Option<f64>>) -> String {
    let mut pairs: Vec<_> = values.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
        .into_iter()
        .map(|(k, v)| match v {
            Some(v) => format!("{k}={v:.2}"),
            None => format!("{k}=-"),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_details(
    frame: &mut Frame,
    area: Rect,
    selected: Option<&Monitor>,
    mentor: &str,
    theme: &Theme,
) {
    let mut lines = Vec::new();
    match selected {
        Some(m) => {
            lines.push(Line::from(vec![
                Span::styled(m.name.clone(), theme.header()),
                Span::raw(format!(
                    "  {} {} {}",
                    m.config.symbol, m.config.timeframe, m.config.indicator.kind
                )),
            ]));
            let values = m
                .indicator_values
                .as_ref()
                .map(indicator_summary)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "no indicator values yet".to_string());
            lines.push(Line::from(Span::raw(values)));
            lines.push(Line::from(Span::styled(
                format!("updated {}", format_time(m.updated_at)),
                theme.muted(),
            )));
        }
        None => lines.push(Line::from(Span::styled("Nothing selected", theme.muted()))),
    }
    lines.push(Line::from(vec![
        Span::styled("Mentor indicator: ", theme.muted()),
        Span::raw(mentor.to_string()),
    ]));

    let details = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Details ")
            .borders(Borders::ALL)
            .border_style(theme.border(false)),
    );
    frame.render_widget(details, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indicator_summary_sorts_and_marks_missing() {
        let values = HashMap::from([
            ("signal".to_string(), None),
            ("macd".to_string(), Some(0.1234)),
        ]);
        assert_eq!(indicator_summary(&values), "macd=0.12  signal=-");
        assert_eq!(indicator_summary(&HashMap::new()), "");
    }
}
