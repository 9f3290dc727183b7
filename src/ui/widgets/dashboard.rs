//! Dashboard: monitors at a glance, live quotes and upcoming alerts.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState},
};
use rust_decimal::Decimal;

use super::{format_price, render_empty, truncate_string};
use crate::ui::Screen;

pub struct Dashboard;

impl Dashboard {
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(7)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(columns[0]);

        render_signal(frame, left[0], screen);
        render_monitors(frame, left[1], screen);
        render_quotes(frame, columns[1], screen);
        render_alerts(frame, rows[1], screen);
    }
}

fn render_signal(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
    let theme = screen.theme;
    let line = match &screen.data.feeds.manual_signal {
        Some(signal) => Line::from(vec![
            Span::styled(signal.kind.to_string(), theme.signal(signal.kind)),
            Span::raw(format!(" {} @ {}", signal.symbol, format_price(signal.price))),
            Span::styled(
                signal
                    .message
                    .as_deref()
                    .map(|m| format!("  {m}"))
                    .unwrap_or_default(),
                theme.muted(),
            ),
        ]),
        None => Line::from(Span::styled("No manual signal", theme.muted())),
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(" Manual signal ")
            .borders(Borders::ALL)
            .border_style(theme.border(false)),
    );
    frame.render_widget(paragraph, area);
}

fn render_monitors(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
    let Screen { data, theme, .. } = screen;
    let monitors = data.monitors.monitors();

    let header = Row::new(["Name", "Symbol", "Status", "Signal"])
        .style(theme.header())
        .height(1);

    let rows = monitors.iter().map(|monitor| {
        let status_style = if monitor.is_running() {
            Style::default().fg(theme.buy)
        } else {
            theme.muted()
        };
        Row::new(vec![
            Cell::from(truncate_string(&monitor.name, 24)),
            Cell::from(monitor.config.symbol.clone()),
            Cell::from(monitor.status.to_string()).style(status_style),
            Cell::from(monitor.signal().to_string()).style(theme.signal(monitor.signal())),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(" Monitors ({}) ", monitors.len()))
            .borders(Borders::ALL)
            .border_style(theme.border(true)),
    )
    .row_highlight_style(theme.selected())
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(data.monitors.selected_index());
    frame.render_stateful_widget(table, area, &mut state);

    if monitors.is_empty() {
        render_empty(frame, area, "No monitors yet. Add one on the Monitors screen.");
    }
}

fn render_quotes(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
    let Screen { data, theme, keys, .. } = screen;
    let market = &data.market;

    let header = Row::new(["Symbol", "Price", "Change"])
        .style(theme.header())
        .height(1);

    let rows = market.quotes.iter().map(|quote| {
        let change_style = match quote.change {
            Some(c) if c > Decimal::ZERO => Style::default().fg(theme.buy),
            Some(c) if c < Decimal::ZERO => Style::default().fg(theme.sell),
            _ => theme.muted(),
        };
        Row::new(vec![
            Cell::from(quote.symbol.clone()),
            Cell::from(format_price(quote.display_price())),
            Cell::from(format_price(quote.change)).style(change_style),
        ])
    });

    let category = market.category.as_deref().unwrap_or("all");
    let title = format!(" Quotes [{category}] ({} to cycle) ", keys.cycle_category);
    let table = Table::new(
        rows,
        [
            Constraint::Min(8),
            Constraint::Length(12),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme.border(false)),
    );
    frame.render_widget(table, area);

    if market.quotes.is_empty() {
        render_empty(frame, area, "Waiting for quotes...");
    }
}

fn render_alerts(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
    let Screen { data, theme, .. } = screen;
    let items: Vec<ListItem> = data
        .feeds
        .upcoming_alerts
        .iter()
        .map(|alert| {
            let when = alert
                .minutes_until
                .map(|m| format!("in {m:>3}m "))
                .unwrap_or_else(|| "       ".to_string());
            let impact = alert.impact.as_deref().unwrap_or("");
            ListItem::new(Line::from(vec![
                Span::styled(when, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("{impact:<7}"), Style::default().fg(theme.sell)),
                Span::raw(alert.title.clone()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Upcoming news ")
            .borders(Borders::ALL)
            .border_style(theme.border(false)),
    );
    frame.render_widget(list, area);
}
