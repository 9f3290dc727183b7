//! Recommended brokers.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use super::render_empty;
use crate::ui::Screen;

pub struct BrokerList;

impl BrokerList {
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let Screen { ui, data, theme, .. } = screen;
        let brokers = &data.feeds.brokers;

        let items: Vec<ListItem> = brokers
            .iter()
            .map(|broker| {
                let mut lines = vec![Line::from(vec![
                    Span::styled(broker.name.clone(), theme.header()),
                    Span::styled(
                        broker
                            .url
                            .as_deref()
                            .map(|u| format!("  {u}"))
                            .unwrap_or_default(),
                        theme.muted(),
                    ),
                ])];
                if let Some(description) = &broker.description {
                    lines.push(Line::from(format!("  {description}")));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" Brokers ({}) ", brokers.len()))
                    .borders(Borders::ALL)
                    .border_style(theme.border(true)),
            )
            .highlight_style(theme.selected())
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        if !brokers.is_empty() {
            state.select(Some(ui.app.cursors.brokers.min(brokers.len() - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);

        if brokers.is_empty() {
            render_empty(frame, area, "No brokers published yet.");
        }
    }
}
