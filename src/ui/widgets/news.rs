//! Market news with the body of the highlighted item.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::{format_time, render_empty, truncate_string};
use crate::ui::Screen;

pub struct NewsList;

fn impact_style(impact: Option<&str>) -> Style {
    match impact.map(str::to_ascii_lowercase).as_deref() {
        Some("high") => Style::default().fg(Color::Red),
        Some("medium") => Style::default().fg(Color::Yellow),
        Some(_) => Style::default().fg(Color::Green),
        None => Style::default().fg(Color::DarkGray),
    }
}

impl NewsList {
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let Screen { ui, data, theme, .. } = screen;
        let news = &data.feeds.news;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let items: Vec<ListItem> = news
            .iter()
            .map(|item| {
                let impact = item.impact.as_deref();
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<13}", format_time(item.event_time)), theme.muted()),
                    Span::styled(format!("{:<7}", impact.unwrap_or("-")), impact_style(impact)),
                    Span::raw(format!("{:<8}", item.symbol.as_deref().unwrap_or(""))),
                    Span::raw(truncate_string(&item.title, 60)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" News ({}) ", news.len()))
                    .borders(Borders::ALL)
                    .border_style(theme.border(true)),
            )
            .highlight_style(theme.selected())
            .highlight_symbol("▶ ");

        let selected = (!news.is_empty()).then(|| ui.app.cursors.news.min(news.len() - 1));
        let mut state = ListState::default();
        state.select(selected);
        frame.render_stateful_widget(list, chunks[0], &mut state);

        if news.is_empty() {
            render_empty(frame, chunks[0], "No news right now.");
        }

        let body = selected
            .and_then(|i| news.get(i))
            .map(|item| {
                vec![
                    Line::from(Span::styled(item.title.clone(), theme.header())),
                    Line::from(""),
                    Line::from(item.body.clone().unwrap_or_default()),
                ]
            })
            .unwrap_or_default();

        let paragraph = Paragraph::new(body).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border(false)),
        );
        frame.render_widget(paragraph, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_impact_style_is_case_insensitive() {
        assert_eq!(impact_style(Some("HIGH")), Style::default().fg(Color::Red));
        assert_eq!(impact_style(Some("Medium")), Style::default().fg(Color::Yellow));
        assert_eq!(impact_style(Some("low")), Style::default().fg(Color::Green));
        assert_eq!(impact_style(None), Style::default().fg(Color::DarkGray));
    }
}
