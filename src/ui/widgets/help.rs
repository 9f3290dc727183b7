//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::config::KeyBindings;
use crate::ui::centered_rect;

/// Help panel showing keybindings.
pub struct HelpPanel;

fn section(title: &str) -> [Line<'_>; 2] {
    [
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ]
}

fn entry<'a>(key: &str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {key:<8}"), Style::default().fg(Color::Cyan)),
        Span::raw(description),
    ])
}

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let mut help_text = Vec::new();
        help_text.extend(section("Navigation"));
        help_text.extend([
            entry(&format!("{}/↓", keys.down), "Move down"),
            entry(&format!("{}/↑", keys.up), "Move up"),
            entry(&keys.select, "Select / submit"),
            entry(&keys.back, "Back / cancel"),
            entry(&keys.dashboard, "Dashboard"),
            entry(&keys.monitors, "Monitors"),
            entry(&keys.brokers, "Brokers"),
            entry(&keys.news, "News"),
            entry(&keys.indicators, "Mentor indicators"),
            Line::from(""),
        ]);
        help_text.extend(section("Monitors"));
        help_text.extend([
            entry(&keys.add_monitor, "Add monitor (Monitors screen)"),
            entry(&keys.toggle_monitor, "Start / stop selected"),
            entry(&keys.delete_monitor, "Delete selected"),
            entry(&keys.cycle_category, "Cycle quote category (Dashboard)"),
            Line::from(""),
        ]);
        help_text.extend(section("Signal badge"));
        help_text.extend([
            entry(&keys.toggle_overlay, "Expand / collapse"),
            entry("click", "Expand / collapse"),
            entry("drag", "Move the badge"),
            Line::from(""),
        ]);
        help_text.extend(section("Actions"));
        help_text.extend([
            entry(&keys.refresh, "Refresh now"),
            entry(&keys.logout, "Sign out"),
            entry(&keys.help, "Toggle help"),
            entry(&keys.quit, "Quit"),
            entry("Ctrl+c", "Quit from anywhere"),
        ]);

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}
