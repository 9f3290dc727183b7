//! Add-monitor form popup.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::state::MonitorField;
use crate::ui::{Screen, centered_box};

pub struct AddMonitorDialog;

impl AddMonitorDialog {
    pub fn render(frame: &mut Frame, area: Rect, screen: Screen<'_>) {
        let form = &screen.ui.monitor_form;
        let popup = centered_box(50, 11, area);
        frame.render_widget(Clear, popup);

        let field = |label: &str, value: String, field: MonitorField, choice: bool| {
            let focused = form.focus == field;
            let label_style = if focused {
                Style::default()
                    .fg(screen.theme.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let value = match (focused, choice) {
                (true, true) => format!("◀ {value} ▶"),
                (true, false) => format!("{value}▏"),
                _ => value,
            };
            Line::from(vec![
                Span::styled(format!("{label:<11}"), label_style),
                Span::raw(value),
            ])
        };

        let symbols = screen.data.market.all_symbols().take(6).collect::<Vec<_>>();
        let hint = if symbols.is_empty() {
            String::new()
        } else {
            format!("e.g. {}", symbols.join(", "))
        };

        let lines = vec![
            field("Name", form.name.value().to_string(), MonitorField::Name, false),
            Line::from(""),
            field("Symbol", form.symbol.value().to_string(), MonitorField::Symbol, false),
            Line::from(Span::styled(format!("           {hint}"), screen.theme.muted())),
            field("Timeframe", form.timeframe().to_string(), MonitorField::Timeframe, true),
            Line::from(""),
            field("Indicator", form.indicator().to_string(), MonitorField::Indicator, true),
            Line::from(""),
            Line::from(Span::styled(
                "Tab next field · ←/→ change · Enter create · Esc cancel",
                screen.theme.muted(),
            )),
        ];

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" New monitor ")
                .borders(Borders::ALL)
                .border_style(screen.theme.border(true)),
        );
        frame.render_widget(paragraph, popup);
    }
}
