//! TUI widgets.

mod brokers;
mod confirm;
mod dashboard;
mod help;
mod indicators;
mod login;
mod monitor_form;
mod monitor_list;
mod news;
mod notifications;
mod signal_badge;
mod status_bar;
mod tab_bar;

pub use brokers::BrokerList;
pub use confirm::ConfirmDialog;
pub use dashboard::Dashboard;
pub use help::HelpPanel;
pub use indicators::IndicatorList;
pub use login::LoginScreen;
pub use monitor_form::AddMonitorDialog;
pub use monitor_list::MonitorList;
pub use news::NewsList;
pub use notifications::render_notification;
pub use signal_badge::SignalBadge;
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
};
use rust_decimal::Decimal;

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn format_price(price: Option<Decimal>) -> String {
    price.map(|p| p.normalize().to_string()).unwrap_or_else(|| "-".to_string())
}

fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%b %d %H:%M").to_string())
        .unwrap_or_default()
}

/// Centered hint inside an empty list.
fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    if area.height < 3 {
        return;
    }
    let line = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::ITALIC)),
        line,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_string("EURUSD", 10), "EURUSD");
        assert_eq!(truncate_string("Non-farm payrolls", 10), "Non-far...");
        assert_eq!(truncate_string("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(dec!(1.08420))), "1.0842");
        assert_eq!(format_price(None), "-");
    }
}
