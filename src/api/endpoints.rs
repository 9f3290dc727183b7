//! REST paths exposed by the signal backend.

use super::models::{LoginRole, MonitorStatus};

pub const USER_LOGIN: &str = "/api/auth/login";
pub const ADMIN_LOGIN: &str = "/api/admin/login";
pub const MONITORS: &str = "/api/ea";
pub const QUOTES: &str = "/api/quotes";
pub const SYMBOLS: &str = "/api/symbols";
pub const LATEST_SIGNAL: &str = "/api/user/signals/latest";
pub const BROKERS: &str = "/api/user/brokers";
pub const NEWS: &str = "/api/user/news";
pub const UPCOMING_ALERTS: &str = "/api/user/upcoming-news-alerts";
pub const MENTOR_INDICATORS: &str = "/api/user/mentor-indicators";
pub const SELECT_INDICATOR: &str = "/api/user/select-indicator";
pub const BRANDING: &str = "/api/branding";

pub fn login(role: LoginRole) -> &'static str {
    match role {
        LoginRole::User => USER_LOGIN,
        LoginRole::Admin => ADMIN_LOGIN,
    }
}

pub fn monitor(id: &str) -> String {
    format!("{MONITORS}/{id}")
}

/// `start` when asking for running, `stop` when asking for stopped.
pub fn monitor_transition(id: &str, target: MonitorStatus) -> String {
    let verb = match target {
        MonitorStatus::Running => "start",
        MonitorStatus::Stopped => "stop",
    };
    format!("{MONITORS}/{id}/{verb}")
}
