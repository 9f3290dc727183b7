//! Independently polled side feeds.

use crate::api::{Branding, Broker, ManualSignal, MentorIndicator, NewsItem, UpcomingAlert};

/// Each field is replaced wholesale by its own fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub manual_signal: Option<ManualSignal>,
    pub brokers: Vec<Broker>,
    pub news: Vec<NewsItem>,
    pub upcoming_alerts: Vec<UpcomingAlert>,
    pub mentor_indicators: Vec<MentorIndicator>,
    pub branding: Branding,
}

impl FeedState {
    /// Branded system name, or the default title.
    pub fn system_name(&self) -> &str {
        self.branding
            .system_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("eawatch")
    }

    pub fn selected_indicator(&self) -> Option<&MentorIndicator> {
        self.mentor_indicators.iter().find(|i| i.selected)
    }
}
