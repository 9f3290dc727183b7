//! What each screen keeps fresh, and how often.

use super::{PollPlan, PollTask};
use crate::config::PollingConfig;
use crate::state::View;
use crate::store::EaStore;
use std::future::Future;
use std::time::Duration;

/// Refresh cadence classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Monitors and quotes.
    Fast,
    /// Signals, alerts, indicator state.
    Medium,
    /// Branding, brokers, news.
    Slow,
}

impl Tier {
    pub fn period(self, cadence: &PollingConfig) -> Duration {
        match self {
            Self::Fast => cadence.fast(),
            Self::Medium => cadence.medium(),
            Self::Slow => cadence.slow(),
        }
    }
}

fn every<F, Fut>(
    name: &'static str,
    tier: Tier,
    cadence: &PollingConfig,
    store: &EaStore,
    job: F,
) -> PollTask
where
    F: Fn(EaStore) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let store = store.clone();
    PollTask::every(name, tier.period(cadence), move || job(store.clone()))
}

fn once<F, Fut>(name: &'static str, store: &EaStore, job: F) -> PollTask
where
    F: Fn(EaStore) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let store = store.clone();
    PollTask::once(name, move || job(store.clone()))
}

/// Build the refresh plan for `view`.
pub fn screen_plan(view: View, store: &EaStore, cadence: &PollingConfig) -> PollPlan {
    use Tier::{Fast, Medium, Slow};

    match view {
        View::Login => PollPlan::new().with(every("branding", Slow, cadence, store, |s| async move {
            s.fetch_branding().await
        })),
        View::Dashboard => PollPlan::new()
            .with(every("monitors", Fast, cadence, store, |s| async move {
                s.fetch_monitors().await
            }))
            .with(every("quotes", Fast, cadence, store, |s| async move {
                s.refresh_quotes().await
            }))
            .with(every("manual-signal", Medium, cadence, store, |s| async move {
                s.fetch_manual_signal().await
            }))
            .with(every("upcoming-alerts", Medium, cadence, store, |s| async move {
                s.fetch_upcoming_alerts().await
            }))
            .with(every("branding", Slow, cadence, store, |s| async move {
                s.fetch_branding().await
            }))
            .with(once("symbols", store, |s| async move {
                s.fetch_symbol_catalog().await
            })),
        View::Monitors => PollPlan::new()
            .with(every("monitors", Fast, cadence, store, |s| async move {
                s.fetch_monitors().await
            }))
            .with(every("mentor-indicators", Medium, cadence, store, |s| async move {
                s.fetch_mentor_indicators().await
            }))
            .with(once("symbols", store, |s| async move {
                s.fetch_symbol_catalog().await
            })),
        View::Brokers => PollPlan::new().with(every("brokers", Slow, cadence, store, |s| async move {
            s.fetch_brokers().await
        })),
        View::News => PollPlan::new()
            .with(every("upcoming-alerts", Medium, cadence, store, |s| async move {
                s.fetch_upcoming_alerts().await
            }))
            .with(every("news", Slow, cadence, store, |s| async move {
                s.fetch_news().await
            })),
        View::Indicators => PollPlan::new().with(every(
            "mentor-indicators",
            Medium,
            cadence,
            store,
            |s| async move { s.fetch_mentor_indicators().await },
        )),
    }
}
