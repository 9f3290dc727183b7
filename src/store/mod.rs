//! Client state store.
//!
//! [`EaStore`] is the single source of truth for data mirrored from the
//! backend: monitors, quotes, the symbol catalog and the side feeds. Screens
//! read it through [`EaStore::read`] / [`EaStore::snapshot`] and change it only
//! through its operations. Changes are announced as [`StoreEvent`]s on the
//! channel handed to [`EaStore::new`].
//!
//! The store is a cheap clonable handle, so polling tasks can each own one.
//! The state lock is never held across a request.

mod feeds;
mod fence;
mod market;
mod monitors;

pub use feeds::FeedState;
pub use fence::{RequestFence, Resource, Ticket};
pub use market::MarketState;
pub use monitors::MonitorState;

#[cfg(test)]
pub(crate) use monitors::tests::monitor as test_monitor;

use crate::api::{
    Backend, Broker, ManualSignal, MentorIndicator, Monitor, MonitorConfig, NewMonitor, NewsItem,
    UpcomingAlert,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{AuthFailure, Session};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;


/// Notifications emitted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A resource's cached value changed.
    Changed(Resource),
    /// The error flag was set or cleared.
    ErrorChanged,
    /// Everything was cleared.
    Reset,
    /// The backend revoked our session. Sent once per revocation.
    ForcedLogout,
}

/// A non-fatal failure remembered until the same resource next succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub resource: Option<Resource>,
    pub message: String,
}

/// Everything the store caches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub monitors: MonitorState,
    pub market: MarketState,
    pub feeds: FeedState,
    pub error: Option<StoreError>,
}

/// Construction-time store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Drop a response if a newer request for the same resource was issued
    /// before it arrived.
    pub ordered_responses: bool,
    /// Quote category filter the store starts with, and returns to on reset.
    pub default_quote_category: Option<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            ordered_responses: true,
            default_quote_category: None,
        }
    }
}

impl From<&Config> for StoreOptions {
    fn from(config: &Config) -> Self {
        Self {
            ordered_responses: config.polling.discard_stale_responses,
            default_quote_category: config.ui.default_quote_category.clone(),
        }
    }
}

impl StoreOptions {
    fn initial_state(&self) -> StoreState {
        let mut state = StoreState::default();
        state.market.category = self.default_quote_category.clone();
        state
    }
}

struct Inner {
    backend: Arc<dyn Backend>,
    session: Session,
    options: StoreOptions,
    state: RwLock<StoreState>,
    fence: RequestFence,
    events: mpsc::UnboundedSender<StoreEvent>,
}

/// Shared handle to the client state store.
#[derive(Clone)]
pub struct EaStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for EaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EaStore")
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl EaStore {
    /// Create a store.
    pub fn new(
        backend: Arc<dyn Backend>,
        session: Session,
        events: mpsc::UnboundedSender<StoreEvent>,
        options: StoreOptions,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                session,
                state: RwLock::new(options.initial_state()),
                fence: RequestFence::new(options.ordered_responses),
                events,
                options,
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.read(Clone::clone)
    }

    fn write<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let mut guard = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn emit(&self, event: StoreEvent) {
        if self.inner.events.send(event).is_err() {
            tracing::trace!("store event dropped, no subscriber");
        }
    }

    fn backend(&self) -> &dyn Backend {
        self.inner.backend.as_ref()
    }

    fn token(&self) -> Result<String> {
        self.inner
            .session
            .token()
            .ok_or(Error::NotSignedIn)
    }

    /// Route a 403 through the session. A revoked session wipes the store
    /// and signals the UI to go back to login.
    fn guard<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Err(Error::Forbidden(message)) => match self.inner.session.on_forbidden() {
                AuthFailure::AlreadyLoggedOut => Err(Error::Forbidden(message)),
                AuthFailure::Revoked => {
                    self.clear_state();
                    self.emit(StoreEvent::ForcedLogout);
                    Err(Error::AccountInactive)
                }
            },
            other => other,
        }
    }

    /// Apply a fetch result if its ticket is still current.
    fn settle<T>(
        &self,
        ticket: Ticket,
        result: Result<T>,
        apply: impl FnOnce(&mut StoreState, T),
    ) {
        let resource = ticket.resource;
        match result {
            Ok(value) => {
                if !self.inner.fence.is_current(&ticket) {
                    tracing::debug!(%resource, "dropping superseded response");
                    return;
                }
                let cleared = self.write(|state| {
                    apply(state, value);
                    let stale = state
                        .error
                        .as_ref()
                        .is_some_and(|e| e.resource == Some(resource));
                    if stale {
                        state.error = None;
                    }
                    stale
                });
                self.emit(StoreEvent::Changed(resource));
                if cleared {
                    self.emit(StoreEvent::ErrorChanged);
                }
            }
            Err(e) => self.record_failure(Some(resource), &e),
        }
    }

    fn record_failure(&self, resource: Option<Resource>, error: &Error) {
        match error {
            // Handled by the guard, or expected noise after sign-out.
            Error::AccountInactive | Error::Forbidden(_) => {
                tracing::debug!(?resource, %error, "authorization failure");
            }
            Error::NotSignedIn => {
                tracing::debug!(?resource, "skipped, not signed in");
            }
            _ => {
                tracing::warn!(?resource, %error, "store operation failed");
                self.write(|state| {
                    state.error = Some(StoreError {
                        resource,
                        message: error.user_message(),
                    });
                });
                self.emit(StoreEvent::ErrorChanged);
            }
        }
    }

    fn clear_state(&self) {
        self.inner.fence.invalidate_all();
        self.write(|state| *state = self.inner.options.initial_state());
        self.emit(StoreEvent::Reset);
    }

    // ---------------------------------------------------------------------
    // Monitors
    // ---------------------------------------------------------------------

    /// Refresh the monitor list. Failures are recorded, never returned.
    pub async fn fetch_monitors(&self) {
        let ticket = self.inner.fence.begin(Resource::Monitors);
        let result: Result<Vec<Monitor>> = async {
            let token = self.token()?;
            self.guard(self.backend().list_monitors(&token).await)
        }
        .await;
        self.settle(ticket, result, |state, monitors| {
            state.monitors.replace_all(monitors)
        });
    }

    /// Create a monitor, append it and select it.
    pub async fn add_monitor(&self, name: &str, config: MonitorConfig) -> Result<Monitor> {
        let result: Result<Monitor> = async {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::invalid_input("Name is required"));
            }
            if config.symbol.trim().is_empty() {
                return Err(Error::invalid_input("Symbol is required"));
            }
            let token = self.token()?;
            let body = NewMonitor {
                name: name.to_string(),
                config,
            };
            self.guard(self.backend().create_monitor(&token, &body).await)
        }
        .await;

        match result {
            Ok(monitor) => {
                self.inner.fence.invalidate(Resource::Monitors);
                self.write(|state| state.monitors.push_selected(monitor.clone()));
                tracing::info!(id = %monitor.id, name = %monitor.name, "monitor created");
                self.emit(StoreEvent::Changed(Resource::Monitors));
                Ok(monitor)
            }
            Err(e) => {
                self.record_failure(None, &e);
                Err(e)
            }
        }
    }

    /// Delete a monitor. A deleted selection falls back to the first monitor.
    pub async fn delete_monitor(&self, id: &str) -> Result<()> {
        let result: Result<()> = async {
            let token = self.token()?;
            self.guard(self.backend().delete_monitor(&token, id).await)
        }
        .await;

        match result {
            Ok(()) => {
                self.inner.fence.invalidate(Resource::Monitors);
                self.write(|state| state.monitors.remove(id));
                tracing::info!(%id, "monitor deleted");
                self.emit(StoreEvent::Changed(Resource::Monitors));
                Ok(())
            }
            Err(e) => {
                self.record_failure(None, &e);
                Err(e)
            }
        }
    }

    /// Stop a running monitor or start a stopped one, then take the server's
    /// version of it.
    pub async fn toggle_monitor_status(&self, id: &str) -> Result<Monitor> {
        let result: Result<Monitor> = async {
            let current = self
                .read(|state| state.monitors.get(id).map(|m| m.status))
                .ok_or_else(|| Error::invalid_input(format!("Unknown monitor {id}")))?;
            let target = current.toggled();
            let token = self.token()?;
            tracing::debug!(%id, from = %current, to = %target, "toggling monitor");
            self.guard(self.backend().set_monitor_status(&token, id, target).await)
        }
        .await;

        match result {
            Ok(monitor) => {
                self.inner.fence.invalidate(Resource::Monitors);
                self.write(|state| state.monitors.replace_one(monitor.clone()));
                self.emit(StoreEvent::Changed(Resource::Monitors));
                Ok(monitor)
            }
            Err(e) => {
                self.record_failure(None, &e);
                Err(e)
            }
        }
    }

    /// Local selection change. Unknown ids are ignored.
    pub fn select_monitor(&self, id: &str) -> bool {
        let changed = self.write(|state| state.monitors.select(id));
        if changed {
            self.emit(StoreEvent::Changed(Resource::Monitors));
        }
        changed
    }

    /// Move the selection up or down the list.
    pub fn select_monitor_offset(&self, delta: i32) {
        self.write(|state| state.monitors.select_offset(delta));
        self.emit(StoreEvent::Changed(Resource::Monitors));
    }

    // ---------------------------------------------------------------------
    // Market data
    // ---------------------------------------------------------------------

    /// Refresh quotes, optionally for one category. Unauthenticated.
    pub async fn fetch_quotes(&self, category: Option<&str>) {
        let ticket = self.inner.fence.begin(Resource::Quotes);
        let result = self.backend().quotes(category.map(str::to_string)).await;
        self.settle(ticket, result, |state, quotes| state.market.set_quotes(quotes));
    }

    /// Refresh quotes for the remembered category filter.
    pub async fn refresh_quotes(&self) {
        let category = self.read(|state| state.market.category.clone());
        self.fetch_quotes(category.as_deref()).await;
    }

    /// Remember the quote category filter used by [`Self::refresh_quotes`].
    pub fn set_quote_category(&self, category: Option<String>) {
        self.write(|state| state.market.category = category);
        self.inner.fence.invalidate(Resource::Quotes);
        self.emit(StoreEvent::Changed(Resource::Quotes));
    }

    /// Refresh the symbol catalog. Unauthenticated.
    pub async fn fetch_symbol_catalog(&self) {
        let ticket = self.inner.fence.begin(Resource::Catalog);
        let result = self.backend().symbol_catalog().await;
        self.settle(ticket, result, |state, catalog| state.market.catalog = catalog);
    }

    // ---------------------------------------------------------------------
    // Feeds
    // ---------------------------------------------------------------------

    pub async fn fetch_manual_signal(&self) {
        let ticket = self.inner.fence.begin(Resource::ManualSignal);
        let result: Result<Option<ManualSignal>> = async {
            let token = self.token()?;
            self.guard(self.backend().latest_manual_signal(&token).await)
        }
        .await;
        self.settle(ticket, result, |state, signal| state.feeds.manual_signal = signal);
    }

    pub async fn fetch_brokers(&self) {
        let ticket = self.inner.fence.begin(Resource::Brokers);
        let result: Result<Vec<Broker>> = async {
            let token = self.token()?;
            self.guard(self.backend().brokers(&token).await)
        }
        .await;
        self.settle(ticket, result, |state, brokers| state.feeds.brokers = brokers);
    }

    pub async fn fetch_news(&self) {
        let ticket = self.inner.fence.begin(Resource::News);
        let result: Result<Vec<NewsItem>> = async {
            let token = self.token()?;
            self.guard(self.backend().news(&token).await)
        }
        .await;
        self.settle(ticket, result, |state, news| state.feeds.news = news);
    }

    pub async fn fetch_upcoming_alerts(&self) {
        let ticket = self.inner.fence.begin(Resource::UpcomingAlerts);
        let result: Result<Vec<UpcomingAlert>> = async {
            let token = self.token()?;
            self.guard(self.backend().upcoming_alerts(&token).await)
        }
        .await;
        self.settle(ticket, result, |state, alerts| {
            state.feeds.upcoming_alerts = alerts
        });
    }

    pub async fn fetch_mentor_indicators(&self) {
        let ticket = self.inner.fence.begin(Resource::MentorIndicators);
        let result: Result<Vec<MentorIndicator>> = async {
            let token = self.token()?;
            self.guard(self.backend().mentor_indicators(&token).await)
        }
        .await;
        self.settle(ticket, result, |state, indicators| {
            state.feeds.mentor_indicators = indicators
        });
    }

    /// Choose a mentor indicator, then reload the list to pick up the flag.
    pub async fn select_mentor_indicator(&self, id: &str) -> Result<()> {
        let result: Result<()> = async {
            let token = self.token()?;
            self.guard(self.backend().select_mentor_indicator(&token, id).await)
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!(%id, "mentor indicator selected");
                self.fetch_mentor_indicators().await;
                Ok(())
            }
            Err(e) => {
                self.record_failure(None, &e);
                Err(e)
            }
        }
    }

    /// Refresh branding. Unauthenticated.
    pub async fn fetch_branding(&self) {
        let ticket = self.inner.fence.begin(Resource::Branding);
        let result = self.backend().branding().await;
        self.settle(ticket, result, |state, branding| state.feeds.branding = branding);
    }

    // ---------------------------------------------------------------------
    // Housekeeping
    // ---------------------------------------------------------------------

    pub fn clear_error(&self) {
        let had_error = self.write(|state| state.error.take().is_some());
        if had_error {
            self.emit(StoreEvent::ErrorChanged);
        }
    }

    /// Back to the initial state. In-flight responses are discarded.
    pub fn reset(&self) {
        self.clear_state();
    }
}

#[cfg(test)]
mod tests {
    use super::monitors::tests::monitor;
    use super::*;
    use crate::api::{MockBackend, MonitorStatus, Quote, SignalKind};
    use crate::session::{MemoryCredentialStore, SlowCredentialStore};
    use pretty_assertions::assert_eq;

    fn signed_in() -> Session {
        Session::new(Arc::new(MemoryCredentialStore::with_token("tok")))
    }

    fn store_with(
        backend: MockBackend,
        session: Session,
    ) -> (EaStore, mpsc::UnboundedReceiver<StoreEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EaStore::new(Arc::new(backend), session, tx, StoreOptions::default()), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<StoreEvent>) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn ids(store: &EaStore) -> Vec<String> {
        store.read(|s| s.monitors.monitors().iter().map(|m| m.id.clone()).collect())
    }

    #[tokio::test]
    async fn test_fetch_selects_first_when_nothing_selected() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_monitors()
            .withf(|token| token == "tok")
            .returning(|_| Ok(vec![monitor("a", MonitorStatus::Stopped)]));

        let (store, mut rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;

        assert_eq!(store.read(|s| s.monitors.selected_id().map(str::to_string)), Some("a".into()));
        assert_eq!(drain(&mut rx), vec![StoreEvent::Changed(Resource::Monitors)]);
    }

    #[tokio::test]
    async fn test_fetch_replaces_wholesale() {
        let mut backend = MockBackend::new();
        let mut seq = mockall::Sequence::new();
        backend
            .expect_list_monitors()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(vec![
                    monitor("a", MonitorStatus::Stopped),
                    monitor("b", MonitorStatus::Running),
                ])
            });
        let second = vec![monitor("c", MonitorStatus::Running)];
        let expected = second.clone();
        backend
            .expect_list_monitors()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(second.clone()));

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;
        store.fetch_monitors().await;

        assert_eq!(store.read(|s| s.monitors.monitors().to_vec()), expected);
        assert_eq!(store.read(|s| s.monitors.selected_id().map(str::to_string)), Some("c".into()));
    }

    #[tokio::test]
    async fn test_delete_selected_reselects_first() {
        let mut backend = MockBackend::new();
        backend.expect_list_monitors().returning(|_| {
            Ok(vec![
                monitor("a", MonitorStatus::Stopped),
                monitor("b", MonitorStatus::Stopped),
            ])
        });
        backend
            .expect_delete_monitor()
            .withf(|_, id| id == "a")
            .times(1)
            .returning(|_, _| Ok(()));

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;
        store.delete_monitor("a").await.unwrap();

        assert_eq!(ids(&store), vec!["b".to_string()]);
        assert_eq!(store.read(|s| s.monitors.selected_id().map(str::to_string)), Some("b".into()));
    }

    #[tokio::test]
    async fn test_delete_only_monitor_clears_selection() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_monitors()
            .returning(|_| Ok(vec![monitor("a", MonitorStatus::Stopped)]));
        backend.expect_delete_monitor().returning(|_, _| Ok(()));

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;
        store.delete_monitor("a").await.unwrap();

        assert!(ids(&store).is_empty());
        assert_eq!(store.read(|s| s.monitors.selected_id().map(str::to_string)), None);
    }

    #[tokio::test]
    async fn test_delete_failure_sets_flag_and_returns_error() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_monitors()
            .returning(|_| Ok(vec![monitor("a", MonitorStatus::Stopped)]));
        backend
            .expect_delete_monitor()
            .returning(|_, _| Err(Error::from_status(500, None)));

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;
        let err = store.delete_monitor("a").await.unwrap_err();

        assert!(matches!(err, Error::Server { status: 500, .. }));
        assert_eq!(ids(&store), vec!["a".to_string()]);
        assert!(store.read(|s| s.error.is_some()));
    }

    #[tokio::test]
    async fn test_toggle_running_sends_stop() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_monitors()
            .returning(|_| Ok(vec![monitor("a", MonitorStatus::Running)]));

        let mut stopped = monitor("a", MonitorStatus::Stopped);
        stopped.last_signal = Some(SignalKind::Neutral);
        let returned = stopped.clone();
        backend
            .expect_set_monitor_status()
            .withf(|_, id, target| id == "a" && *target == MonitorStatus::Stopped)
            .times(1)
            .returning(move |_, _, _| Ok(returned.clone()));

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;
        let updated = store.toggle_monitor_status("a").await.unwrap();

        assert_eq!(updated, stopped);
        assert_eq!(store.read(|s| s.monitors.get("a").cloned()), Some(stopped));
    }

    #[tokio::test]
    async fn test_toggle_stopped_sends_start() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_monitors()
            .returning(|_| Ok(vec![monitor("a", MonitorStatus::Stopped)]));
        backend
            .expect_set_monitor_status()
            .withf(|_, _, target| *target == MonitorStatus::Running)
            .times(1)
            .returning(|_, _, _| Ok(monitor("a", MonitorStatus::Running)));

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;
        store.toggle_monitor_status("a").await.unwrap();

        assert!(store.read(|s| s.monitors.get("a").is_some_and(Monitor::is_running)));
    }

    #[tokio::test]
    async fn test_toggle_unknown_monitor_sends_nothing() {
        let backend = MockBackend::new();
        let (store, _rx) = store_with(backend, signed_in());
        let err = store.toggle_monitor_status("ghost").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_add_appends_and_selects() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_monitors()
            .returning(|_| Ok(vec![monitor("a", MonitorStatus::Stopped)]));
        backend
            .expect_create_monitor()
            .withf(|_, body| body.name == "Gold" && body.config.symbol == "XAUUSD")
            .returning(|_, _| Ok(monitor("new", MonitorStatus::Stopped)));

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;
        let config = MonitorConfig {
            symbol: "XAUUSD".into(),
            timeframe: "H1".into(),
            ..Default::default()
        };
        store.add_monitor(" Gold ", config).await.unwrap();

        assert_eq!(ids(&store), vec!["a".to_string(), "new".to_string()]);
        assert_eq!(
            store.read(|s| s.monitors.selected_id().map(str::to_string)),
            Some("new".into())
        );
    }

    #[tokio::test]
    async fn test_add_rejection_carries_server_message() {
        let mut backend = MockBackend::new();
        backend.expect_create_monitor().returning(|_, _| {
            Err(Error::from_status(400, Some("Limit reached".into())))
        });

        let (store, mut rx) = store_with(backend, signed_in());
        let config = MonitorConfig {
            symbol: "EURUSD".into(),
            ..Default::default()
        };
        let err = store.add_monitor("X", config).await.unwrap_err();

        assert_eq!(err.user_message(), "Limit reached");
        assert_eq!(
            store.read(|s| s.error.as_ref().map(|e| e.message.clone())),
            Some("Limit reached".into())
        );
        assert_eq!(drain(&mut rx), vec![StoreEvent::ErrorChanged]);
    }

    #[tokio::test]
    async fn test_forbidden_without_token_is_silent() {
        let backend = MockBackend::new();
        let (store, mut rx) = store_with(backend, Session::in_memory());

        store.fetch_monitors().await;

        assert!(drain(&mut rx).is_empty());
        assert!(store.read(|s| s.error.is_none()));
    }

    #[tokio::test]
    async fn test_forbidden_after_token_cleared_in_flight_is_silent() {
        let credentials = Arc::new(MemoryCredentialStore::with_token("tok"));
        let session = Session::new(credentials.clone());
        let mut backend = MockBackend::new();
        let cleared = credentials.clone();
        backend.expect_list_monitors().returning(move |_| {
            // The user signs out while this request is on the wire.
            use crate::session::CredentialStore;
            cleared.clear().unwrap();
            Err(Error::Forbidden(None))
        });

        let (store, mut rx) = store_with(backend, session);
        store.fetch_monitors().await;

        assert!(!drain(&mut rx).contains(&StoreEvent::ForcedLogout));
        assert!(store.read(|s| s.error.is_none()));
    }

    #[tokio::test]
    async fn test_forbidden_with_token_forces_logout_once() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_monitors()
            .returning(|_| Err(Error::Forbidden(Some("Account deactivated".into()))));
        backend
            .expect_brokers()
            .returning(|_| Err(Error::Forbidden(None)));

        let session = signed_in();
        let (store, mut rx) = store_with(backend, session.clone());
        store.fetch_monitors().await;
        // A second poll after the wipe must not navigate again.
        store.fetch_brokers().await;

        assert!(!session.is_signed_in());
        let logouts = drain(&mut rx)
            .into_iter()
            .filter(|e| *e == StoreEvent::ForcedLogout)
            .count();
        assert_eq!(logouts, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_parallel_forbidden_responses_force_logout_once() {
        let barrier = Arc::new(std::sync::Barrier::new(2));
        let mut backend = MockBackend::new();
        let gate = barrier.clone();
        backend.expect_list_monitors().returning(move |_| {
            gate.wait();
            Err(Error::Forbidden(None))
        });
        let gate = barrier.clone();
        backend.expect_latest_manual_signal().returning(move |_| {
            gate.wait();
            Err(Error::Forbidden(None))
        });

        let session = Session::new(Arc::new(SlowCredentialStore::with_token(
            "tok",
            std::time::Duration::from_millis(50),
        )));
        let (store, mut rx) = store_with(backend, session.clone());
        let monitors = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_monitors().await }
        });
        let signal = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_manual_signal().await }
        });
        monitors.await.unwrap();
        signal.await.unwrap();

        assert!(!session.is_signed_in());
        let logouts = drain(&mut rx)
            .into_iter()
            .filter(|e| *e == StoreEvent::ForcedLogout)
            .count();
        assert_eq!(logouts, 1);
    }

    #[tokio::test]
    async fn test_server_auth_error_is_recorded() {
        let mut backend = MockBackend::new();
        backend
            .expect_list_monitors()
            .returning(|_| Err(Error::auth("Not signed in")));

        let (store, mut rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;

        assert!(store.read(|s| s.error.is_some()));
        assert_eq!(drain(&mut rx), vec![StoreEvent::ErrorChanged]);
    }

    #[tokio::test]
    async fn test_mutation_after_revocation_returns_account_inactive() {
        let mut backend = MockBackend::new();
        backend
            .expect_delete_monitor()
            .returning(|_, _| Err(Error::Forbidden(None)));

        let (store, _rx) = store_with(backend, signed_in());
        let err = store.delete_monitor("a").await.unwrap_err();
        assert!(matches!(err, Error::AccountInactive));
    }

    #[tokio::test]
    async fn test_transient_failure_sets_flag_and_success_clears_it() {
        let mut backend = MockBackend::new();
        let mut seq = mockall::Sequence::new();
        backend
            .expect_quotes()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(Error::Timeout));
        backend
            .expect_quotes()
            .withf(|category| category.as_deref() == Some("forex"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(vec![Quote {
                    symbol: "EURUSD".into(),
                    category: Some("forex".into()),
                    bid: None,
                    ask: None,
                    close: None,
                    change: None,
                    timestamp: None,
                }])
            });

        // Quotes are public: no token needed.
        let (store, _rx) = store_with(backend, Session::in_memory());
        store.fetch_quotes(None).await;
        assert_eq!(
            store.read(|s| s.error.as_ref().and_then(|e| e.resource)),
            Some(Resource::Quotes)
        );

        store.set_quote_category(Some("forex".into()));
        store.refresh_quotes().await;
        assert!(store.read(|s| s.error.is_none()));
        assert_eq!(store.read(|s| s.market.quotes.len()), 1);
    }

    #[tokio::test]
    async fn test_reset_restores_default_quote_category() {
        let mut backend = MockBackend::new();
        backend
            .expect_quotes()
            .withf(|category| category.as_deref() == Some("metals"))
            .times(2)
            .returning(|_| Ok(Vec::new()));

        let (tx, _rx) = mpsc::unbounded_channel();
        let options = StoreOptions {
            default_quote_category: Some("metals".into()),
            ..Default::default()
        };
        let store = EaStore::new(Arc::new(backend), signed_in(), tx, options);
        store.refresh_quotes().await;

        store.set_quote_category(Some("forex".into()));
        store.reset();
        assert_eq!(store.read(|s| s.market.category.clone()), Some("metals".into()));
        store.refresh_quotes().await;
    }

    #[test]
    fn test_options_follow_config() {
        let mut config = Config::default();
        config.polling.discard_stale_responses = false;
        config.ui.default_quote_category = Some("crypto".into());

        let options = StoreOptions::from(&config);
        assert!(!options.ordered_responses);
        assert_eq!(options.default_quote_category.as_deref(), Some("crypto"));
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_response() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let store_slot: Arc<std::sync::OnceLock<EaStore>> = Arc::new(std::sync::OnceLock::new());
        let slot = store_slot.clone();

        let mut backend = MockBackend::new();
        backend.expect_latest_manual_signal().returning(move |_| {
            // Sign-out lands before the response does.
            if let Some(store) = slot.get() {
                store.reset();
            }
            Ok(Some(ManualSignal {
                id: "m".into(),
                symbol: "EURUSD".into(),
                kind: SignalKind::Buy,
                price: None,
                message: None,
                created_at: None,
            }))
        });

        let options = StoreOptions {
            ordered_responses: false,
            ..Default::default()
        };
        let store = EaStore::new(Arc::new(backend), signed_in(), tx, options);
        store_slot.set(store.clone()).unwrap();
        store.fetch_manual_signal().await;

        assert!(store.read(|s| s.feeds.manual_signal.is_none()));
    }

    #[tokio::test]
    async fn test_select_mentor_indicator_refetches() {
        let mut backend = MockBackend::new();
        backend
            .expect_select_mentor_indicator()
            .withf(|_, id| id == "ind-1")
            .times(1)
            .returning(|_, _| Ok(()));
        backend.expect_mentor_indicators().times(1).returning(|_| {
            Ok(vec![crate::api::MentorIndicator {
                id: "ind-1".into(),
                name: "Trend Pro".into(),
                description: None,
                mentor_name: None,
                selected: true,
                current_signal: None,
            }])
        });

        let (store, _rx) = store_with(backend, signed_in());
        store.select_mentor_indicator("ind-1").await.unwrap();

        assert_eq!(
            store.read(|s| s.feeds.selected_indicator().map(|i| i.id.clone())),
            Some("ind-1".into())
        );
    }

    #[tokio::test]
    async fn test_select_monitor_is_local() {
        let mut backend = MockBackend::new();
        backend.expect_list_monitors().times(1).returning(|_| {
            Ok(vec![
                monitor("a", MonitorStatus::Stopped),
                monitor("b", MonitorStatus::Stopped),
            ])
        });

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_monitors().await;
        assert!(store.select_monitor("b"));
        assert!(!store.select_monitor("zzz"));
        assert_eq!(store.read(|s| s.monitors.selected_id().map(str::to_string)), Some("b".into()));
    }

    #[tokio::test]
    async fn test_symbol_catalog_is_public() {
        let mut backend = MockBackend::new();
        backend.expect_symbol_catalog().times(1).returning(|| {
            Ok([("forex".to_string(), vec!["EURUSD".to_string(), "GBPUSD".to_string()])]
                .into_iter()
                .collect())
        });

        let (store, mut rx) = store_with(backend, Session::in_memory());
        store.fetch_symbol_catalog().await;

        assert_eq!(
            store.read(|s| s.market.all_symbols().map(str::to_string).collect::<Vec<_>>()),
            vec!["EURUSD".to_string(), "GBPUSD".to_string()]
        );
        assert_eq!(drain(&mut rx), vec![StoreEvent::Changed(Resource::Catalog)]);
    }

    #[tokio::test]
    async fn test_feeds_are_skipped_when_signed_out() {
        // No expectations: any backend call would panic.
        let (store, mut rx) = store_with(MockBackend::new(), Session::in_memory());
        store.fetch_manual_signal().await;
        store.fetch_brokers().await;
        store.fetch_news().await;
        store.fetch_upcoming_alerts().await;
        store.fetch_mentor_indicators().await;

        assert!(store.read(|s| s.error.is_none()));
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_feeds_replace_wholesale() {
        let mut backend = MockBackend::new();
        backend.expect_brokers().times(1).returning(|_| {
            Ok(vec![Broker {
                id: "b1".into(),
                name: "Acme FX".into(),
                url: None,
                description: None,
            }])
        });
        backend.expect_news().times(1).returning(|_| Ok(Vec::new()));
        backend
            .expect_latest_manual_signal()
            .times(1)
            .returning(|_| Ok(None));

        let (store, _rx) = store_with(backend, signed_in());
        store.fetch_brokers().await;
        store.fetch_news().await;
        store.fetch_manual_signal().await;

        let feeds = store.read(|s| s.feeds.clone());
        assert_eq!(feeds.brokers.len(), 1);
        assert_eq!(feeds.brokers[0].name, "Acme FX");
        assert!(feeds.news.is_empty());
        assert!(feeds.manual_signal.is_none());
    }
}
