//! Main application module.
//!
//! [`App`] owns the terminal and wires the pieces together: terminal events
//! become [`Action`]s, the [`UiStore`] reduces them into [`Effect`]s, and
//! effects run against the [`EaStore`] on background tasks that report back
//! through the same action channel.

use crate::api::Backend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventConfig, EventHandler, EventLoop, InputContext};
use crate::polling::{PollHandle, screen_plan};
use crate::session::Session;
use crate::state::{Action, Effect, UiStore};
use crate::store::{EaStore, StoreEvent, StoreOptions, StoreState};
use crate::ui::{Screen, Theme, Ui};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::future::Future;
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Cached backend data.
    store: EaStore,
    /// Store notifications.
    store_rx: mpsc::UnboundedReceiver<StoreEvent>,
    /// View state.
    ui: UiStore,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Event handler.
    event_handler: EventHandler,
    /// Backend used for sign-in.
    backend: Arc<dyn Backend>,
    /// Refresh timers of the visible screen.
    polling: PollHandle,
    theme: Theme,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application.
    pub fn new(config: Config, backend: Arc<dyn Backend>, session: Session) -> Result<Self> {
        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.ui.mouse_support {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (store_tx, store_rx) = mpsc::unbounded_channel();

        let signed_in = session.is_signed_in();
        let store = EaStore::new(
            backend.clone(),
            session,
            store_tx,
            StoreOptions::from(&config),
        );
        let ui = UiStore::new(action_tx, &config, signed_in);
        let event_handler =
            EventHandler::new(config.keybindings.clone(), config.ui.mouse_support);
        let theme = Theme::from(&config.theme);

        tracing::info!(signed_in, base_url = %config.api.base_url, "app initialized");

        Ok(Self {
            terminal,
            store,
            store_rx,
            ui,
            action_rx,
            event_handler,
            backend,
            polling: PollHandle::idle(),
            theme,
            config,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        let (mut events, event_task) = EventLoop::new(EventConfig::from(&self.config.ui)).start();

        let size = self.terminal.size()?;
        self.ui.dispatch(Action::Resize(size.width, size.height))?;
        self.remount();

        let result = self.event_loop(&mut events).await;

        self.polling.stop();
        event_task.abort();
        result
    }

    async fn event_loop(
        &mut self,
        events: &mut mpsc::UnboundedReceiver<Event>,
    ) -> Result<()> {
        loop {
            let data = self.store.snapshot();
            let screen = Screen {
                ui: &self.ui,
                data: &data,
                theme: &self.theme,
                keys: &self.config.keybindings,
            };
            self.terminal.draw(|frame| Ui::render(frame, screen))?;

            tokio::select! {
                event = events.recv() => {
                    let event = event.ok_or_else(|| Error::channel("terminal event stream closed"))?;
                    if let Some(action) = self.event_handler.handle(&event, self.input_context()) {
                        self.handle_action(action, &data);
                    }
                }

                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action, &data);
                }

                Some(event) = self.store_rx.recv() => {
                    self.handle_store_event(event);
                }
            }

            if self.ui.app.should_quit {
                tracing::info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn input_context(&self) -> InputContext {
        InputContext {
            view: self.ui.app.current_view,
            input_mode: self.ui.app.input_mode,
            show_help: self.ui.app.show_help,
        }
    }

    fn handle_action(&mut self, action: Action, data: &StoreState) {
        if !matches!(action, Action::Tick | Action::InputChar(_)) {
            tracing::trace!(?action, "action");
        }
        if let Some(effect) = self.ui.reduce(action, data) {
            self.execute(effect);
        }
    }

    fn handle_store_event(&mut self, event: StoreEvent) {
        tracing::trace!(?event, "store event");
        let data = self.store.snapshot();
        if event == StoreEvent::ForcedLogout {
            self.handle_action(Action::ForcedLogout, &data);
        }
        self.ui.sync_overlay(&data);
    }

    /// Swap the refresh plan for the one the current view needs. A leftover
    /// error flag belongs to the previous plan and is cleared.
    fn remount(&mut self) {
        self.polling.stop();
        self.store.clear_error();
        let view = self.ui.app.current_view;
        let plan = screen_plan(view, &self.store, &self.config.polling);
        if plan.is_empty() {
            tracing::debug!(?view, "nothing to refresh");
        }
        self.polling = plan.start();
    }

    /// Run `job` in the background and feed its action back in.
    fn spawn_reporting<F>(&self, job: F)
    where
        F: Future<Output = Option<Action>> + Send + 'static,
    {
        let tx = self.ui.sender();
        tokio::spawn(async move {
            if let Some(action) = job.await {
                if tx.send(action).is_err() {
                    tracing::debug!("action dropped, app is shutting down");
                }
            }
        });
    }

    fn execute(&mut self, effect: Effect) {
        // Login carries the password.
        if !matches!(effect, Effect::Login { .. }) {
            tracing::debug!(?effect, "effect");
        }
        match effect {
            Effect::Remount => self.remount(),
            Effect::SelectMonitorOffset(delta) => {
                self.store.select_monitor_offset(delta);
            }
            Effect::SetQuoteCategory(category) => {
                self.store.set_quote_category(category);
                let store = self.store.clone();
                tokio::spawn(async move { store.refresh_quotes().await });
            }
            Effect::Login {
                role,
                email,
                password,
            } => {
                let store = self.store.clone();
                let backend = self.backend.clone();
                let api = self.config.api.clone();
                self.spawn_reporting(async move {
                    let result = store
                        .session()
                        .login(backend.as_ref(), &api, role, &email, &password)
                        .await;
                    Some(match result {
                        Ok(response) => Action::LoginSucceeded {
                            user_type: response.user_type,
                        },
                        Err(e) => {
                            tracing::warn!(error = %e, "sign-in failed");
                            Action::LoginFailed(e.user_message())
                        }
                    })
                });
            }
            Effect::Logout => {
                let store = self.store.clone();
                self.polling.stop();
                self.spawn_reporting(async move {
                    if let Err(e) = store.session().logout() {
                        tracing::error!(error = %e, "failed to clear stored session");
                    }
                    store.reset();
                    Some(Action::SignedOut)
                });
            }
            Effect::AddMonitor { name, config } => {
                let store = self.store.clone();
                self.spawn_reporting(async move {
                    outcome(store.add_monitor(&name, config).await, |m| {
                        Action::MonitorAdded(m.name)
                    })
                });
            }
            Effect::DeleteMonitor { id, name } => {
                let store = self.store.clone();
                self.spawn_reporting(async move {
                    outcome(store.delete_monitor(&id).await, |()| {
                        Action::MonitorDeleted(name)
                    })
                });
            }
            Effect::ToggleMonitor { id } => {
                let store = self.store.clone();
                self.spawn_reporting(async move {
                    outcome(store.toggle_monitor_status(&id).await, Action::MonitorToggled)
                });
            }
            Effect::SelectIndicator { id, name } => {
                let store = self.store.clone();
                self.spawn_reporting(async move {
                    outcome(store.select_mentor_indicator(&id).await, |()| {
                        Action::IndicatorSelected(name)
                    })
                });
            }
        }
    }
}

/// Map a mutation result to the action reporting it.
///
/// A revoked session is already being handled through
/// [`StoreEvent::ForcedLogout`], so it produces no action of its own.
fn outcome<T>(result: Result<T>, ok: impl FnOnce(T) -> Action) -> Option<Action> {
    match result {
        Ok(value) => Some(ok(value)),
        Err(Error::AccountInactive) => None,
        Err(e) => Some(Action::RequestFailed(e.user_message())),
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MonitorStatus;
    use crate::store::test_monitor;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_success() {
        let action = outcome(Ok(test_monitor("a", MonitorStatus::Running)), |m| {
            Action::MonitorAdded(m.name)
        });
        assert!(matches!(action, Some(Action::MonitorAdded(name)) if name == "EA a"));
    }

    #[test]
    fn test_outcome_failure_uses_user_message() {
        let error = Error::Rejected {
            status: 400,
            message: Some("Symbol not supported".to_string()),
        };
        let action = outcome(Err::<(), _>(error), |()| Action::Refresh);
        match action {
            Some(Action::RequestFailed(message)) => assert_eq!(message, "Symbol not supported"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_outcome_revoked_session_is_silent() {
        let action = outcome(Err::<(), _>(Error::AccountInactive), |()| Action::Refresh);
        assert!(action.is_none());
    }
}
