//! Lifecycle-scoped polling.
//!
//! A screen describes what it needs refreshed as a [`PollPlan`]. Starting the
//! plan spawns one task per entry and hands back a single [`PollHandle`];
//! stopping or dropping that handle tears every task down. The app keeps one
//! handle for the visible screen and replaces it on navigation, so timers
//! cannot outlive the screen that started them.

mod screens;

pub use screens::{Tier, screen_plan};

use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;

type Job = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// How often a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Once, right after mount.
    Once,
    /// Right after mount, then every `period`.
    Every { period: Duration },
}

/// One refresh job.
pub struct PollTask {
    name: &'static str,
    schedule: Schedule,
    job: Job,
}

impl std::fmt::Debug for PollTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollTask")
            .field("name", &self.name)
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl PollTask {
    /// Run `job` every `period`, starting immediately.
    pub fn every<F, Fut>(name: &'static str, period: Duration, job: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name,
            schedule: Schedule::Every { period },
            job: Arc::new(move || job().boxed()),
        }
    }

    /// Run `job` once on mount.
    pub fn once<F, Fut>(name: &'static str, job: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name,
            schedule: Schedule::Once,
            job: Arc::new(move || job().boxed()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    fn spawn(self) -> JoinHandle<()> {
        let Self {
            name,
            schedule,
            job,
        } = self;

        tokio::spawn(async move {
            match schedule {
                Schedule::Once => job().await,
                Schedule::Every { period } => {
                    let mut interval = tokio::time::interval_at(Instant::now(), period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                    let mut ticks = IntervalStream::new(interval);
                    while ticks.next().await.is_some() {
                        tracing::trace!(task = name, "poll tick");
                        job().await;
                    }
                }
            }
        })
    }
}

/// The refresh jobs of one screen.
#[derive(Debug, Default)]
pub struct PollPlan {
    tasks: Vec<PollTask>,
}

impl PollPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, task: PollTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn tasks(&self) -> &[PollTask] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Spawn every task. Must be called inside a tokio runtime.
    pub fn start(self) -> PollHandle {
        let names = self.tasks.iter().map(PollTask::name).collect::<Vec<_>>();
        tracing::debug!(tasks = ?names, "starting poll plan");
        PollHandle {
            handles: self.tasks.into_iter().map(PollTask::spawn).collect(),
        }
    }
}

/// Disposer for a started [`PollPlan`].
#[derive(Debug, Default)]
pub struct PollHandle {
    handles: Vec<JoinHandle<()>>,
}

impl PollHandle {
    /// A handle that owns nothing.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Abort every task. Safe to call more than once.
    pub fn stop(&mut self) {
        if !self.handles.is_empty() {
            tracing::debug!(tasks = self.handles.len(), "stopping poll plan");
        }
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Tasks owned by this handle that have not finished.
    pub fn active(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_task(name: &'static str, period: Duration) -> (PollTask, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let task = PollTask::every(name, period, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (task, hits)
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_then_periodic() {
        let (task, hits) = counter_task("fast", Duration::from_secs(5));
        let _handle = PollPlan::new().with(task).start();

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Ticks at 0s, 5s and 10s.
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_leaves_no_running_timers() {
        let (fast, fast_hits) = counter_task("fast", Duration::from_secs(5));
        let (medium, medium_hits) = counter_task("medium", Duration::from_secs(10));
        let (slow, slow_hits) = counter_task("slow", Duration::from_secs(30));

        let mut handle = PollPlan::new().with(fast).with(medium).with(slow).start();
        assert_eq!(handle.active(), 3);

        tokio::time::sleep(Duration::from_secs(12)).await;
        handle.stop();
        assert_eq!(handle.active(), 0);

        let before = (
            fast_hits.load(Ordering::SeqCst),
            medium_hits.load(Ordering::SeqCst),
            slow_hits.load(Ordering::SeqCst),
        );
        tokio::time::sleep(Duration::from_secs(120)).await;
        let after = (
            fast_hits.load(Ordering::SeqCst),
            medium_hits.load(Ordering::SeqCst),
            slow_hits.load(Ordering::SeqCst),
        );
        assert_eq!(before, after);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_tasks() {
        let (task, hits) = counter_task("fast", Duration::from_secs(5));
        let handle = PollPlan::new().with(task).start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_once_runs_single_time() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let handle = PollPlan::new()
            .with(PollTask::once("catalog", move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }))
            .start();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(handle.active(), 0);
    }
}
