//! Background task scheduling.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Shortest period a periodic task runs at.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A periodic background task.
///
/// The task runs until [`stop`](Self::stop) is called or the handle is
/// dropped. A tick already in progress is never interrupted; stopping only
/// prevents further ticks.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawn `tick` every `period`, with an optional extra tick after
    /// `initial_delay`. The periodic cadence is measured from spawn time.
    /// Periods shorter than [`MIN_PERIOD`] are raised to it.
    pub fn spawn_periodic<F, Fut>(
        name: &'static str,
        initial_delay: Option<Duration>,
        period: Duration,
        mut tick: F,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if period < MIN_PERIOD {
            warn!(task = name, ?period, "Period below minimum, using {MIN_PERIOD:?}");
        }
        let period = period.max(MIN_PERIOD);
        let (shutdown, mut stopped) = watch::channel(false);
        let start = Instant::now();

        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            if let Some(delay) = initial_delay {
                tokio::select! {
                    _ = tokio::time::sleep_until(start + delay) => tick().await,
                    _ = stopped.changed() => return,
                }
            }

            loop {
                tokio::select! {
                    _ = interval.tick() => tick().await,
                    _ = stopped.changed() => break,
                }
            }
            debug!(task = name, "Background task stopped");
        });

        debug!(task = name, ?period, "Background task started");
        Self {
            name,
            shutdown,
            join,
        }
    }

    /// Spawn a one-shot task that runs `work` after `delay`.
    pub fn spawn_delayed<Fut>(name: &'static str, delay: Duration, work: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, mut stopped) = watch::channel(false);
        let join = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => work.await,
                _ = stopped.changed() => {}
            }
        });
        Self {
            name,
            shutdown,
            join,
        }
    }

    /// Spawn a task that runs `handle` for every message on `rx`, one at a
    /// time, until the channel closes or the task is stopped. Messages
    /// already queued when stopping are still handled.
    pub fn spawn_listener<T, F, Fut>(
        name: &'static str,
        mut rx: mpsc::UnboundedReceiver<T>,
        mut handle: F,
    ) -> Self
    where
        T: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, mut stopped) = watch::channel(false);
        let join = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    message = rx.recv() => match message {
                        Some(message) => handle(message).await,
                        None => break,
                    },
                    _ = stopped.changed() => break,
                }
            }
            debug!(task = name, "Listener stopped");
        });
        Self {
            name,
            shutdown,
            join,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop the task and wait for a tick in progress to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.join.await;
    }
}
