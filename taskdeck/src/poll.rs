//! Scheduled polling of the task store.
//!
//! [`Poller`] is the synchronous core: one `tick` fetches the task list
//! and feeds it through the alert registry, with the clock injected so
//! tests drive ticks directly without real delays. [`spawn_poller`] wraps
//! it in a tokio task that ticks on a fixed interval and talks to the
//! caller over [`PollCommand`] / [`PollEvent`] channels:
//!
//! ```text
//! caller (main loop)  ←── PollEvent ───  tokio poll task
//!                      ─── PollCommand →
//! ```
//!
//! A tick that fails commits nothing — the registry is only consulted
//! after a successful fetch — and the next scheduled tick retries.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;

use taskdeck_proto::alert::Alert;
use taskdeck_proto::task::{Task, UserId};

use crate::alerts::AlertRegistry;
use crate::client::{ClientError, TaskSource};

/// Default interval between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default channel capacity for command/event mpsc channels.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Commands sent from the caller to the polling background task.
#[derive(Debug)]
pub enum PollCommand {
    /// Run a tick immediately instead of waiting for the interval.
    RefreshNow,
    /// Dismiss a presented alert by key.
    Dismiss(String),
    /// Gracefully stop polling.
    Shutdown,
}

/// Events sent from the polling background task to the caller.
#[derive(Debug)]
pub enum PollEvent {
    /// A poll completed; carries the fresh list and any new alerts.
    Refreshed {
        /// The full task list as fetched.
        tasks: Vec<Task>,
        /// Alerts raised by this poll (already-seen conditions excluded).
        new_alerts: Vec<Alert>,
        /// Presented alert count after this poll.
        badge_count: usize,
    },
    /// An alert was dismissed.
    Dismissed {
        /// Key of the dismissed alert.
        key: String,
        /// Presented alert count after the dismissal.
        badge_count: usize,
    },
    /// A poll failed; it will be retried on the next tick.
    Error(String),
}

/// Outcome of a single successful tick.
#[derive(Debug)]
pub struct TickOutcome {
    /// The task list as fetched.
    pub tasks: Vec<Task>,
    /// Alerts newly raised by this tick.
    pub new_alerts: Vec<Alert>,
}

/// Polling configuration.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Interval between scheduled ticks.
    pub interval: Duration,
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Fetch-and-derive core, one instance per session.
pub struct Poller<S> {
    source: S,
    user: UserId,
    registry: AlertRegistry,
}

impl<S: TaskSource> Poller<S> {
    /// Creates a poller for `user` over the given task source, with a
    /// fresh alert registry.
    #[must_use]
    pub fn new(source: S, user: UserId) -> Self {
        Self {
            source,
            user,
            registry: AlertRegistry::new(),
        }
    }

    /// Runs one poll: fetch the task list, derive new alerts.
    ///
    /// # Errors
    ///
    /// Propagates the fetch error; the registry is untouched on failure.
    pub async fn tick(&mut self, now_ms: u64) -> Result<TickOutcome, ClientError> {
        let tasks = self.source.fetch_tasks(self.user).await?;
        let new_alerts = self.registry.observe(&tasks, now_ms);
        Ok(TickOutcome { tasks, new_alerts })
    }

    /// Dismisses a presented alert; its key stays latched in the registry.
    pub fn dismiss(&mut self, key: &str) -> bool {
        self.registry.dismiss(key)
    }

    /// The alert registry for this session.
    #[must_use]
    pub const fn registry(&self) -> &AlertRegistry {
        &self.registry
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}

/// Spawns the polling background task and returns its channel handles.
///
/// The first tick runs immediately; subsequent ticks follow the configured
/// interval. The task exits on [`PollCommand::Shutdown`] or when the
/// command channel closes.
#[must_use]
pub fn spawn_poller<S>(
    source: S,
    user: UserId,
    config: &PollerConfig,
) -> (mpsc::Sender<PollCommand>, mpsc::Receiver<PollEvent>)
where
    S: TaskSource + Send + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<PollCommand>(config.channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<PollEvent>(config.channel_capacity);
    let interval = config.interval;

    tokio::spawn(async move {
        let mut poller = Poller::new(source, user);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if run_tick(&mut poller, &evt_tx).await.is_err() {
                        break;
                    }
                }
                cmd = cmd_rx.recv() => match cmd {
                    Some(PollCommand::RefreshNow) => {
                        if run_tick(&mut poller, &evt_tx).await.is_err() {
                            break;
                        }
                    }
                    Some(PollCommand::Dismiss(key)) => {
                        if poller.dismiss(&key) {
                            let event = PollEvent::Dismissed {
                                key,
                                badge_count: poller.registry().badge_count(),
                            };
                            if evt_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(PollCommand::Shutdown) | None => {
                        tracing::info!("poller shutting down");
                        break;
                    }
                },
            }
        }
    });

    (cmd_tx, evt_rx)
}

/// Runs one tick and reports the outcome; `Err` means the event receiver
/// is gone and the poll task should exit.
async fn run_tick<S: TaskSource>(
    poller: &mut Poller<S>,
    evt_tx: &mpsc::Sender<PollEvent>,
) -> Result<(), ()> {
    let event = match poller.tick(now_ms()).await {
        Ok(outcome) => {
            tracing::debug!(
                tasks = outcome.tasks.len(),
                new_alerts = outcome.new_alerts.len(),
                "poll tick completed"
            );
            PollEvent::Refreshed {
                badge_count: poller.registry().badge_count(),
                tasks: outcome.tasks,
                new_alerts: outcome.new_alerts,
            }
        }
        Err(e) => {
            if e.is_transient() {
                tracing::warn!(error = %e, "poll tick failed, retrying next tick");
            } else {
                tracing::error!(error = %e, "poll tick rejected");
            }
            PollEvent::Error(e.to_string())
        }
    };
    evt_tx.send(event).await.map_err(|_| ())
}
