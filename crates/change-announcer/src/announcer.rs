//! Scheduled announcement engine.
//!
//! [`ChangeAnnouncer`] owns the watermark and a background worker that runs
//! one cycle per wait period:
//!
//! ```text
//! tick ─▶ fetch ─▶ select ─▶ format ─▶ deliver (subscribed destinations)
//!                                         │
//!                       advance watermark ◀┘ ─▶ persist
//! ```
//!
//! Cycles never overlap. A failing or panicking cycle is logged and the
//! next tick still fires.

use crate::destination::{Destination, DestinationDirectory};
use crate::error::{AnnouncerError, AnnouncerResult};
use crate::format::format_change;
use crate::select::select;
use announcer_config_and_utils::FeedConfig;
use change_feed_client::{ChangeSource, QuerySpec};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use watermark_store::{Watermark, WatermarkStore};

/// Whether a cycle is currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Running,
}

/// Outcome of one successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Records returned by the change feed (unknown kinds already dropped).
    pub fetched: usize,
    /// Records newer than the watermark, each delivered to every destination.
    pub announced: usize,
    /// Subscribed destinations in this cycle's snapshot.
    pub destinations: usize,
    /// Watermark after the cycle.
    pub watermark: Watermark,
    /// Whether the watermark is durable after the cycle.
    pub persisted: bool,
}

/// Polling announcer for one change feed.
///
/// Create it, call [`start`](Self::start) inside a tokio runtime and
/// [`stop`](Self::stop) before shutting down.
pub struct ChangeAnnouncer {
    inner: Arc<AnnouncerInner>,
    worker: Mutex<Option<Worker>>,
}

struct Worker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

struct AnnouncerInner {
    feed: FeedConfig,
    source: Arc<dyn ChangeSource>,
    directory: Arc<dyn DestinationDirectory>,
    store: Arc<dyn WatermarkStore>,
    /// In-memory watermark; only ever raised, except by an explicit reset.
    watermark: AtomicU64,
    /// Last value the store accepted.
    durable: AtomicU64,
    running: AtomicBool,
}

/// Holds the `Running` state; dropping it returns to `Idle`.
struct CycleGuard<'a> {
    running: &'a AtomicBool,
}

impl<'a> CycleGuard<'a> {
    fn try_acquire(running: &'a AtomicBool) -> Option<Self> {
        running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { running })
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl ChangeAnnouncer {
    /// Create an announcer, loading the watermark from `store`.
    pub fn new(
        feed: FeedConfig,
        source: Arc<dyn ChangeSource>,
        directory: Arc<dyn DestinationDirectory>,
        store: Arc<dyn WatermarkStore>,
    ) -> AnnouncerResult<Self> {
        feed.validate()?;

        let loaded = store.load();
        info!(
            watermark = loaded.value(),
            wait_period_secs = feed.wait_period_secs,
            "Announcer initialized"
        );

        Ok(Self {
            inner: Arc::new(AnnouncerInner {
                feed,
                source,
                directory,
                store,
                watermark: AtomicU64::new(loaded.value()),
                durable: AtomicU64::new(loaded.value()),
                running: AtomicBool::new(false),
            }),
            worker: Mutex::new(None),
        })
    }

    /// Current in-memory watermark.
    pub fn watermark(&self) -> Watermark {
        self.inner.watermark()
    }

    /// Last watermark the store accepted.
    pub fn persisted_watermark(&self) -> Watermark {
        Watermark::new(self.inner.durable.load(Ordering::SeqCst))
    }

    pub fn cycle_state(&self) -> CycleState {
        if self.inner.running.load(Ordering::SeqCst) {
            CycleState::Running
        } else {
            CycleState::Idle
        }
    }

    /// Whether the background schedule is armed.
    pub fn is_started(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Query the next cycle would send.
    pub fn query_spec(&self) -> QuerySpec {
        self.inner.query_spec(self.inner.watermark())
    }

    /// Spawn the background schedule. The first cycle runs one wait period
    /// from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> AnnouncerResult<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Err(AnnouncerError::AlreadyStarted);
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_schedule(self.inner.clone(), shutdown_rx));

        *worker = Some(Worker {
            shutdown: shutdown_tx,
            handle,
        });
        Ok(())
    }

    /// Disarm the schedule and wait for the worker to exit.
    ///
    /// A cycle already in progress finishes first. Calling `stop` on an
    /// announcer that is not started does nothing.
    pub async fn stop(&self) {
        let worker = self.worker.lock().take();
        let Some(worker) = worker else {
            debug!("Announcer stop requested but schedule is not running");
            return;
        };

        let _ = worker.shutdown.send(());
        if let Err(err) = worker.handle.await {
            warn!(error = %err, "Announcer worker ended abnormally");
        }
        info!("Announcer stopped");
    }

    /// Run one cycle now, outside the timer.
    ///
    /// Fails with [`AnnouncerError::CycleInProgress`] if another cycle is
    /// executing.
    pub async fn run_cycle(&self) -> AnnouncerResult<CycleReport> {
        self.inner.run_cycle().await
    }

    /// On-demand peek: the lines a cycle would announce right now.
    ///
    /// Never advances or persists the watermark.
    pub async fn trigger_manual_fetch(&self) -> AnnouncerResult<Vec<String>> {
        let watermark = self.inner.watermark();
        let records = self
            .inner
            .source
            .fetch(&self.inner.query_spec(watermark))
            .await?;

        let lines: Vec<String> = select(records, watermark)
            .iter()
            .map(|record| format_change(record, &self.inner.feed.page_url_template))
            .collect();

        debug!(changes = lines.len(), "Manual fetch completed");
        Ok(lines)
    }

    /// Operator reset: forget everything announced so far.
    pub fn reset_watermark(&self) -> AnnouncerResult<()> {
        self.inner.store.save(Watermark::ZERO)?;
        self.inner.watermark.store(0, Ordering::SeqCst);
        self.inner.durable.store(0, Ordering::SeqCst);
        info!("Watermark reset to 0");
        Ok(())
    }
}

impl AnnouncerInner {
    fn watermark(&self) -> Watermark {
        Watermark::new(self.watermark.load(Ordering::SeqCst))
    }

    fn query_spec(&self, watermark: Watermark) -> QuerySpec {
        QuerySpec::new(
            self.feed.namespaces.clone(),
            self.feed.show_minor,
            self.feed.limit,
        )
        .after(watermark)
    }

    async fn run_cycle(&self) -> AnnouncerResult<CycleReport> {
        let _guard =
            CycleGuard::try_acquire(&self.running).ok_or(AnnouncerError::CycleInProgress)?;

        let watermark = self.watermark();
        let records = self.source.fetch(&self.query_spec(watermark)).await?;
        let fetched = records.len();

        let survivors = select(records, watermark);
        let lines: Vec<String> = survivors
            .iter()
            .map(|record| format_change(record, &self.feed.page_url_template))
            .collect();

        let destinations: Vec<Destination> = self
            .directory
            .list_active_destinations()
            .into_iter()
            .filter(|destination| destination.subscribed)
            .collect();

        for destination in &destinations {
            for line in &lines {
                self.directory.deliver(destination, line);
            }
            debug!(
                destination = %destination.name,
                changes = lines.len(),
                "Sent changes to destination"
            );
        }

        // Survivors are sorted, so the last one carries the maximum timestamp.
        let watermark = match survivors.last() {
            Some(newest) => self.advance(newest.timestamp),
            None => self.watermark(),
        };
        let persisted = self.persist_pending();

        Ok(CycleReport {
            fetched,
            announced: survivors.len(),
            destinations: destinations.len(),
            watermark,
            persisted,
        })
    }

    /// Raise the watermark to `timestamp` unless it is already higher.
    fn advance(&self, timestamp: u64) -> Watermark {
        let previous = self.watermark.fetch_max(timestamp, Ordering::SeqCst);
        Watermark::new(previous).advanced_to(timestamp)
    }

    /// Save the in-memory watermark if the store lags behind it.
    ///
    /// A failure keeps the in-memory value; the next cycle tries again.
    fn persist_pending(&self) -> bool {
        let target = self.watermark.load(Ordering::SeqCst);
        if target == self.durable.load(Ordering::SeqCst) {
            return true;
        }

        match self.store.save(Watermark::new(target)) {
            Ok(()) => {
                self.durable.store(target, Ordering::SeqCst);
                true
            }
            Err(err) => {
                error!(
                    watermark = target,
                    error = %err,
                    "Failed to persist watermark; changes may be announced again after a restart"
                );
                false
            }
        }
    }
}

async fn run_schedule(inner: Arc<AnnouncerInner>, mut shutdown: oneshot::Receiver<()>) {
    let period = inner.feed.wait_period();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        wait_period_secs = period.as_secs(),
        "Announcer schedule started"
    );

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Announcer received shutdown signal");
                break;
            }
            _ = ticker.tick() => {
                // A separate task so that a panic ends only this cycle.
                let cycle_inner = inner.clone();
                let cycle = tokio::spawn(async move { cycle_inner.run_cycle().await });

                match cycle.await {
                    Ok(Ok(report)) => {
                        if report.announced > 0 {
                            info!(
                                announced = report.announced,
                                destinations = report.destinations,
                                watermark = report.watermark.value(),
                                "Announced recent changes"
                            );
                        } else {
                            debug!(fetched = report.fetched, "No new changes");
                        }
                    }
                    Ok(Err(AnnouncerError::CycleInProgress)) => {
                        debug!("Skipping tick, a cycle is already running");
                    }
                    Ok(Err(err)) => {
                        error!(error = %err, "Announcement cycle failed");
                    }
                    Err(err) => {
                        error!(error = %err, "Announcement cycle panicked");
                    }
                }
            }
        }
    }

    debug!("Announcer schedule stopped");
}
