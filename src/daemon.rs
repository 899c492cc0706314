/// Polling daemon: schedules the fetch pipelines on two cadences.
///
/// 1. Short ticker (`current_conditions_interval`): current conditions + alerts
/// 2. Long ticker (`forecast_interval`): forecast chain + moon phase
///
/// Both tickers fire once immediately on start so documents are populated
/// as soon as the upstreams answer, then every period after that. Every
/// pipeline owns its own worker pool. A firing hands each task to its
/// pipeline's pool and goes back to sleep without waiting, so a slow
/// upstream can still be in flight when the next firing lands, and its
/// backlog only ever queues behind itself. Nothing serializes overlapping
/// runs; whichever finishes last wins in the store.

use crate::config::Settings;
use crate::model::FetchError;
use crate::pipeline::Fetchers;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use threadpool::ThreadPool;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Period of the current conditions + alerts ticker (default: 2 minutes)
    pub short_interval: Duration,

    /// Period of the forecast + moon phase ticker (default: 6 hours)
    pub long_interval: Duration,

    /// Worker threads per fetch pipeline (default: 2)
    pub workers: usize,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            short_interval: Duration::from_secs(120),
            long_interval: Duration::from_secs(6 * 60 * 60),
            workers: 2,
        }
    }
}

impl DaemonConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            short_interval: Duration::from_secs(settings.current_conditions_interval),
            long_interval: Duration::from_secs(settings.forecast_interval),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Supervision
// ---------------------------------------------------------------------------

/// Runs one scheduled task, logging whatever escapes it.
///
/// Errors are logged with the task name and the failing URL. Panics are
/// caught and logged the same way. Returns `true` if the task succeeded.
pub fn supervise<F>(task: &str, f: F) -> bool
where
    F: FnOnce() -> Result<(), FetchError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::error!(task, url = e.url(), "{}", e);
            false
        }
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(task, "task panicked: {}", msg);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tickers
// ---------------------------------------------------------------------------

/// The unit of work a pipeline runs on every firing.
pub type Task = Arc<dyn Fn() -> Result<(), FetchError> + Send + Sync>;

/// A named fetch pipeline and the workers that run it.
#[derive(Clone)]
pub struct Pipeline {
    name: &'static str,
    task: Task,
    pool: ThreadPool,
}

impl Pipeline {
    pub fn new(name: &'static str, task: Task, workers: usize) -> Self {
        Self {
            name,
            task,
            pool: ThreadPool::with_name(format!("fetch-{}", name), workers.max(1)),
        }
    }

    /// Queues one supervised run on this pipeline's own workers.
    fn fire(&self) {
        let task = Arc::clone(&self.task);
        let name = self.name;
        self.pool.execute(move || {
            supervise(name, || (*task)());
        });
    }

    /// Waits for queued and in-flight runs to finish.
    fn join(&self) {
        self.pool.join();
    }
}

/// Deadline after `prev`, or `None` if it lies beyond what `Instant` can
/// represent. Re-anchors on `now` when `prev + period` has already passed.
fn next_deadline(prev: Instant, period: Duration, now: Instant) -> Option<Instant> {
    match prev.checked_add(period) {
        Some(next) if next > now => Some(next),
        _ => now.checked_add(period),
    }
}

/// Spawns a thread that fires `pipelines` immediately and then once per
/// `period`, until `stop` is signalled or dropped.
///
/// Deadlines are absolute (start + n × period) so submission time doesn't
/// accumulate as drift. If the thread oversleeps past several deadlines it
/// fires once and re-anchors instead of bursting. A period too long to
/// schedule leaves the ticker parked on `stop` after its first firing.
fn spawn_ticker(
    name: &'static str,
    period: Duration,
    pipelines: Vec<Pipeline>,
    stop: mpsc::Receiver<()>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("ticker-{}", name))
        .spawn(move || {
            let mut next = Instant::now();
            loop {
                for pipeline in &pipelines {
                    pipeline.fire();
                }

                let now = Instant::now();
                let signal = match next_deadline(next, period, now) {
                    Some(deadline) => {
                        next = deadline;
                        stop.recv_timeout(deadline - now)
                    }
                    None => {
                        tracing::warn!("{} ticker period {:?} is unschedulable", name, period);
                        stop.recv().map_err(|_| RecvTimeoutError::Disconnected)
                    }
                };

                match signal {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::debug!("{} ticker stopped", name);
        })
}

// ---------------------------------------------------------------------------
// Daemon
// ---------------------------------------------------------------------------

/// Main daemon state
pub struct Daemon {
    config: DaemonConfig,
    fetchers: Fetchers,
}

/// Handle to a running daemon.
pub struct DaemonHandle {
    stop: Vec<Sender<()>>,
    tickers: Vec<JoinHandle<()>>,
    pipelines: Vec<Pipeline>,
}

impl Daemon {
    pub fn new(config: DaemonConfig, fetchers: Fetchers) -> Self {
        Self { config, fetchers }
    }

    fn pipeline(&self, name: &'static str, task: Task) -> Pipeline {
        Pipeline::new(name, task, self.config.workers)
    }

    /// Pipelines fired by the short ticker.
    fn short_pipelines(&self) -> Vec<Pipeline> {
        let current = self.fetchers.clone();
        let alerts = self.fetchers.clone();
        vec![
            self.pipeline(
                "current_conditions",
                Arc::new(move || current.refresh_current_conditions()),
            ),
            self.pipeline("alerts", Arc::new(move || alerts.refresh_alerts())),
        ]
    }

    /// Pipelines fired by the long ticker.
    fn long_pipelines(&self) -> Vec<Pipeline> {
        let forecast = self.fetchers.clone();
        let moon = self.fetchers.clone();
        vec![
            self.pipeline("forecast", Arc::new(move || forecast.refresh_forecast())),
            self.pipeline("moon_phase", Arc::new(move || moon.refresh_moon_phase())),
        ]
    }

    /// Starts both tickers. The first firing of each happens immediately.
    pub fn start(&self) -> std::io::Result<DaemonHandle> {
        tracing::info!(
            "starting scheduler: short interval {}s, long interval {}s, {} workers per pipeline",
            self.config.short_interval.as_secs(),
            self.config.long_interval.as_secs(),
            self.config.workers
        );

        let short_pipelines = self.short_pipelines();
        let long_pipelines = self.long_pipelines();
        let pipelines: Vec<Pipeline> = short_pipelines
            .iter()
            .chain(long_pipelines.iter())
            .cloned()
            .collect();

        let (short_tx, short_rx) = mpsc::channel();
        let (long_tx, long_rx) = mpsc::channel();

        let short = spawn_ticker("short", self.config.short_interval, short_pipelines, short_rx)?;
        let long = spawn_ticker("long", self.config.long_interval, long_pipelines, long_rx)?;

        Ok(DaemonHandle {
            stop: vec![short_tx, long_tx],
            tickers: vec![short, long],
            pipelines,
        })
    }

    /// Starts the tickers and blocks for the life of the process.
    pub fn run(&self) -> std::io::Result<()> {
        self.start()?.join();
        Ok(())
    }
}

impl DaemonHandle {
    /// Blocks until the tickers exit (only after `shutdown` from elsewhere,
    /// so in practice forever).
    pub fn join(self) {
        let DaemonHandle {
            stop,
            tickers,
            pipelines,
        } = self;
        for ticker in tickers {
            if ticker.join().is_err() {
                tracing::error!("ticker thread panicked");
            }
        }
        drop(stop);
        for pipeline in &pipelines {
            pipeline.join();
        }
    }

    /// Stops both tickers and waits for in-flight fetches to finish.
    pub fn shutdown(self) {
        let DaemonHandle {
            stop,
            tickers,
            pipelines,
        } = self;
        for tx in &stop {
            let _ = tx.send(());
        }
        for ticker in tickers {
            let _ = ticker.join();
        }
        for pipeline in &pipelines {
            pipeline.join();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
