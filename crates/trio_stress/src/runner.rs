//! # Stress Runner
//!
//! Spawns the producer on its own thread and runs the consumer on the calling
//! thread until the producer is done and its last commit has been claimed.

use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use trio_core::{Consumer, Coordinator, LockFree, Locked, Trio};

use crate::config::{Backend, StressConfig, Workload};
use crate::error::{StressError, StressResult};
use crate::verify;

/// Outcome of a verified stress run.
#[derive(Debug, Clone)]
pub struct StressReport {
    /// Backend that was exercised.
    pub backend: Backend,
    /// Workload that was run.
    pub workload: Workload,
    /// Items produced: commits (counter) or strings (strings).
    pub produced: u64,
    /// Items the consumer collected from new values.
    pub consumed: u64,
    /// Total `read` calls.
    pub reads: u64,
    /// `read` calls that observed a new value.
    pub changed_reads: u64,
    /// Wall time from producer start to final claim.
    pub elapsed: Duration,
}

impl StressReport {
    /// Share of reads that observed a new value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new_to_stale_ratio(&self) -> f64 {
        if self.reads == 0 {
            return 0.0;
        }
        self.changed_reads as f64 / self.reads as f64
    }

    /// True when several items were produced but the consumer observed at
    /// most one new value.
    ///
    /// The run still verifies, but the producer finished before the two
    /// threads overlapped, so it says little about the hand-off.
    #[must_use]
    pub fn consumer_starved(&self) -> bool {
        self.produced > 1 && self.changed_reads <= 1
    }
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: produced {}, consumed {}, reads {} ({} new, ratio {:.4}) in {:?}",
            self.backend,
            self.workload,
            self.produced,
            self.consumed,
            self.reads,
            self.changed_reads,
            self.new_to_stale_ratio(),
            self.elapsed,
        )
    }
}

/// Runs the configured workload against the configured backend and verifies
/// the result.
///
/// # Errors
///
/// Returns [`StressError::InvalidConfig`] for an unusable configuration, a
/// thread error if a worker could not start or panicked, or the verification
/// error describing what the consumer saw wrong.
pub fn run(config: &StressConfig) -> StressResult<StressReport> {
    config.validate()?;

    tracing::info!(
        backend = %config.backend,
        workload = %config.workload,
        commits = config.commits,
        total_strings = config.total_strings,
        seed = config.seed,
        "stress run starting"
    );

    let result = match config.backend {
        Backend::LockFree => run_with::<LockFree>(config),
        Backend::Mutex => run_with::<Locked>(config),
    };

    match &result {
        Ok(report) => {
            tracing::info!(
                reads = report.reads,
                changed_reads = report.changed_reads,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "stress run verified"
            );
            if report.consumer_starved() {
                tracing::warn!(
                    produced = report.produced,
                    changed_reads = report.changed_reads,
                    "consumer saw at most one new value; raise the item count or enable yield_between"
                );
            }
        }
        Err(err) => tracing::error!(error = %err, "stress run failed"),
    }
    result
}

fn run_with<C: Coordinator + 'static>(config: &StressConfig) -> StressResult<StressReport> {
    let mut report = match config.workload {
        Workload::Counter => counter::<C>(config)?,
        Workload::Strings => strings::<C>(config)?,
    };
    report.backend = config.backend;
    Ok(report)
}

/// Read counters kept by the consumer loop.
#[derive(Default)]
struct ReadStats {
    reads: u64,
    changed: u64,
}

impl ReadStats {
    fn record(&mut self, changed: bool) {
        self.reads += 1;
        self.changed += u64::from(changed);
    }
}

fn spawn_producer<R, F>(work: F) -> StressResult<JoinHandle<R>>
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    thread::Builder::new()
        .name("trio-producer".into())
        .spawn(work)
        .map_err(StressError::Spawn)
}

/// True once the producer has exited and its last commit was claimed.
fn drained<T, C: Coordinator, R>(writer: &JoinHandle<R>, consumer: &Consumer<T, C>) -> bool {
    writer.is_finished() && !consumer.updated()
}

fn counter<C: Coordinator + 'static>(config: &StressConfig) -> StressResult<StressReport> {
    let last = config.commits;
    let pause = config.yield_between;
    let (mut producer, mut consumer) = Trio::<u64, C>::new().split();

    let start = Instant::now();
    let writer = spawn_producer(move || {
        for value in 1..=last {
            producer.publish(value);
            if pause {
                thread::yield_now();
            }
        }
    })?;

    let mut stats = ReadStats::default();
    let mut observed = Vec::new();
    loop {
        let (value, changed) = consumer.read();
        stats.record(changed);
        if changed {
            observed.push(*value);
            if *value == last {
                break;
            }
        } else if drained(&writer, &consumer) {
            break;
        } else if pause {
            thread::yield_now();
        }
    }
    let elapsed = start.elapsed();

    writer
        .join()
        .map_err(|_| StressError::ThreadPanicked("producer"))?;
    verify::check_counter(&observed, last)?;

    Ok(StressReport {
        backend: Backend::default(),
        workload: Workload::Counter,
        produced: last,
        consumed: observed.len() as u64,
        reads: stats.reads,
        changed_reads: stats.changed,
        elapsed,
    })
}

fn random_string(rng: &mut ChaCha8Rng, max_len: usize) -> String {
    let len = rng.gen_range(0..max_len);
    (0..len)
        .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
        .collect()
}

fn strings<C: Coordinator + 'static>(config: &StressConfig) -> StressResult<StressReport> {
    let total = config.total_strings;
    let max_batch = config.max_batch;
    let max_len = config.max_len;
    let seed = config.seed;
    let pause = config.yield_between;
    let (mut producer, mut consumer) = Trio::<Vec<String>, C>::new().split();

    let start = Instant::now();
    let writer = spawn_producer(move || {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut produced = Vec::with_capacity(total);
        while produced.len() < total {
            let mut batch = producer.write();
            batch.clear();
            for _ in 0..rng.gen_range(0..max_batch) {
                let s = random_string(&mut rng, max_len);
                produced.push(s.clone());
                batch.push(s);
                if produced.len() >= total {
                    break;
                }
            }
            batch.commit();
            if pause {
                thread::yield_now();
            }
        }
        produced
    })?;

    let mut stats = ReadStats::default();
    let mut consumed: Vec<String> = Vec::new();
    let mut last_batch_len = 0;
    loop {
        let (batch, changed) = consumer.read();
        stats.record(changed);
        if changed {
            consumed.extend(batch.iter().cloned());
            last_batch_len = batch.len();
        } else if drained(&writer, &consumer) {
            break;
        } else if pause {
            thread::yield_now();
        }
    }
    let elapsed = start.elapsed();

    let produced = writer
        .join()
        .map_err(|_| StressError::ThreadPanicked("producer"))?;
    verify::check_subsequence(&consumed, &produced)?;
    // The final batch is never superseded, so it must close both logs.
    if last_batch_len == 0 || !produced.ends_with(&consumed[consumed.len() - last_batch_len..]) {
        return Err(StressError::FinalBatchMissing);
    }

    tracing::debug!(
        produced = produced.len(),
        consumed = consumed.len(),
        "strings workload drained"
    );

    Ok(StressReport {
        backend: Backend::default(),
        workload: Workload::Strings,
        produced: produced.len() as u64,
        consumed: consumed.len() as u64,
        reads: stats.reads,
        changed_reads: stats.changed,
        elapsed,
    })
}
