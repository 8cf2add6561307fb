//! Stage timing collection for chunk generation.
//!
//! The generator never owns a profiler. Hosts that want timings pass a
//! [`MetricsSink`] into each generation call; hosts that don't pass `None`.

use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Receiver for per-stage durations.
pub trait MetricsSink {
    /// Record that `stage` took `elapsed` during one generation call.
    fn record(&mut self, stage: &'static str, elapsed: Duration);
}

/// Rolling average for one stage (in milliseconds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub last_ms: f32,
    pub avg_ms: f32,
    pub max_ms: f32,
    pub samples: u32,
}

/// Per-stage timings with a bounded history, averaged over the last N calls.
#[derive(Debug, Clone)]
pub struct StageTimings {
    history: BTreeMap<&'static str, VecDeque<f32>>,
    max_history: usize,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self::new(60)
    }
}

impl StageTimings {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: BTreeMap::new(),
            max_history: max_history.max(1),
        }
    }

    /// Summary for a single stage, if it has been recorded.
    pub fn summary(&self, stage: &str) -> Option<StageSummary> {
        let samples = self.history.get(stage)?;
        let last_ms = *samples.back()?;
        let sum: f32 = samples.iter().sum();
        let max_ms = samples.iter().copied().fold(0.0, f32::max);
        Some(StageSummary {
            last_ms,
            avg_ms: sum / samples.len() as f32,
            max_ms,
            samples: samples.len() as u32,
        })
    }

    /// Summaries of all recorded stages, keyed by stage name.
    pub fn summaries(&self) -> BTreeMap<String, StageSummary> {
        self.history
            .keys()
            .filter_map(|stage| self.summary(stage).map(|s| (stage.to_string(), s)))
            .collect()
    }

    /// Fold another collector's samples into this one.
    pub fn merge(&mut self, other: &StageTimings) {
        for (stage, samples) in &other.history {
            for ms in samples {
                self.push(*stage, *ms);
            }
        }
    }

    fn push(&mut self, stage: &'static str, ms: f32) {
        let samples = self.history.entry(stage).or_default();
        samples.push_back(ms);
        while samples.len() > self.max_history {
            samples.pop_front();
        }
    }
}

impl MetricsSink for StageTimings {
    fn record(&mut self, stage: &'static str, elapsed: Duration) {
        self.push(stage, elapsed.as_secs_f32() * 1000.0);
    }
}

/// Measures one stage and reports it to an optional sink when finished.
pub(crate) struct StageTimer {
    stage: &'static str,
    start: Instant,
}

impl StageTimer {
    pub(crate) fn start(stage: &'static str) -> Self {
        Self { stage, start: Instant::now() }
    }

    pub(crate) fn finish(self, sink: Option<&mut (dyn MetricsSink + '_)>) {
        if let Some(sink) = sink {
            sink.record(self.stage, self.start.elapsed());
        }
    }
}
