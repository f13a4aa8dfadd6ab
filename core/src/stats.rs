use crate::types::{BlockRange, Payload, RequestResult};
use crate::{Error, Result};
use hdrhistogram::Histogram;
use std::cmp;
use std::fmt;
use std::time::Duration;

/// Latencies above an hour are clamped when computing percentiles.
const MAX_TRACKED_LATENCY_US: u64 = 3_600_000_000;

/// Accumulated results of a run.
///
/// Every counter is a sum, min or max so the order results come in doesn't
/// change the summary.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    latencies: Vec<Duration>,
    latency_sum: Duration,
    min_latency: Option<Duration>,
    max_latency: Option<Duration>,
    failures: u64,
    rpc_errors: u64,
    blocks: u64,
    logs: Option<u64>,
    covered: Option<BlockRange>,
}

impl Stats {
    pub fn record(&mut self, result: &RequestResult) {
        let latency = result.latency;

        self.latencies.push(latency);
        self.latency_sum += latency;
        self.min_latency = Some(self.min_latency.map_or(latency, |l| cmp::min(l, latency)));
        self.max_latency = Some(self.max_latency.map_or(latency, |l| cmp::max(l, latency)));
        self.rpc_errors += result.rpc_errors as u64;
        self.blocks += result.num_blocks();

        if let Some(logs) = result.num_logs() {
            *self.logs.get_or_insert(0) += logs;
        }
        if let Payload::Logs {
            covered: Some(range),
            ..
        } = result.payload
        {
            self.covered = Some(self.covered.map_or(range, |c| c.merge(range)));
        }
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn num_samples(&self) -> usize {
        self.latencies.len()
    }

    pub fn num_failures(&self) -> u64 {
        self.failures
    }

    /// Latencies in the order requests completed.
    pub fn latencies(&self) -> &[Duration] {
        &self.latencies
    }

    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    pub fn logs(&self) -> Option<u64> {
        self.logs
    }

    pub fn covered(&self) -> Option<BlockRange> {
        self.covered
    }

    /// Builds the end of run summary, `elapsed` being the wall clock time of the run.
    pub fn summary(&self, elapsed: Duration) -> Result<Summary> {
        let (min, max) = match (self.min_latency, self.max_latency) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(Error::NoSamples),
        };

        let requests = self.latencies.len() as u64;
        let mean_nanos = self.latency_sum.as_nanos() / u128::from(requests);
        let mean = Duration::from_nanos(u64::try_from(mean_nanos).unwrap_or(u64::MAX));

        let mut histogram = Histogram::<u64>::new_with_bounds(1, MAX_TRACKED_LATENCY_US, 3)
            .map_err(Error::CreateHistogram)?;
        for latency in &self.latencies {
            histogram.saturating_record(u64::try_from(latency.as_micros()).unwrap_or(u64::MAX));
        }
        let quantile = |q: f64| Duration::from_micros(histogram.value_at_quantile(q));

        let secs = elapsed.as_secs_f64();
        let rate = |count: u64| {
            if secs > 0.0 {
                count as f64 / secs
            } else {
                0.0
            }
        };

        Ok(Summary {
            requests,
            failures: self.failures,
            rpc_errors: self.rpc_errors,
            blocks: self.blocks,
            logs: self.logs,
            min_latency: min,
            max_latency: max,
            mean_latency: mean,
            p50_latency: quantile(0.50),
            p90_latency: quantile(0.90),
            p99_latency: quantile(0.99),
            elapsed,
            requests_per_sec: rate(requests),
            blocks_per_sec: rate(self.blocks),
            logs_per_sec: self.logs.map(rate),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub requests: u64,
    pub failures: u64,
    pub rpc_errors: u64,
    pub blocks: u64,
    pub logs: Option<u64>,
    pub min_latency: Duration,
    pub max_latency: Duration,
    pub mean_latency: Duration,
    pub p50_latency: Duration,
    pub p90_latency: Duration,
    pub p99_latency: Duration,
    pub elapsed: Duration,
    pub requests_per_sec: f64,
    pub blocks_per_sec: f64,
    pub logs_per_sec: Option<f64>,
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "requests:         {}", self.requests)?;
        writeln!(f, "failed requests:  {}", self.failures)?;
        writeln!(f, "rpc errors:       {}", self.rpc_errors)?;
        writeln!(f, "blocks processed: {}", self.blocks)?;
        if let Some(logs) = self.logs {
            writeln!(f, "logs found:       {}", logs)?;
        }
        writeln!(f, "min latency:      {:.2}ms", ms(self.min_latency))?;
        writeln!(f, "max latency:      {:.2}ms", ms(self.max_latency))?;
        writeln!(f, "mean latency:     {:.2}ms", ms(self.mean_latency))?;
        writeln!(
            f,
            "p50/p90/p99:      {:.2}ms / {:.2}ms / {:.2}ms",
            ms(self.p50_latency),
            ms(self.p90_latency),
            ms(self.p99_latency)
        )?;
        writeln!(f, "total time:       {:.2}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "requests/s:       {:.2}", self.requests_per_sec)?;
        write!(f, "blocks/s:         {:.2}", self.blocks_per_sec)?;
        if let Some(logs_per_sec) = self.logs_per_sec {
            write!(f, "\nlogs/s:           {:.2}", logs_per_sec)?;
        }
        Ok(())
    }
}
