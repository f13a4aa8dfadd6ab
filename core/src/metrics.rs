use crate::dispatcher::Observer;
use crate::types::{RequestResult, WorkUnit};
use crate::{Error, Result};
use core::sync::atomic::AtomicI64;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge as GaugeImpl;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

type InFlightGauge = GaugeImpl<i64, AtomicI64>;

pub struct BenchMetrics {
    requests: Family<Label, Counter>,
    in_flight: InFlightGauge,
    latency: Histogram,
    blocks: Counter,
    registry: Registry,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, EncodeLabelValue)]
enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, EncodeLabelSet)]
struct Label {
    outcome: Outcome,
}

impl BenchMetrics {
    pub fn new() -> Self {
        let requests = Family::<Label, Counter>::default();
        let in_flight = InFlightGauge::default();
        let latency = Histogram::new(exponential_buckets(1.0, 2.0, 16));
        let blocks = Counter::default();
        let mut registry = <Registry>::default();

        registry.register(
            "eth_bench_requests",
            "Finished http requests by outcome",
            requests.clone(),
        );
        registry.register(
            "eth_bench_requests_in_flight",
            "Http requests currently in flight",
            in_flight.clone(),
        );
        registry.register(
            "eth_bench_request_latency_ms",
            "Latency of successful http requests in milliseconds",
            latency.clone(),
        );
        registry.register(
            "eth_bench_blocks",
            "Blocks covered by successful requests",
            blocks.clone(),
        );

        Self {
            requests,
            in_flight,
            latency,
            blocks,
            registry,
        }
    }

    pub fn encode(&self) -> Result<String> {
        let mut buf = String::new();

        encode(&mut buf, &self.registry).map_err(Error::EncodeMetrics)?;

        Ok(buf)
    }

    fn count(&self, outcome: Outcome) {
        self.requests.get_or_create(&Label { outcome }).inc();
        self.in_flight.dec();
    }
}

impl Default for BenchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for BenchMetrics {
    fn on_launch(&self, _unit: &WorkUnit) {
        self.in_flight.inc();
    }

    fn on_success(&self, _unit: &WorkUnit, result: &RequestResult) {
        self.count(Outcome::Success);
        self.latency.observe(result.latency.as_secs_f64() * 1000.0);
        self.blocks.inc_by(result.num_blocks());
    }

    fn on_failure(&self, _unit: &WorkUnit, _error: &Error) {
        self.count(Outcome::Failure);
    }
}
