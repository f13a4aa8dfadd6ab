use std::result::Result as StdResult;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid configuration:\n{0}")]
    Config(eth_bench_core::Error),
    #[error("unknown scenario {0:?}, available scenarios: {1}")]
    UnknownScenario(String, String),
    #[error("failed to run benchmark:\n{0}")]
    Benchmark(eth_bench_core::Error),
    #[error("failed to encode metrics:\n{0}")]
    EncodeMetrics(eth_bench_core::Error),
}

pub type Result<T> = StdResult<T, Error>;
