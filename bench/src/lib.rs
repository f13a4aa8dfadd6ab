pub mod config;
mod error;
pub mod progress;
pub mod report;
pub mod scenario;

pub use config::{EntryPoint, GetBlockReceiptsConfig, GetBlocksConfig, GetLogsConfig};
pub use error::{Error, Result};

use eth_bench_core::benchmark::Benchmark;
use eth_bench_core::metrics::BenchMetrics;
use progress::ProgressReporter;
use report::Report;

/// Runs the benchmark described by `config` and prints its report.
pub async fn run<C: EntryPoint>(config: C) -> Result<()> {
    let run_config = config.run_config()?;
    let common = config.common();

    let benchmark = Benchmark::new(run_config).map_err(Error::Benchmark)?;
    let total_requests = benchmark.num_requests().map_err(Error::Benchmark)?;

    let progress = ProgressReporter::new(total_requests as u64, common.show_progress_bar);
    let metrics = BenchMetrics::new();

    let run = benchmark
        .run(&(&progress, &metrics))
        .await
        .map_err(Error::Benchmark)?;

    let summary = run.summary();
    println!("{}", Report::new(benchmark.config(), &summary));

    if common.print_metrics {
        let metrics = metrics.encode().map_err(Error::EncodeMetrics)?;
        println!("{}", metrics);
    }

    Ok(())
}
