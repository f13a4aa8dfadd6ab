use crate::scenario::{self, DEFAULT_SCENARIO};
use crate::{Error, Result};
use clap::builder::{BoolishValueParser, RangedU64ValueParser};
use clap::{ArgAction, Args, Parser};
use eth_bench_core::config::{Call, HttpConfig, Partition, RunConfig, MAX_CONCURRENCY};

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Json-rpc endpoint to benchmark
    pub rpc_url: url::Url,
    /// First block of the range, inclusive
    #[clap(long, env = "START_BLOCK", default_value_t = 18_000_000)]
    pub start_block: u64,
    /// Last block of the range, inclusive
    #[clap(long, env = "END_BLOCK", default_value_t = 18_000_999)]
    pub end_block: u64,
    /// Maximum number of http requests in flight
    #[clap(
        long,
        env = "FETCH_CONCURRENCY",
        default_value_t = 5,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_CONCURRENCY as u64)
    )]
    pub concurrency: usize,
    /// Render a progress bar while running
    #[clap(
        long,
        env = "SHOW_PROGRESS_BAR",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub show_progress_bar: bool,
    /// Print collected metrics in openmetrics format after the summary
    #[clap(
        long,
        env = "PRINT_METRICS",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub print_metrics: bool,

    #[command(flatten)]
    pub http: HttpConfig,
}

impl CommonArgs {
    fn run_config(&self, partition: Partition, call: Call) -> Result<RunConfig> {
        RunConfig::new(
            self.rpc_url.clone(),
            self.start_block,
            self.end_block,
            self.concurrency,
            partition,
            call,
            self.http,
        )
        .map_err(Error::Config)
    }
}

/// Configuration of one of the benchmark binaries.
pub trait EntryPoint {
    fn common(&self) -> &CommonArgs;

    fn run_config(&self) -> Result<RunConfig>;
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Benchmarks eth_getBlockByNumber", long_about = None)]
pub struct GetBlocksConfig {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Blocks per http request
    #[clap(long, env = "CHUNK_SIZE", default_value_t = 10)]
    pub chunk_size: u64,
    /// Ask for full transaction objects instead of hashes
    #[clap(
        long,
        env = "FULL_TRANSACTIONS",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub full_transactions: bool,
}

impl GetBlocksConfig {
    pub fn parse() -> Self {
        parse_or_exit()
    }
}

impl EntryPoint for GetBlocksConfig {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn run_config(&self) -> Result<RunConfig> {
        self.common.run_config(
            Partition::Blocks {
                batch_size: self.chunk_size,
            },
            Call::BlockByNumber {
                full_transactions: self.full_transactions,
            },
        )
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Benchmarks eth_getBlockReceipts", long_about = None)]
pub struct GetBlockReceiptsConfig {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Blocks per http request
    #[clap(long, env = "CHUNK_SIZE", default_value_t = 10)]
    pub chunk_size: u64,
}

impl GetBlockReceiptsConfig {
    pub fn parse() -> Self {
        parse_or_exit()
    }
}

impl EntryPoint for GetBlockReceiptsConfig {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn run_config(&self) -> Result<RunConfig> {
        self.common.run_config(
            Partition::Blocks {
                batch_size: self.chunk_size,
            },
            Call::BlockReceipts,
        )
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Benchmarks eth_getLogs", long_about = None)]
pub struct GetLogsConfig {
    #[command(flatten)]
    pub common: CommonArgs,
    /// Named log filter to scan with
    pub scenario: Option<String>,
    /// Blocks per eth_getLogs call
    #[clap(long, env = "CHUNK_SIZE", default_value_t = 1000)]
    pub chunk_size: u64,
    /// eth_getLogs calls per http request
    #[clap(long, env = "BATCH_SIZE", default_value_t = 1)]
    pub batch_size: usize,
}

impl GetLogsConfig {
    pub fn parse() -> Self {
        parse_or_exit()
    }
}

impl EntryPoint for GetLogsConfig {
    fn common(&self) -> &CommonArgs {
        &self.common
    }

    fn run_config(&self) -> Result<RunConfig> {
        let scenario = scenario::find(self.scenario.as_deref().unwrap_or(DEFAULT_SCENARIO))?;
        log::info!("using scenario {}: {}", scenario.name, scenario.description);

        self.common.run_config(
            Partition::Ranges {
                window: self.chunk_size,
                group_size: self.batch_size,
            },
            Call::Logs(scenario.filter()),
        )
    }
}

/// Parses the command line, exiting with code 1 on invalid input.
fn parse_or_exit<C: Parser>() -> C {
    match C::try_parse() {
        Ok(config) => config,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    }
}
