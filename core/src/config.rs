use crate::eth_request::{EthRequest, GetBlockByNumber, GetBlockReceipts, GetLogs, LogFilter};
use crate::partition::{BlockBatches, RangeBatches, WorkUnits};
use crate::{Error, Result};
use clap::Args;
use std::num::{NonZeroU64, NonZeroUsize};

/// Upper bound for the number of requests in flight.
pub const MAX_CONCURRENCY: usize = 100_000;

#[derive(Args, Debug, Clone, Copy)]
pub struct HttpConfig {
    /// Http request timeout in seconds
    #[clap(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: NonZeroU64,
    /// Http connect timeout in milliseconds
    #[clap(long, env = "CONNECT_TIMEOUT_MS", default_value = "5000")]
    pub connect_timeout_ms: NonZeroU64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: NonZeroU64::new(30).unwrap_or(NonZeroU64::MIN),
            connect_timeout_ms: NonZeroU64::new(5000).unwrap_or(NonZeroU64::MIN),
        }
    }
}

/// The json-rpc method a run benchmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BlockByNumber { full_transactions: bool },
    BlockReceipts,
    Logs(LogFilter),
}

impl Call {
    pub fn method(&self) -> &'static str {
        match self {
            Call::BlockByNumber { .. } => GetBlockByNumber::METHOD,
            Call::BlockReceipts => GetBlockReceipts::METHOD,
            Call::Logs(_) => <GetLogs<'static> as EthRequest>::METHOD,
        }
    }
}

/// How the block range is cut into work units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// `batch_size` block numbers per http request, 0 and 1 both mean one.
    Blocks { batch_size: u64 },
    /// Windows of `window` blocks, `group_size` windows per http request.
    Ranges { window: u64, group_size: usize },
}

/// Everything a single benchmark run needs, resolved once before it starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub rpc_url: url::Url,
    pub start_block: u64,
    pub end_block: u64,
    pub concurrency: NonZeroUsize,
    pub partition: Partition,
    pub call: Call,
    pub http: HttpConfig,
}

impl RunConfig {
    pub fn new(
        rpc_url: url::Url,
        start_block: u64,
        end_block: u64,
        concurrency: usize,
        partition: Partition,
        call: Call,
        http: HttpConfig,
    ) -> Result<Self> {
        if start_block > end_block {
            return Err(Error::InvalidRange(start_block, end_block));
        }

        let concurrency = NonZeroUsize::new(concurrency)
            .filter(|c| c.get() <= MAX_CONCURRENCY)
            .ok_or(Error::InvalidConcurrency {
                got: concurrency,
                max: MAX_CONCURRENCY,
            })?;

        match partition {
            Partition::Ranges { window: 0, .. } => return Err(Error::InvalidUnitSize("window size")),
            Partition::Ranges { group_size: 0, .. } => {
                return Err(Error::InvalidUnitSize("group size"))
            }
            _ => (),
        }

        Ok(Self {
            rpc_url,
            start_block,
            end_block,
            concurrency,
            partition,
            call,
            http,
        })
    }

    pub fn num_blocks(&self) -> u64 {
        self.end_block - self.start_block + 1
    }

    pub fn work_units(&self) -> Result<WorkUnits> {
        let units = match self.partition {
            Partition::Blocks { batch_size } => WorkUnits::Blocks(BlockBatches::new(
                self.start_block,
                self.end_block,
                batch_size,
            )?),
            Partition::Ranges { window, group_size } => WorkUnits::Ranges(RangeBatches::new(
                self.start_block,
                self.end_block,
                window,
                group_size,
            )?),
        };

        Ok(units)
    }
}
