use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::cmp;
use std::fmt;
use std::time::Duration;

/// Inclusive range of block numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    pub fn new(from: u64, to: u64) -> Self {
        debug_assert!(from <= to);
        Self { from, to }
    }

    pub fn num_blocks(&self) -> u64 {
        self.to - self.from + 1
    }

    /// Smallest range that contains both ranges.
    pub fn merge(self, other: BlockRange) -> BlockRange {
        BlockRange {
            from: cmp::min(self.from, other.from),
            to: cmp::max(self.to, other.to),
        }
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// One http request worth of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkUnit {
    /// Block numbers, each one becomes a call inside the batch.
    BlockBatch(Vec<u64>),
    /// Block windows, each one becomes an `eth_getLogs` call inside the batch.
    RangeBatch(Vec<BlockRange>),
}

impl WorkUnit {
    /// Number of calls inside the batch request.
    pub fn num_calls(&self) -> usize {
        match self {
            WorkUnit::BlockBatch(blocks) => blocks.len(),
            WorkUnit::RangeBatch(ranges) => ranges.len(),
        }
    }

    /// Blocks the unit asks for.
    pub fn num_blocks(&self) -> u64 {
        match self {
            WorkUnit::BlockBatch(blocks) => blocks.len() as u64,
            WorkUnit::RangeBatch(ranges) => ranges.iter().map(BlockRange::num_blocks).sum(),
        }
    }

    pub fn block_range(&self) -> Option<BlockRange> {
        match self {
            WorkUnit::BlockBatch(blocks) => {
                let from = *blocks.first()?;
                let to = *blocks.last()?;
                Some(BlockRange { from, to })
            }
            WorkUnit::RangeBatch(ranges) => {
                let from = ranges.first()?.from;
                let to = ranges.last()?.to;
                Some(BlockRange { from, to })
            }
        }
    }
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            WorkUnit::BlockBatch(_) => "blocks",
            WorkUnit::RangeBatch(_) => "ranges",
        };
        match self.block_range() {
            Some(range) => write!(f, "{} {}", kind, range),
            None => write!(f, "{} <empty>", kind),
        }
    }
}

/// Method specific part of a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Blocks {
        count: u64,
    },
    Logs {
        count: u64,
        /// Blocks actually covered by the response, `None` when no
        /// response could be matched back to a requested window.
        covered: Option<BlockRange>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestResult {
    pub latency: Duration,
    pub payload: Payload,
    /// Calls inside the batch that came back with a json-rpc error object.
    pub rpc_errors: usize,
}

impl RequestResult {
    pub fn num_blocks(&self) -> u64 {
        match self.payload {
            Payload::Blocks { count } => count,
            Payload::Logs { covered, .. } => covered.map(|r| r.num_blocks()).unwrap_or(0),
        }
    }

    pub fn num_logs(&self) -> Option<u64> {
        match self.payload {
            Payload::Blocks { .. } => None,
            Payload::Logs { count, .. } => Some(count),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaybeBatch<T> {
    Batch(Vec<T>),
    Single(T),
}

impl RpcResponse {
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.as_ref().and_then(JsonValue::as_u64)
    }
}

impl<T> MaybeBatch<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            MaybeBatch::Batch(items) => items,
            MaybeBatch::Single(item) => vec![item],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    /// Any json value, only unsigned integer ids are ever matched to requests.
    #[serde(default)]
    pub id: Option<JsonValue>,
    #[serde(default)]
    pub result: Option<JsonValue>,
    #[serde(default)]
    pub error: Option<JsonValue>,
}
