//! Splitting of an inclusive block range into work units.
//!
//! Partitions are lazy iterators so very large ranges never get
//! materialized up front. Both partitions are deterministic and cover every
//! block of the range exactly once, in ascending order.

use crate::types::{BlockRange, WorkUnit};
use crate::{Error, Result};

/// Consecutive windows of at most `width` blocks.
#[derive(Debug, Clone)]
pub struct Windows {
    next: Option<u64>,
    end: u64,
    width: u64,
}

impl Windows {
    pub fn new(start: u64, end: u64, width: u64) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange(start, end));
        }

        Ok(Self {
            next: Some(start),
            end,
            width: width.max(1),
        })
    }
}

impl Iterator for Windows {
    type Item = BlockRange;

    fn next(&mut self) -> Option<BlockRange> {
        let from = self.next?;
        let to = from.saturating_add(self.width - 1).min(self.end);

        self.next = if to == self.end { None } else { Some(to + 1) };

        Some(BlockRange { from, to })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match self.next {
            Some(next) => {
                let remaining = u128::from(self.end - next) + 1;
                let width = u128::from(self.width);
                usize::try_from((remaining + width - 1) / width).unwrap_or(usize::MAX)
            }
            None => 0,
        };

        (len, Some(len))
    }
}

impl ExactSizeIterator for Windows {}

/// Block numbers grouped `batch_size` at a time, one batch per work unit.
///
/// A `batch_size` of 0 or 1 gives one unit per block.
#[derive(Debug, Clone)]
pub struct BlockBatches {
    windows: Windows,
}

impl BlockBatches {
    pub fn new(start: u64, end: u64, batch_size: u64) -> Result<Self> {
        Ok(Self {
            windows: Windows::new(start, end, batch_size)?,
        })
    }
}

impl Iterator for BlockBatches {
    type Item = WorkUnit;

    fn next(&mut self) -> Option<WorkUnit> {
        let window = self.windows.next()?;
        Some(WorkUnit::BlockBatch((window.from..=window.to).collect()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.windows.size_hint()
    }
}

impl ExactSizeIterator for BlockBatches {}

/// Windows of `width` blocks, `group_size` windows per work unit.
#[derive(Debug, Clone)]
pub struct RangeBatches {
    windows: Windows,
    group_size: usize,
}

impl RangeBatches {
    pub fn new(start: u64, end: u64, width: u64, group_size: usize) -> Result<Self> {
        Ok(Self {
            windows: Windows::new(start, end, width)?,
            group_size: group_size.max(1),
        })
    }
}

impl Iterator for RangeBatches {
    type Item = WorkUnit;

    fn next(&mut self) -> Option<WorkUnit> {
        let group = self
            .windows
            .by_ref()
            .take(self.group_size)
            .collect::<Vec<_>>();

        if group.is_empty() {
            None
        } else {
            Some(WorkUnit::RangeBatch(group))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let windows = self.windows.len();
        let len = windows / self.group_size + usize::from(windows % self.group_size != 0);
        (len, Some(len))
    }
}

impl ExactSizeIterator for RangeBatches {}

/// Work units of a run, whichever way the range got partitioned.
#[derive(Debug, Clone)]
pub enum WorkUnits {
    Blocks(BlockBatches),
    Ranges(RangeBatches),
}

impl Iterator for WorkUnits {
    type Item = WorkUnit;

    fn next(&mut self) -> Option<WorkUnit> {
        match self {
            WorkUnits::Blocks(units) => units.next(),
            WorkUnits::Ranges(units) => units.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            WorkUnits::Blocks(units) => units.size_hint(),
            WorkUnits::Ranges(units) => units.size_hint(),
        }
    }
}

impl ExactSizeIterator for WorkUnits {}
