use eth_bench_core::config::RunConfig;
use eth_bench_core::stats::Summary;
use eth_bench_core::Result as CoreResult;
use std::fmt;

/// End of run summary block.
pub struct Report<'a> {
    cfg: &'a RunConfig,
    summary: &'a CoreResult<Summary>,
}

impl<'a> Report<'a> {
    pub fn new(cfg: &'a RunConfig, summary: &'a CoreResult<Summary>) -> Self {
        Self { cfg, summary }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "method:           {}", self.cfg.call.method())?;
        writeln!(
            f,
            "block range:      {}-{} ({} blocks)",
            self.cfg.start_block,
            self.cfg.end_block,
            self.cfg.num_blocks()
        )?;
        writeln!(f, "concurrency:      {}", self.cfg.concurrency)?;

        match self.summary {
            Ok(summary) => write!(f, "{}", summary),
            Err(e) => write!(f, "no statistics available: {}", e),
        }
    }
}
