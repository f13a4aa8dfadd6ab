use crate::config::RunConfig;
use crate::dispatcher::{Dispatcher, Observer, RunState};
use crate::eth_client::EthClient;
use crate::Result;

/// A single benchmark run against one rpc endpoint.
pub struct Benchmark {
    cfg: RunConfig,
    eth_client: EthClient,
}

impl Benchmark {
    pub fn new(cfg: RunConfig) -> Result<Self> {
        let eth_client = EthClient::new(cfg.rpc_url.clone(), cfg.http)?;

        Ok(Self { cfg, eth_client })
    }

    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    /// Number of http requests the run is going to make.
    pub fn num_requests(&self) -> Result<usize> {
        Ok(self.cfg.work_units()?.len())
    }

    pub async fn run<O: Observer + ?Sized>(&self, observer: &O) -> Result<RunState> {
        let units = self.cfg.work_units()?;

        log::info!(
            "running {} for blocks {}-{} in {} requests, concurrency {}",
            self.cfg.call.method(),
            self.cfg.start_block,
            self.cfg.end_block,
            units.len(),
            self.cfg.concurrency,
        );

        let call = &self.cfg.call;
        let eth_client = &self.eth_client;

        let run = Dispatcher::new(units, self.cfg.concurrency)
            .run(
                |unit| async move { eth_client.execute(call, &unit).await },
                observer,
            )
            .await;

        log::info!(
            "finished {} requests ({} failed) in {}ms",
            run.completed(),
            run.stats().num_failures(),
            run.elapsed().as_millis(),
        );

        Ok(run)
    }
}
