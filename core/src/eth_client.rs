use crate::config::{Call, HttpConfig};
use crate::error::{Error, Result};
use crate::eth_request::{EthRequest, GetBlockByNumber, GetBlockReceipts, GetLogs};
use crate::types::{BlockRange, MaybeBatch, Payload, RequestResult, RpcResponse, WorkUnit};
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};

pub struct EthClient {
    http_client: reqwest::Client,
    rpc_url: url::Url,
}

impl EthClient {
    pub fn new(rpc_url: url::Url, cfg: HttpConfig) -> Result<EthClient> {
        let request_timeout = Duration::from_secs(cfg.request_timeout_secs.get());
        let connect_timeout = Duration::from_millis(cfg.connect_timeout_ms.get());

        let http_client = reqwest::ClientBuilder::new()
            .gzip(true)
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(Error::BuildHttpClient)?;

        Ok(EthClient {
            http_client,
            rpc_url,
        })
    }

    /// Sends `requests` as one json-rpc batch with ids starting from 1.
    ///
    /// Returned latency covers sending the request and receiving the full body.
    pub async fn send_batch<R: EthRequest>(
        &self,
        requests: &[R],
    ) -> Result<(Duration, Vec<RpcResponse>)> {
        let req_body = requests
            .iter()
            .enumerate()
            .map(|(i, req)| req.to_body(i + 1))
            .collect::<Vec<_>>();
        let req_body = JsonValue::Array(req_body);

        let start_time = Instant::now();

        let resp = self
            .http_client
            .post(self.rpc_url.clone())
            .json(&req_body)
            .send()
            .await
            .map_err(Error::HttpRequest)?;

        let resp_status = resp.status();
        if !resp_status.is_success() {
            let body = resp.text().await.ok();
            return Err(Error::RpcResponseStatus(resp_status.as_u16(), body));
        }

        let resp_body = resp.bytes().await.map_err(Error::ReadResponseBody)?;
        let latency = start_time.elapsed();

        let resp_body: MaybeBatch<RpcResponse> =
            serde_json::from_slice(&resp_body).map_err(Error::RpcResponseParseJson)?;

        Ok((latency, resp_body.into_vec()))
    }

    /// Runs `call` for every element of `unit` inside a single batch request.
    pub async fn execute(&self, call: &Call, unit: &WorkUnit) -> Result<RequestResult> {
        match (call, unit) {
            (Call::BlockByNumber { full_transactions }, WorkUnit::BlockBatch(blocks)) => {
                let requests = blocks
                    .iter()
                    .map(|&block_number| GetBlockByNumber {
                        block_number,
                        full_transactions: *full_transactions,
                    })
                    .collect::<Vec<_>>();
                let (latency, responses) = self.send_batch(&requests).await?;

                Ok(blocks_result(latency, blocks.len(), &responses))
            }
            (Call::BlockReceipts, WorkUnit::BlockBatch(blocks)) => {
                let requests = blocks
                    .iter()
                    .map(|&block_number| GetBlockReceipts { block_number })
                    .collect::<Vec<_>>();
                let (latency, responses) = self.send_batch(&requests).await?;

                Ok(blocks_result(latency, blocks.len(), &responses))
            }
            (Call::Logs(filter), WorkUnit::RangeBatch(ranges)) => {
                let requests = ranges
                    .iter()
                    .map(|&range| GetLogs { range, filter })
                    .collect::<Vec<_>>();
                let (latency, responses) = self.send_batch(&requests).await?;

                Ok(logs_result(latency, ranges, &responses))
            }
            _ => Err(Error::UnitMismatch {
                method: call.method(),
                unit: unit.to_string(),
            }),
        }
    }
}

fn count_rpc_errors(responses: &[RpcResponse]) -> usize {
    responses
        .iter()
        .filter(|resp| match &resp.error {
            Some(error) => {
                log::warn!("rpc error for request id {:?}: {}", resp.id, error);
                true
            }
            None => false,
        })
        .count()
}

fn blocks_result(latency: Duration, num_blocks: usize, responses: &[RpcResponse]) -> RequestResult {
    RequestResult {
        latency,
        payload: Payload::Blocks {
            count: num_blocks as u64,
        },
        rpc_errors: count_rpc_errors(responses),
    }
}

/// Counts returned logs and finds the blocks the responses actually cover.
///
/// Responses are matched back to `ranges` by id, `id = i + 1` belongs to
/// `ranges[i]`. Responses with unknown ids still count towards the number of
/// logs but never towards coverage.
pub fn logs_result(
    latency: Duration,
    ranges: &[BlockRange],
    responses: &[RpcResponse],
) -> RequestResult {
    let mut count = 0;
    let mut covered: Option<BlockRange> = None;

    for resp in responses {
        let logs = match &resp.result {
            Some(JsonValue::Array(logs)) => logs,
            _ => continue,
        };
        count += logs.len() as u64;

        let range = resp
            .numeric_id()
            .and_then(|id| id.checked_sub(1))
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| ranges.get(i));

        if let Some(&range) = range {
            covered = Some(match covered {
                Some(covered) => covered.merge(range),
                None => range,
            });
        }
    }

    RequestResult {
        latency,
        payload: Payload::Logs { count, covered },
        rpc_errors: count_rpc_errors(responses),
    }
}
