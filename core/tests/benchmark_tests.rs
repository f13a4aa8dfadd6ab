use common::{launch, MockRpc};
use eth_bench_core::benchmark::Benchmark;
use eth_bench_core::config::{Call, HttpConfig, Partition, RunConfig};
use eth_bench_core::dispatcher::DispatchState;
use eth_bench_core::eth_client::EthClient;
use eth_bench_core::eth_request::LogFilter;
use eth_bench_core::types::{BlockRange, Payload, WorkUnit};
use eth_bench_core::Error;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

mod common;

fn run_config(
    rpc_url: url::Url,
    start: u64,
    end: u64,
    concurrency: usize,
    partition: Partition,
    call: Call,
) -> RunConfig {
    RunConfig::new(
        rpc_url,
        start,
        end,
        concurrency,
        partition,
        call,
        HttpConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn batch_body_has_sequential_ids() {
    let mock = Arc::new(MockRpc::default());
    let rpc_url = launch(mock.clone()).await;
    let client = EthClient::new(rpc_url, HttpConfig::default()).unwrap();

    let unit = WorkUnit::BlockBatch(vec![16, 17, 18]);
    let res = client
        .execute(
            &Call::BlockByNumber {
                full_transactions: true,
            },
            &unit,
        )
        .await
        .unwrap();

    assert_eq!(res.payload, Payload::Blocks { count: 3 });
    assert_eq!(res.rpc_errors, 0);

    let bodies = mock.bodies.lock().unwrap();
    assert_eq!(
        bodies[0],
        json!([
            {"jsonrpc": "2.0", "id": 1, "method": "eth_getBlockByNumber", "params": ["0x10", true]},
            {"jsonrpc": "2.0", "id": 2, "method": "eth_getBlockByNumber", "params": ["0x11", true]},
            {"jsonrpc": "2.0", "id": 3, "method": "eth_getBlockByNumber", "params": ["0x12", true]},
        ])
    );
}

#[tokio::test]
async fn single_call_is_still_a_batch() {
    let mock = Arc::new(MockRpc::default());
    let rpc_url = launch(mock.clone()).await;
    let client = EthClient::new(rpc_url, HttpConfig::default()).unwrap();

    let filter = LogFilter::default();
    let unit = WorkUnit::RangeBatch(vec![BlockRange::new(5, 9)]);
    let res = client.execute(&Call::Logs(filter), &unit).await.unwrap();

    // the mock answers single calls with a bare object
    assert_eq!(
        res.payload,
        Payload::Logs {
            count: 1,
            covered: Some(BlockRange::new(5, 9)),
        }
    );
    assert!(mock.bodies.lock().unwrap()[0].is_array());
}

#[tokio::test]
async fn http_error_status_is_transport_error() {
    let mock = Arc::new(MockRpc::always_failing());
    let rpc_url = launch(mock).await;
    let client = EthClient::new(rpc_url, HttpConfig::default()).unwrap();

    let res = client
        .execute(&Call::BlockReceipts, &WorkUnit::BlockBatch(vec![1]))
        .await;

    match res {
        Err(e @ Error::RpcResponseStatus(503, _)) => assert!(e.is_transport()),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn block_benchmark_respects_concurrency() {
    let mock = Arc::new(MockRpc::default());
    let rpc_url = launch(mock.clone()).await;
    let cfg = run_config(
        rpc_url,
        0,
        99,
        3,
        Partition::Blocks { batch_size: 10 },
        Call::BlockByNumber {
            full_transactions: false,
        },
    );

    let benchmark = Benchmark::new(cfg).unwrap();
    assert_eq!(benchmark.num_requests().unwrap(), 10);

    let run = benchmark.run(&()).await.unwrap();

    assert_eq!(run.state(), DispatchState::Done);
    assert_eq!(mock.requests.load(Ordering::SeqCst), 10);
    assert!(mock.max_in_flight.load(Ordering::SeqCst) <= 3);
    assert!(run.peak_outstanding() <= 3);

    let summary = run.summary().unwrap();
    assert_eq!(summary.requests, 10);
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.blocks, 100);
    assert_eq!(summary.logs, None);
    assert!(summary.min_latency <= summary.mean_latency);
    assert!(summary.mean_latency <= summary.max_latency);
}

#[tokio::test]
async fn failed_unit_does_not_stop_the_run() {
    let mock = Arc::new(MockRpc::failing_on(vec![13]));
    let rpc_url = launch(mock.clone()).await;
    let cfg = run_config(
        rpc_url,
        0,
        99,
        2,
        Partition::Blocks { batch_size: 10 },
        Call::BlockReceipts,
    );

    let run = Benchmark::new(cfg).unwrap().run(&()).await.unwrap();

    assert_eq!(run.completed(), 10);
    assert_eq!(mock.requests.load(Ordering::SeqCst), 10);

    let summary = run.summary().unwrap();
    assert_eq!(summary.requests, 9);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.blocks, 90);
}

#[tokio::test]
async fn all_units_failing_still_terminates() {
    let mock = Arc::new(MockRpc::always_failing());
    let rpc_url = launch(mock).await;
    let cfg = run_config(
        rpc_url,
        0,
        49,
        4,
        Partition::Blocks { batch_size: 1 },
        Call::BlockReceipts,
    );

    let run = Benchmark::new(cfg).unwrap().run(&()).await.unwrap();

    assert_eq!(run.state(), DispatchState::Done);
    assert_eq!(run.stats().num_failures(), 50);
    assert!(matches!(run.summary(), Err(Error::NoSamples)));
}

#[tokio::test]
async fn log_scan_counts_logs_and_coverage() {
    let mock = Arc::new(MockRpc::default());
    let rpc_url = launch(mock.clone()).await;
    let cfg = run_config(
        rpc_url,
        0,
        2499,
        2,
        Partition::Ranges {
            window: 1000,
            group_size: 2,
        },
        Call::Logs(LogFilter::default()),
    );

    let run = Benchmark::new(cfg).unwrap().run(&()).await.unwrap();

    assert_eq!(mock.requests.load(Ordering::SeqCst), 2);
    assert_eq!(run.stats().covered(), Some(BlockRange::new(0, 2499)));

    let summary = run.summary().unwrap();
    assert_eq!(summary.requests, 2);
    assert_eq!(summary.logs, Some(3));
    assert_eq!(summary.blocks, 2500);
    assert!(summary.logs_per_sec.is_some());
}

#[tokio::test]
async fn unreachable_endpoint_fails_every_unit() {
    let cfg = run_config(
        "http://127.0.0.1:1".parse().unwrap(),
        0,
        4,
        2,
        Partition::Blocks { batch_size: 1 },
        Call::BlockReceipts,
    );

    let run = Benchmark::new(cfg).unwrap().run(&()).await.unwrap();

    assert_eq!(run.completed(), 5);
    assert_eq!(run.stats().num_failures(), 5);
    assert!(run.summary().is_err());
}
