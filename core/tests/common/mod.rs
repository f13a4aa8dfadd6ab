use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use serde_json::{json, Value as JsonValue};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Minimal json-rpc node answering block, receipt and log calls.
#[derive(Default)]
pub struct MockRpc {
    pub fail_blocks: Vec<u64>,
    pub always_fail: bool,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub requests: AtomicUsize,
    pub bodies: Mutex<Vec<JsonValue>>,
}

impl MockRpc {
    pub fn failing_on(fail_blocks: Vec<u64>) -> Self {
        Self {
            fail_blocks,
            ..Default::default()
        }
    }

    pub fn always_failing() -> Self {
        Self {
            always_fail: true,
            ..Default::default()
        }
    }
}

pub async fn launch(mock: Arc<MockRpc>) -> url::Url {
    let make_service = make_service_fn(move |_| {
        let mock = mock.clone();
        async move { Ok::<_, Infallible>(service_fn(move |req| handle(mock.clone(), req))) }
    });

    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
    let addr = server.local_addr();
    tokio::spawn(server);

    format!("http://{}", addr).parse().unwrap()
}

fn parse_hex(hex: &JsonValue) -> u64 {
    u64::from_str_radix(hex.as_str().unwrap().trim_start_matches("0x"), 16).unwrap()
}

fn call_blocks(call: &JsonValue) -> (u64, u64) {
    let params = &call["params"][0];
    match call["method"].as_str().unwrap() {
        "eth_getLogs" => (parse_hex(&params["fromBlock"]), parse_hex(&params["toBlock"])),
        _ => {
            let block = parse_hex(params);
            (block, block)
        }
    }
}

async fn handle(mock: Arc<MockRpc>, req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let now = mock.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    mock.max_in_flight.fetch_max(now, Ordering::SeqCst);
    mock.requests.fetch_add(1, Ordering::SeqCst);

    let body = hyper::body::to_bytes(req.into_body()).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&body).unwrap();
    mock.bodies.lock().unwrap().push(body.clone());

    tokio::time::sleep(Duration::from_millis(5)).await;
    mock.in_flight.fetch_sub(1, Ordering::SeqCst);

    let calls = body.as_array().unwrap();
    let failed = mock.always_fail
        || calls.iter().any(|call| {
            let (from, to) = call_blocks(call);
            mock.fail_blocks.iter().any(|b| (from..=to).contains(b))
        });
    if failed {
        return Ok(Response::builder()
            .status(StatusCode::SERVICE_UNAVAILABLE)
            .body(Body::from("overloaded"))
            .unwrap());
    }

    let mut responses = calls
        .iter()
        .map(|call| {
            let result = match call["method"].as_str().unwrap() {
                "eth_getBlockByNumber" => json!({ "number": call["params"][0] }),
                "eth_getBlockReceipts" => json!([]),
                "eth_getLogs" => json!([{ "blockNumber": call["params"][0]["fromBlock"] }]),
                _ => JsonValue::Null,
            };
            json!({ "jsonrpc": "2.0", "id": call["id"], "result": result })
        })
        .collect::<Vec<_>>();
    responses.reverse();

    let body = if responses.len() == 1 {
        responses.remove(0)
    } else {
        JsonValue::Array(responses)
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .body(Body::from(body.to_string()))
        .unwrap())
}
