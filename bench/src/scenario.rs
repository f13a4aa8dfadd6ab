use crate::{Error, Result};
use eth_bench_core::eth_request::LogFilter;

const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
const UNISWAP_V3_USDC_WETH_005: &str = "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640";
const UNISWAP_V3_USDC_WETH_030: &str = "0x8ad599c3a0ff1de082011efddc58f1908eb6e6d8";

const TRANSFER_TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";
const DEPOSIT_TOPIC: &str = "0xe1fffcc4923d04b559f4d29a8bfc6cda04eb5b0d3c460751c2402c5c5cc9109c";
const SWAP_TOPIC: &str = "0xc42079f94a6350d7e6235f29174924f928cc2ac818eb64fed8004e115fbcca67";

/// A named `eth_getLogs` filter.
#[derive(Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub addresses: &'static [&'static str],
    pub topics: &'static [&'static str],
}

pub const DEFAULT_SCENARIO: &str = "all";

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "all",
        description: "every log in the range",
        addresses: &[],
        topics: &[],
    },
    Scenario {
        name: "erc20-transfers",
        description: "Transfer events of any contract",
        addresses: &[],
        topics: &[TRANSFER_TOPIC],
    },
    Scenario {
        name: "usdc-transfers",
        description: "USDC Transfer events",
        addresses: &[USDC],
        topics: &[TRANSFER_TOPIC],
    },
    Scenario {
        name: "usdt-transfers",
        description: "USDT Transfer events",
        addresses: &[USDT],
        topics: &[TRANSFER_TOPIC],
    },
    Scenario {
        name: "weth-deposits",
        description: "WETH Deposit events",
        addresses: &[WETH],
        topics: &[DEPOSIT_TOPIC],
    },
    Scenario {
        name: "uniswap-v3-swaps",
        description: "Swap events of the USDC/WETH uniswap v3 pools",
        addresses: &[UNISWAP_V3_USDC_WETH_005, UNISWAP_V3_USDC_WETH_030],
        topics: &[SWAP_TOPIC],
    },
];

impl Scenario {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            addresses: self.addresses.iter().map(|a| a.to_string()).collect(),
            topics: self.topics.iter().map(|t| t.to_string()).collect(),
        }
    }
}

pub fn find(name: &str) -> Result<&'static Scenario> {
    SCENARIOS
        .iter()
        .find(|scenario| scenario.name == name)
        .ok_or_else(|| {
            let available = SCENARIOS
                .iter()
                .map(|scenario| scenario.name)
                .collect::<Vec<_>>()
                .join(", ");
            Error::UnknownScenario(name.to_owned(), available)
        })
}
