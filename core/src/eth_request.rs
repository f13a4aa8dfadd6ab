use crate::types::BlockRange;
use serde_json::Value as JsonValue;

/// A single json-rpc call that can be put inside a batch request.
pub trait EthRequest {
    const METHOD: &'static str;

    fn params(&self) -> JsonValue;

    fn to_body(&self, id: usize) -> JsonValue {
        serde_json::json!({
            "jsonrpc": "2.0",
            "method": Self::METHOD,
            "params": self.params(),
            "id": id,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetBlockByNumber {
    pub block_number: u64,
    pub full_transactions: bool,
}

impl EthRequest for GetBlockByNumber {
    const METHOD: &'static str = "eth_getBlockByNumber";

    fn params(&self) -> JsonValue {
        serde_json::json!([
            block_number_to_hex(self.block_number),
            self.full_transactions,
        ])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetBlockReceipts {
    pub block_number: u64,
}

impl EthRequest for GetBlockReceipts {
    const METHOD: &'static str = "eth_getBlockReceipts";

    fn params(&self) -> JsonValue {
        serde_json::json!([block_number_to_hex(self.block_number)])
    }
}

/// Address and topic filter applied to every `eth_getLogs` call of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub addresses: Vec<String>,
    /// Topic0 alternatives, empty means any topic.
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct GetLogs<'a> {
    pub range: BlockRange,
    pub filter: &'a LogFilter,
}

impl EthRequest for GetLogs<'_> {
    const METHOD: &'static str = "eth_getLogs";

    fn params(&self) -> JsonValue {
        let mut filter = serde_json::json!({
            "fromBlock": block_number_to_hex(self.range.from),
            "toBlock": block_number_to_hex(self.range.to),
        });

        if !self.filter.addresses.is_empty() {
            filter["address"] = serde_json::json!(self.filter.addresses);
        }
        if !self.filter.topics.is_empty() {
            filter["topics"] = serde_json::json!([self.filter.topics]);
        }

        serde_json::json!([filter])
    }
}

pub fn block_number_to_hex(block_number: u64) -> String {
    format!("0x{:x}", block_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_body() {
        let req = GetBlockByNumber {
            block_number: 255,
            full_transactions: false,
        };
        assert_eq!(
            req.to_body(3),
            json!({
                "jsonrpc": "2.0",
                "method": "eth_getBlockByNumber",
                "params": ["0xff", false],
                "id": 3,
            })
        );
    }

    #[test]
    fn test_receipts_body() {
        let req = GetBlockReceipts { block_number: 0 };
        assert_eq!(req.to_body(1)["params"], json!(["0x0"]));
        assert_eq!(req.to_body(1)["method"], json!("eth_getBlockReceipts"));
    }

    #[test]
    fn test_logs_body() {
        let filter = LogFilter::default();
        let req = GetLogs {
            range: BlockRange::new(16, 31),
            filter: &filter,
        };
        assert_eq!(
            req.params(),
            json!([{ "fromBlock": "0x10", "toBlock": "0x1f" }])
        );

        let filter = LogFilter {
            addresses: vec!["0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".to_owned()],
            topics: vec![
                "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef".to_owned(),
            ],
        };
        let req = GetLogs {
            range: BlockRange::new(1, 1),
            filter: &filter,
        };
        assert_eq!(
            req.params(),
            json!([{
                "fromBlock": "0x1",
                "toBlock": "0x1",
                "address": ["0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"],
                "topics": [["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"]],
            }])
        );
    }
}
