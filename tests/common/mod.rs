#![allow(dead_code)]

use blockmeta_console::{
    error::{Code, ConnectError, RpcError},
    pb::{
        blockmeta::BlockMeta,
        kv::{GetByPrefixResponse, GetManyResponse, GetResponse, KvPair, ScanResponse},
        service::{Block, Month, Months},
    },
    transport::{BlockMetaClient, KvClient},
};

use prost::Message;
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};
use tokio::sync::oneshot;

pub const HASH: &str = "88e96d4537bea4d9c05d12549907b32561d3bf31f45aae734cdc119f13406cb6";
pub const PARENT_HASH: &str = "d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3";

pub fn block_meta_bytes(number: u64) -> Vec<u8> {
    BlockMeta {
        number,
        hash: hex::decode(HASH).unwrap(),
        parent_hash: hex::decode(PARENT_HASH).unwrap(),
        timestamp: Some(prost_types::Timestamp { seconds: 1_438_270_028, nanos: 0 }),
    }
    .encode_to_vec()
}

pub fn not_found(message: &str) -> RpcError {
    ConnectError { code: Code::NotFound, message: message.to_string() }.into()
}

/// Key-value fake answering from a fixed table; unknown keys are NotFound.
#[derive(Default)]
pub struct TableKv {
    pub values: HashMap<String, Vec<u8>>,
    pub seen:   RefCell<Vec<String>>,
    pub fail_with_transport: Option<String>,
    pub drop_last_value: bool,
}

impl TableKv {
    pub fn with(pairs: &[(&str, Vec<u8>)]) -> Self {
        TableKv {
            values: pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ..Default::default()
        }
    }

    fn lookup(&self, key: &str) -> Result<Vec<u8>, RpcError> {
        self.seen.borrow_mut().push(key.to_string());
        if let Some(msg) = &self.fail_with_transport {
            return Err(RpcError::Transport(msg.clone()));
        }
        self.values.get(key).cloned().ok_or_else(|| not_found("key missing"))
    }

    // sorted pairs matching `keep`, cut at `limit` (0 = no limit)
    fn pairs(&self, keep: impl Fn(&str) -> bool, limit: u64) -> (Vec<KvPair>, bool) {
        let mut keys: Vec<_> = self.values.keys().filter(|k| keep(k)).cloned().collect();
        keys.sort();
        let limit_reached = limit > 0 && keys.len() as u64 > limit;
        if limit > 0 {
            keys.truncate(limit as usize);
        }
        let pairs = keys
            .into_iter()
            .map(|k| KvPair { value: self.values[&k].clone(), key: k })
            .collect();
        (pairs, limit_reached)
    }
}

impl KvClient for TableKv {
    async fn get(&self, key: String) -> Result<GetResponse, RpcError> {
        self.lookup(&key).map(|value| GetResponse { value })
    }

    async fn get_many(&self, keys: Vec<String>) -> Result<GetManyResponse, RpcError> {
        let mut values = keys.iter().map(|k| self.lookup(k)).collect::<Result<Vec<_>, _>>()?;
        if self.drop_last_value {
            values.pop();
        }
        Ok(GetManyResponse { values })
    }

    async fn get_by_prefix(&self, prefix: String, limit: u64) -> Result<GetByPrefixResponse, RpcError> {
        let (key_values, limit_reached) = self.pairs(|k| k.starts_with(&prefix), limit);
        Ok(GetByPrefixResponse { key_values, limit_reached })
    }

    async fn scan(&self, begin: String, exclusive_end: Option<String>, limit: u64) -> Result<ScanResponse, RpcError> {
        let in_range = |k: &str| k >= begin.as_str() && exclusive_end.as_deref().is_none_or(|end| k < end);
        let (key_values, limit_reached) = self.pairs(in_range, limit);
        Ok(ScanResponse { key_values, limit_reached })
    }
}

/// Key-value fake whose answers are released by the test, one channel per key.
pub struct GatedKv {
    gates: RefCell<HashMap<String, oneshot::Receiver<Result<Vec<u8>, RpcError>>>>,
}

impl GatedKv {
    pub fn new(keys: &[&str]) -> (Self, HashMap<String, oneshot::Sender<Result<Vec<u8>, RpcError>>>) {
        let mut gates = HashMap::new();
        let mut senders = HashMap::new();
        for k in keys {
            let (tx, rx) = oneshot::channel();
            gates.insert(k.to_string(), rx);
            senders.insert(k.to_string(), tx);
        }
        (GatedKv { gates: RefCell::new(gates) }, senders)
    }
}

impl KvClient for GatedKv {
    async fn get(&self, key: String) -> Result<GetResponse, RpcError> {
        let gate = self.gates.borrow_mut().remove(&key);
        let Some(gate) = gate else {
            return Err(not_found("no gate"));
        };
        match gate.await {
            Ok(res) => res.map(|value| GetResponse { value }),
            Err(_) => Err(RpcError::Transport("gate dropped".into())),
        }
    }

    async fn get_many(&self, _keys: Vec<String>) -> Result<GetManyResponse, RpcError> {
        Err(RpcError::Transport("not gated".into()))
    }

    async fn get_by_prefix(&self, _prefix: String, _limit: u64) -> Result<GetByPrefixResponse, RpcError> {
        Err(RpcError::Transport("not gated".into()))
    }

    async fn scan(&self, _begin: String, _end: Option<String>, _limit: u64) -> Result<ScanResponse, RpcError> {
        Err(RpcError::Transport("not gated".into()))
    }
}

pub fn block(number: u64, timestamp: &str) -> Block {
    Block {
        number,
        hash: hex::decode(HASH).unwrap(),
        parent_hash: hex::decode(PARENT_HASH).unwrap(),
        timestamp: timestamp.to_string(),
    }
}

pub fn month(year: &str, month: &str, blocks: Option<(u64, u64)>) -> Month {
    Month {
        year: year.to_string(),
        month: month.to_string(),
        first_block: blocks.map(|(first, _)| block(first, "2020-01-01 00:00:00 +0000 UTC")),
        last_block: blocks.map(|(_, last)| block(last, "2020-01-31 23:59:44 +0000 UTC")),
    }
}

/// Block-meta fake returning canned months and counting calls.
#[derive(Default)]
pub struct CannedBlockMeta {
    pub months: Vec<Month>,
    pub calls:  Cell<usize>,
    pub ranges: RefCell<Vec<(String, String)>>,
    pub fail:   Option<Code>,
    pub gate:   RefCell<Option<oneshot::Receiver<()>>>,
}

impl CannedBlockMeta {
    pub fn with(months: Vec<Month>) -> Self {
        CannedBlockMeta { months, ..Default::default() }
    }

    async fn answer(&self) -> Result<Vec<Month>, RpcError> {
        self.calls.set(self.calls.get() + 1);
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match self.fail {
            Some(code) => Err(ConnectError { code, message: "scan failed".into() }.into()),
            None => Ok(self.months.clone()),
        }
    }
}

impl BlockMetaClient for CannedBlockMeta {
    async fn get_block_info(&self, start: String, end: String) -> Result<Months, RpcError> {
        self.ranges.borrow_mut().push((start, end));
        self.answer().await.map(|months| Months { months })
    }

    async fn get_month(&self, year: String, month: String) -> Result<Month, RpcError> {
        let months = self.answer().await?;
        months
            .into_iter()
            .find(|m| m.year == year && m.month == month)
            .ok_or_else(|| not_found("month missing"))
    }

    async fn get_year(&self, year: String) -> Result<Months, RpcError> {
        let months = self.answer().await?;
        Ok(Months { months: months.into_iter().filter(|m| m.year == year).collect() })
    }
}
