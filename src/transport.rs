use crate::{
    error::{Code, ConnectError, RpcError, WireError},
    pb::{
        kv::{
            GetByPrefixRequest, GetByPrefixResponse, GetManyRequest, GetManyResponse,
            GetRequest, GetResponse, ScanRequest, ScanResponse,
        },
        service::{GetBlockInfoRequest, GetMonthRequest, GetYearRequest, Month, Months},
    },
};

use anyhow::Context;
use prost::Message;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use std::{future::Future, time::Duration};
use tracing::{debug, warn};

pub const KV_SERVICE:        &str = "sf.substreams.sink.kv.v1.Kv";
pub const BLOCKMETA_SERVICE: &str = "eth.service.v1.BlockMeta";

/// Read access to the key-value sink.
pub trait KvClient {
    fn get(&self, key: String)
        -> impl Future<Output = Result<GetResponse, RpcError>>;

    fn get_many(&self, keys: Vec<String>)
        -> impl Future<Output = Result<GetManyResponse, RpcError>>;

    fn get_by_prefix(&self, prefix: String, limit: u64)
        -> impl Future<Output = Result<GetByPrefixResponse, RpcError>>;

    fn scan(&self, begin: String, exclusive_end: Option<String>, limit: u64)
        -> impl Future<Output = Result<ScanResponse, RpcError>>;
}

/// Month-aggregated block info served by the block-meta query service.
pub trait BlockMetaClient {
    fn get_block_info(&self, start: String, end: String)
        -> impl Future<Output = Result<Months, RpcError>>;

    fn get_month(&self, year: String, month: String)
        -> impl Future<Output = Result<Month, RpcError>>;

    fn get_year(&self, year: String)
        -> impl Future<Output = Result<Months, RpcError>>;
}

impl<T: KvClient + ?Sized> KvClient for &T {
    fn get(&self, key: String) -> impl Future<Output = Result<GetResponse, RpcError>> {
        (**self).get(key)
    }

    fn get_many(&self, keys: Vec<String>) -> impl Future<Output = Result<GetManyResponse, RpcError>> {
        (**self).get_many(keys)
    }

    fn get_by_prefix(&self, prefix: String, limit: u64) -> impl Future<Output = Result<GetByPrefixResponse, RpcError>> {
        (**self).get_by_prefix(prefix, limit)
    }

    fn scan(&self, begin: String, exclusive_end: Option<String>, limit: u64) -> impl Future<Output = Result<ScanResponse, RpcError>> {
        (**self).scan(begin, exclusive_end, limit)
    }
}

impl<T: BlockMetaClient + ?Sized> BlockMetaClient for &T {
    fn get_block_info(&self, start: String, end: String) -> impl Future<Output = Result<Months, RpcError>> {
        (**self).get_block_info(start, end)
    }

    fn get_month(&self, year: String, month: String) -> impl Future<Output = Result<Month, RpcError>> {
        (**self).get_month(year, month)
    }

    fn get_year(&self, year: String) -> impl Future<Output = Result<Months, RpcError>> {
        (**self).get_year(year)
    }
}

/// Connect-protocol unary client (binary protobuf over HTTP POST).
#[derive(Clone, Debug)]
pub struct ConnectClient {
    http:     Client,
    base_url: String,
}

impl ConnectClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        ConnectClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn unary<Req, Resp>(&self, service: &str, method: &str, req: &Req) -> Result<Resp, RpcError>
    where
        Req:  Message,
        Resp: Message + Default,
    {
        let url = format!("{}/{}/{}", self.base_url, service, method);
        debug!(%url, "connect unary call");

        let resp = self.http
            .post(&url)
            .header(CONTENT_TYPE, "application/proto")
            .header("Connect-Protocol-Version", "1")
            .body(req.encode_to_vec())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;

        if status.is_success() {
            return Ok(Resp::decode(body)?);
        }

        let err = connect_error(status, &body);
        warn!(%url, code = %err.code, message = %err.message, "connect call failed");
        Err(err.into())
    }
}

fn connect_error(status: StatusCode, body: &[u8]) -> ConnectError {
    if let Ok(wire) = serde_json::from_slice::<WireError>(body) {
        if let Ok(code) = wire.code.parse::<Code>() {
            return ConnectError { code, message: wire.message };
        }
    }
    let text = String::from_utf8_lossy(body);
    let message = if text.trim().is_empty() {
        status.to_string()
    } else {
        text.trim().to_string()
    };
    ConnectError {
        code: Code::from_http_status(status.as_u16()),
        message,
    }
}

impl KvClient for ConnectClient {
    async fn get(&self, key: String) -> Result<GetResponse, RpcError> {
        self.unary(KV_SERVICE, "Get", &GetRequest { key }).await
    }

    async fn get_many(&self, keys: Vec<String>) -> Result<GetManyResponse, RpcError> {
        self.unary(KV_SERVICE, "GetMany", &GetManyRequest { keys }).await
    }

    async fn get_by_prefix(&self, prefix: String, limit: u64) -> Result<GetByPrefixResponse, RpcError> {
        self.unary(KV_SERVICE, "GetByPrefix", &GetByPrefixRequest { prefix, limit }).await
    }

    async fn scan(&self, begin: String, exclusive_end: Option<String>, limit: u64) -> Result<ScanResponse, RpcError> {
        self.unary(KV_SERVICE, "Scan", &ScanRequest { begin, exclusive_end, limit }).await
    }
}

impl BlockMetaClient for ConnectClient {
    async fn get_block_info(&self, start: String, end: String) -> Result<Months, RpcError> {
        self.unary(BLOCKMETA_SERVICE, "GetBlockInfo", &GetBlockInfoRequest { start, end }).await
    }

    async fn get_month(&self, year: String, month: String) -> Result<Month, RpcError> {
        self.unary(BLOCKMETA_SERVICE, "GetMonth", &GetMonthRequest { year, month }).await
    }

    async fn get_year(&self, year: String) -> Result<Months, RpcError> {
        self.unary(BLOCKMETA_SERVICE, "GetYear", &GetYearRequest { year }).await
    }
}
