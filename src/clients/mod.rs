//! 拉取层
//!
//! 只负责"按路径取回内容"，不认识题目和清单的业务含义。
//! 网络和本地目录两种来源实现同一个 [`Fetcher`] 接口

pub mod file_fetcher;
pub mod freshness;
pub mod http_fetcher;

pub use file_fetcher::FileFetcher;
pub use freshness::Freshness;
pub use http_fetcher::HttpFetcher;

use crate::error::FetchError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// 期望的响应形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Json,
    Text,
}

/// 拉取结果
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Json(JsonValue),
    Text(String),
}

/// 拉取能力
///
/// 单次请求，不重试；失败交给调用方决定跳过还是终止
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, path: &str, kind: FetchKind) -> Result<Content, FetchError>;

    /// 取原始文本
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        match self.fetch(path, FetchKind::Text).await? {
            Content::Text(text) => Ok(text),
            Content::Json(value) => Ok(value.to_string()),
        }
    }

    /// 取 JSON 值
    async fn fetch_value(&self, path: &str) -> Result<JsonValue, FetchError> {
        match self.fetch(path, FetchKind::Json).await? {
            Content::Json(value) => Ok(value),
            Content::Text(text) => {
                serde_json::from_str(&text).map_err(|e| FetchError::parse(path, e))
            }
        }
    }
}

/// 取 JSON 并反序列化为指定类型，形状不对时返回 `FetchError::Parse`
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn Fetcher,
    path: &str,
) -> Result<T, FetchError> {
    let value = fetcher.fetch_value(path).await?;
    serde_json::from_value(value).map_err(|e| FetchError::parse(path, e))
}

/// 把响应体按期望形式解码
pub(crate) fn decode_body(path: &str, body: String, kind: FetchKind) -> Result<Content, FetchError> {
    match kind {
        FetchKind::Text => Ok(Content::Text(body)),
        FetchKind::Json => serde_json::from_str(&body)
            .map(Content::Json)
            .map_err(|e| FetchError::parse(path, e)),
    }
}
