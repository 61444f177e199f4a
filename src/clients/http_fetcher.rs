/// HTTP 拉取客户端
///
/// 封装所有与题库服务器相关的请求逻辑
use crate::clients::{decode_body, Content, FetchKind, Fetcher, Freshness};
use crate::config::Config;
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::LAST_MODIFIED;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// HTTP 拉取客户端
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    freshness: Freshness,
}

impl HttpFetcher {
    /// 按配置创建客户端
    pub fn new(config: &Config, freshness: Freshness) -> Result<Self, FetchError> {
        Self::with_base_url(
            &config.source,
            Duration::from_secs(config.request_timeout_secs),
            freshness,
        )
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        freshness: Freshness,
    ) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::network(base_url.clone(), e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            freshness,
        })
    }

    /// 相对路径拼到基础地址上，绝对地址原样返回
    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

/// 加上 `t=<毫秒时间戳>` 防止中间缓存
pub fn cache_busted(url: &str, millis: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", url, separator, millis)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, path: &str, kind: FetchKind) -> Result<Content, FetchError> {
        let url = cache_busted(&self.resolve(path), Utc::now().timestamp_millis());
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::network(path, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Transport {
                url: path.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(last_modified) = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
        {
            self.freshness.observe_header(last_modified);
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::network(path, e))?;

        decode_body(path, body, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_buster_respects_existing_query() {
        assert_eq!(cache_busted("http://h/data/main.json", 42), "http://h/data/main.json?t=42");
        assert_eq!(cache_busted("http://h/a.txt?v=1", 42), "http://h/a.txt?v=1&t=42");
    }

    #[test]
    fn resolve_joins_relative_paths() {
        let fetcher =
            HttpFetcher::with_base_url("http://quiz.local/", Duration::from_secs(1), Freshness::new())
                .unwrap();
        assert_eq!(fetcher.resolve("data/main.json"), "http://quiz.local/data/main.json");
        assert_eq!(fetcher.resolve("/data/gk.json"), "http://quiz.local/data/gk.json");
        assert_eq!(fetcher.resolve("https://cdn.local/x.txt"), "https://cdn.local/x.txt");
    }
}
