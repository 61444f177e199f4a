//! 本地目录拉取，用于离线浏览题库

use crate::clients::{decode_body, Content, FetchKind, Fetcher, Freshness};
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// 本地目录拉取
///
/// 文件不存在映射为 404，其它读取失败映射为网络错误，
/// 与 HTTP 来源保持同样的跳过语义
pub struct FileFetcher {
    root: PathBuf,
    freshness: Freshness,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>, freshness: Freshness) -> Self {
        Self {
            root: root.into(),
            freshness,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = path.split('?').next().unwrap_or(path);
        self.root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, path: &str, kind: FetchKind) -> Result<Content, FetchError> {
        let file_path = self.resolve(path);
        debug!("读取本地文件: {}", file_path.display());

        let body = fs::read_to_string(&file_path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::Transport {
                url: path.to_string(),
                status: 404,
            },
            ErrorKind::InvalidData => FetchError::parse(path, e),
            _ => FetchError::network(path, e),
        })?;

        if let Ok(modified) = fs::metadata(&file_path).await.and_then(|m| m.modified()) {
            self.freshness.observe(DateTime::<Utc>::from(modified));
        }

        decode_body(path, body, kind)
    }
}
