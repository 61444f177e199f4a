//! 本地设置服务 - 业务能力层
//!
//! 只负责把视图状态读写到一个 JSON 文件

use crate::error::SettingsError;
use crate::models::ViewState;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 本地设置存储
///
/// 文件不存在或内容损坏时回退到默认值，不影响启动
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 读取设置；`page_size` 不持久化，由调用方传入
    pub fn load(&self, page_size: usize) -> ViewState {
        let defaults = ViewState::default().with_page_size(page_size);

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("未读取到设置文件 {}: {}", self.path.display(), e);
                return defaults;
            }
        };

        match serde_json::from_str::<ViewState>(&content) {
            Ok(state) => state.with_page_size(page_size),
            Err(e) => {
                warn!("⚠️ 设置文件已损坏，使用默认设置: {}", e);
                defaults
            }
        }
    }

    /// 保存设置
    pub fn save(&self, state: &ViewState) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json).map_err(|source| SettingsError::WriteFailed {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!("设置已保存: {}", self.path.display());
        Ok(())
    }
}
