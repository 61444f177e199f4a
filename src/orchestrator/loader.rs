//! 题库加载器 - 编排层
//!
//! ## 三个阶段
//!
//! 1. **根清单**：`data/main.json`，`[{path, title}]`，每项一个分类。失败即终止
//! 2. **分类清单**：每个分类的 `[{path, title}]`，每项一个主题文件。失败跳过该分类
//! 3. **主题文件**：纯文本，交给 [`RecordParser`]。失败跳过该文件
//!
//! 无论顺序加载还是先并发拉取分类清单，题目文件都按清单顺序解析，
//! 所以题目 id 升序就是文件出现顺序。

use crate::clients::Fetcher;
use crate::config::LoadStrategy;
use crate::error::{FetchError, LoadError};
use crate::models::{CategoryTree, IdSequence, ManifestEntry, QuestionRecord};
use crate::services::{ParseWarning, RecordParser};
use futures::future::join_all;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 已加载的题目
///
/// 加载期间只追加，加载完成后只读
#[derive(Debug, Default)]
pub struct QuestionStore {
    records: Vec<QuestionRecord>,
    tree: CategoryTree,
    ids: IdSequence,
}

impl QuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    /// 按 id 查找；记录按 id 递增存放
    pub fn get(&self, id: u64) -> Option<&QuestionRecord> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|index| &self.records[index])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 解析一个主题文件并追加，返回新增数量和解析警告
    pub fn ingest(
        &mut self,
        parser: &RecordParser,
        text: &str,
        category: &str,
        topic: &str,
    ) -> (usize, Vec<ParseWarning>) {
        let outcome = parser.parse(text, category, topic, &mut self.ids);
        let added = outcome.records.len();
        for record in &outcome.records {
            self.tree.add(record);
        }
        self.records.extend(outcome.records);
        (added, outcome.warnings)
    }
}

/// 加载进度回调
///
/// 每个主题文件成功后都会调用 `on_topic_loaded`，可以据此增量刷新；
/// 回调拿到的是当前累积状态，重复渲染是安全的
pub trait LoadObserver {
    fn on_status(&mut self, _message: &str) {}

    fn on_topic_loaded(&mut self, _store: &QuestionStore) {}
}

/// 什么都不做的回调
pub struct NoopObserver;

impl LoadObserver for NoopObserver {}

/// 加载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// 加载流程没出错，但一道题都没有
    Empty,
}

/// 加载统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub categories_total: usize,
    pub categories_loaded: usize,
    pub categories_skipped: usize,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub records: usize,
    pub parse_warnings: usize,
}

impl LoadReport {
    pub fn status(&self) -> LoadStatus {
        if self.records == 0 {
            LoadStatus::Empty
        } else {
            LoadStatus::Loaded
        }
    }
}

/// 题库加载器
pub struct LoadOrchestrator {
    fetcher: Arc<dyn Fetcher>,
    parser: RecordParser,
    strategy: LoadStrategy,
}

impl LoadOrchestrator {
    pub fn new(fetcher: Arc<dyn Fetcher>, parser: RecordParser, strategy: LoadStrategy) -> Self {
        Self {
            fetcher,
            parser,
            strategy,
        }
    }

    /// 加载整个题库
    ///
    /// 只有根清单失败会返回错误，其余失败只记日志并跳过
    pub async fn load_all(
        &self,
        manifest_path: &str,
        observer: &mut dyn LoadObserver,
    ) -> Result<(QuestionStore, LoadReport), LoadError> {
        observer.on_status("正在连接题库...");
        let categories = self
            .fetch_manifest(manifest_path)
            .await
            .map_err(|source| LoadError::RootManifest {
                path: manifest_path.to_string(),
                source,
            })?;

        info!("📁 根清单包含 {} 个分类", categories.len());

        let mut store = QuestionStore::new();
        let mut report = LoadReport {
            categories_total: categories.len(),
            ..Default::default()
        };

        match self.strategy {
            LoadStrategy::Sequential => {
                for (index, category) in categories.iter().enumerate() {
                    let name = category.display_name();
                    observer.on_status(&format!(
                        "正在检查: {} ({}/{})",
                        name,
                        index + 1,
                        categories.len()
                    ));
                    let files = self.fetch_manifest(&category.path).await;
                    self.load_category(&name, &category.path, files, &mut store, &mut report, observer)
                        .await;
                }
            }
            LoadStrategy::FanOut => {
                observer.on_status(&format!("正在并发拉取 {} 个分类清单...", categories.len()));
                let manifests =
                    join_all(categories.iter().map(|c| self.fetch_manifest(&c.path))).await;
                for (category, files) in categories.iter().zip(manifests) {
                    let name = category.display_name();
                    self.load_category(&name, &category.path, files, &mut store, &mut report, observer)
                        .await;
                }
            }
        }

        observer.on_status("题库加载完成");
        Ok((store, report))
    }

    async fn load_category(
        &self,
        category: &str,
        manifest_path: &str,
        files: Result<Vec<ManifestEntry>, FetchError>,
        store: &mut QuestionStore,
        report: &mut LoadReport,
        observer: &mut dyn LoadObserver,
    ) {
        let files = match files {
            Ok(files) => files,
            Err(e) => {
                warn!("⚠️ 跳过分类 {} ({}): {}", category, manifest_path, e);
                report.categories_skipped += 1;
                return;
            }
        };
        report.categories_loaded += 1;

        for file in &files {
            let topic = file.display_name();
            observer.on_status(&format!("正在加载: {}", file_label(&file.path)));

            let text = match self.fetcher.fetch_text(&file.path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("⚠️ 跳过文件 {}: {}", file.path, e);
                    report.files_skipped += 1;
                    continue;
                }
            };

            let (added, warnings) = store.ingest(&self.parser, &text, category, &topic);
            if !warnings.is_empty() {
                debug!("{} 中有 {} 处无法解析", file.path, warnings.len());
            }
            report.files_loaded += 1;
            report.records += added;
            report.parse_warnings += warnings.len();

            observer.on_topic_loaded(store);
        }
    }

    /// 拉取一份清单，逐项校验；缺少 `path` 的条目单独跳过
    async fn fetch_manifest(&self, path: &str) -> Result<Vec<ManifestEntry>, FetchError> {
        let value = self.fetcher.fetch_value(path).await?;
        let items: Vec<JsonValue> =
            serde_json::from_value(value).map_err(|e| FetchError::parse(path, e))?;

        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<ManifestEntry>(item) {
                Ok(entry) if !entry.path.trim().is_empty() => Some(entry),
                Ok(_) => {
                    warn!("⚠️ 清单 {} 中有条目缺少路径", path);
                    None
                }
                Err(e) => {
                    warn!("⚠️ 清单 {} 中有无效条目: {}", path, e);
                    None
                }
            })
            .collect())
    }
}

/// 进度显示用的文件名
fn file_label(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
