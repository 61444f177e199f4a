//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：按配置选择网络或本地来源，创建拉取器
//! 2. **加载题库**：委托 [`LoadOrchestrator`]，根清单失败即终止
//! 3. **会话循环**：逐行读取命令，交给 [`Session`] 执行
//!
//! 本层只做调度和统计，不做具体的解析和筛选

use crate::clients::{FileFetcher, Fetcher, Freshness, HttpFetcher};
use crate::config::Config;
use crate::error::{AppError, LoadError};
use crate::orchestrator::loader::{LoadObserver, LoadOrchestrator, LoadStatus, QuestionStore};
use crate::services::{RecordParser, SettingsStore};
use crate::utils::logging::{log_load_complete, log_startup, truncate_text};
use crate::workflow::{Command, Reply, Session};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

/// 加载成功但没有题目时的提示
pub const NO_QUESTIONS: &str = "没有找到任何题目！";

/// 应用主结构
pub struct App {
    config: Config,
    fetcher: Arc<dyn Fetcher>,
    freshness: Freshness,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let freshness = Freshness::new();
        let fetcher: Arc<dyn Fetcher> = if config.is_remote() {
            Arc::new(
                HttpFetcher::new(&config, freshness.clone()).context("无法创建 HTTP 客户端")?,
            )
        } else {
            Arc::new(FileFetcher::new(&config.source, freshness.clone()))
        };

        Ok(Self::with_fetcher(config, fetcher, freshness))
    }

    /// 使用现成的拉取器
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn Fetcher>, freshness: Freshness) -> Self {
        Self {
            config,
            fetcher,
            freshness,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let session = match self.load().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!("⚠️ {}", NO_QUESTIONS);
                println!("{}", NO_QUESTIONS);
                return Ok(());
            }
            Err(e) => {
                error!("❌ {}", e);
                return Err(AppError::from(e)).context("题库加载失败，请检查网络或路径");
            }
        };

        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        drive(session, stdin, &mut stdout).await?;
        Ok(())
    }

    /// 加载题库并恢复上次的视图状态
    ///
    /// 题库为空时返回 `Ok(None)`，与根清单失败区分开
    pub async fn load(&self) -> Result<Option<Session>, LoadError> {
        info!("\n📁 正在加载题库: {}", self.config.source);

        let orchestrator = LoadOrchestrator::new(
            self.fetcher.clone(),
            RecordParser::new(self.config.parser_mode),
            self.config.load_strategy,
        );
        let mut observer = ProgressObserver::default();
        let (store, report) = orchestrator
            .load_all(&self.config.manifest_path, &mut observer)
            .await?;

        let last_updated = self.freshness.display();
        log_load_complete(&report, last_updated.as_deref());

        if report.status() == LoadStatus::Empty {
            return Ok(None);
        }

        let settings = SettingsStore::new(&self.config.settings_file);
        let state = settings.load(self.config.page_size);
        Ok(Some(
            Session::new(store, state)
                .with_settings(settings)
                .with_last_updated(last_updated),
        ))
    }
}

/// 逐行执行命令直到 `q` 或输入结束，返回最终会话
pub async fn drive<R, W>(mut session: Session, input: R, out: &mut W) -> Result<Session>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", session.render())?;
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = line
            .parse::<Command>()
            .map_err(AppError::from)
            .and_then(|command| session.apply(command));

        match reply {
            Ok(Reply::Show(text)) => writeln!(out, "{}", text)?,
            Ok(Reply::Quit) => break,
            Err(e) => writeln!(out, "{}", e)?,
        }
    }

    Ok(session)
}

/// 把加载进度写进日志
#[derive(Default)]
struct ProgressObserver {
    topics: usize,
}

impl LoadObserver for ProgressObserver {
    fn on_status(&mut self, message: &str) {
        info!("{}", truncate_text(message, 80));
    }

    fn on_topic_loaded(&mut self, store: &QuestionStore) {
        self.topics += 1;
        debug!("已加载 {} 个主题，共 {} 题", self.topics, store.len());
    }
}
