//! # MCQ Bank
//!
//! 加载静态选择题题库并在终端里分页浏览、答题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 拉取层（Clients）
//! - `clients/` - 只暴露"按路径取回内容"的能力
//! - `HttpFetcher` - 带防缓存参数的 GET 请求
//! - `FileFetcher` - 本地目录，离线浏览
//! - `Freshness` - 记录最新的 Last-Modified
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每次只处理一个单元
//! - `RecordParser` - 两行一题的文本解析
//! - `view_service` - 筛选、排序 / 打乱、分页
//! - `SettingsStore` - 本地设置读写
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题""一条命令"的处理流程
//! - `QuestionCard` - 答题 / 背题交互
//! - `Session` - 命令 → 状态变化 → 渲染
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/loader` - 根清单 → 分类清单 → 主题文件
//! - `orchestrator/app` - 应用生命周期和命令循环
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{Fetcher, FileFetcher, Freshness, HttpFetcher};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{QuestionRecord, ViewState};
pub use orchestrator::{App, LoadOrchestrator, LoadReport, QuestionStore};
pub use services::{compute_view, RecordParser};
pub use workflow::{QuestionCard, Session};
