//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `loader` - 题库加载器
//! - 根清单 → 分类清单 → 主题文件，三段式加载
//! - 单个分类或文件失败只跳过，不中断
//! - 每个文件加载完通知观察者，支持增量刷新
//!
//! ### `app` - 应用入口
//! - 选择拉取来源、加载题库、恢复本地设置
//! - 驱动命令循环
//!
//! ## 层次关系
//!
//! ```text
//! app (整个题库 + 会话)
//!     ↓
//! loader (Vec<分类> → Vec<文件>)
//!     ↓
//! services (能力层：parser / view / settings)
//!     ↓
//! clients (拉取：http / file)
//! ```

pub mod app;
pub mod loader;

// 重新导出主要类型
pub use app::{drive, App, NO_QUESTIONS};
pub use loader::{
    LoadObserver, LoadOrchestrator, LoadReport, LoadStatus, NoopObserver, QuestionStore,
};
