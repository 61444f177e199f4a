/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::config::Config;
use crate::orchestrator::LoadReport;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info。
/// 重复调用是安全的
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 选择题题库");
    info!("📂 题库来源: {}", config.source);
    info!("📋 加载方式: {:?} | 行格式: {:?}", config.load_strategy, config.parser_mode);
    info!("📄 每页题数: {}", config.page_size);
    info!("{}", "=".repeat(60));
}

/// 打印加载统计
///
/// # 参数
/// - `report`: 加载统计
/// - `last_updated`: 最新文件的修改日期
pub fn log_load_complete(report: &LoadReport, last_updated: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 题库加载完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "✅ 分类: {}/{} (跳过 {})",
        report.categories_loaded, report.categories_total, report.categories_skipped
    );
    info!("✅ 文件: {} (跳过 {})", report.files_loaded, report.files_skipped);
    info!("✅ 题目: {} (无法解析 {})", report.records, report.parse_warnings);
    if let Some(date) = last_updated {
        info!("🕒 最后更新: {}", date);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
