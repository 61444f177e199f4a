use anyhow::Result;
use mcq_bank::utils::logging;
use mcq_bank::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
