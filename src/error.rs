use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 加载流程错误（仅根清单失败会到达这里）
    #[error("加载错误: {0}")]
    Load(#[from] LoadError),
    /// 题卡交互错误
    #[error("题卡错误: {0}")]
    Card(#[from] CardError),
    /// 命令解析错误
    #[error("命令错误: {0}")]
    Command(#[from] CommandError),
}

/// 拉取错误
///
/// 对应三种失败：连不上、状态码不是 200、200 但内容不是合法 JSON
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络层失败（DNS、连接、超时、读文件失败）
    #[error("网络错误 ({url}): {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 非 200 响应
    #[error("请求失败 ({url}): 状态码 {status}")]
    Transport { url: String, status: u16 },
    /// 响应体解析失败
    #[error("解析失败 ({url}): {source}")]
    Parse {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FetchError {
    pub fn network(url: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        FetchError::Network {
            url: url.into(),
            source: Box::new(source),
        }
    }

    pub fn parse(url: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        FetchError::Parse {
            url: url.into(),
            source: Box::new(source),
        }
    }
}

/// 加载流程错误
#[derive(Debug, Error)]
pub enum LoadError {
    /// 根清单无法获取，什么都显示不了
    #[error("无法加载根清单 '{path}': {source}")]
    RootManifest {
        path: String,
        #[source]
        source: FetchError,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 本地设置错误
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("写入设置失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("序列化设置失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 题卡交互错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// 背题模式下不能作答
    #[error("背题模式下无需作答")]
    StudyMode,
    /// 本题已作答
    #[error("本题已经作答过了")]
    AlreadyAnswered,
    /// 选项编号越界
    #[error("选项 {index} 超出范围 [0, {max_index}]")]
    InvalidOption { index: usize, max_index: usize },
}

/// 终端命令解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("未知命令: '{0}'，输入 h 查看帮助")]
    Unknown(String),
    #[error("命令 '{command}' 缺少参数: {argument}")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },
    #[error("参数 '{value}' 无效，应为 {expected}")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
