use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// 题库记录的行格式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserMode {
    /// 选项数量可变，末尾字段嗅探是答案还是解析
    #[default]
    Flexible,
    /// 旧格式：固定 4 个选项 + 答案 + 解析，共 6 个字段
    Legacy,
}

impl std::str::FromStr for ParserMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flexible" => Ok(ParserMode::Flexible),
            "legacy" => Ok(ParserMode::Legacy),
            other => Err(other.to_string()),
        }
    }
}

/// 分类清单的加载方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// 逐个分类顺序加载
    #[default]
    Sequential,
    /// 先并发拉取所有分类清单，再按顺序加载题目文件
    FanOut,
}

impl std::str::FromStr for LoadStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sequential" => Ok(LoadStrategy::Sequential),
            "fan_out" | "fanout" => Ok(LoadStrategy::FanOut),
            other => Err(other.to_string()),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库来源：`http(s)://` 开头走网络，否则视为本地目录
    pub source: String,
    /// 根清单相对路径
    pub manifest_path: String,
    /// 每页题目数量
    pub page_size: usize,
    /// 分类加载方式
    pub load_strategy: LoadStrategy,
    /// 行格式
    pub parser_mode: ParserMode,
    /// 本地设置文件
    pub settings_file: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "http://localhost:8080".to_string(),
            manifest_path: "data/main.json".to_string(),
            page_size: 20,
            load_strategy: LoadStrategy::Sequential,
            parser_mode: ParserMode::Flexible,
            settings_file: "mcq_app_state.json".to_string(),
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 先读 `MCQ_CONFIG` 指定的 TOML 文件（如有），再用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("MCQ_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `lookup` 抽象出来方便测试，不必真的改进程环境变量
    pub fn with_env_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            source: lookup("MCQ_SOURCE").unwrap_or(self.source),
            manifest_path: lookup("MCQ_MANIFEST").unwrap_or(self.manifest_path),
            page_size: parse_var(&lookup, "MCQ_PAGE_SIZE", "正整数")?.unwrap_or(self.page_size),
            load_strategy: parse_var(&lookup, "MCQ_LOAD_STRATEGY", "sequential|fan_out")?
                .unwrap_or(self.load_strategy),
            parser_mode: parse_var(&lookup, "MCQ_PARSER_MODE", "flexible|legacy")?
                .unwrap_or(self.parser_mode),
            settings_file: lookup("MCQ_SETTINGS_FILE").unwrap_or(self.settings_file),
            request_timeout_secs: parse_var(&lookup, "MCQ_TIMEOUT_SECS", "秒数")?
                .unwrap_or(self.request_timeout_secs),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
        }
        .normalized())
    }

    /// 题库来源是否为网络地址
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = 1;
        }
        self
    }
}

fn parse_var<F, T>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_defaults() {
        let config = Config::default()
            .with_env_overrides(env(&[
                ("MCQ_SOURCE", "./bank"),
                ("MCQ_PAGE_SIZE", "10"),
                ("MCQ_LOAD_STRATEGY", "fan-out"),
                ("MCQ_PARSER_MODE", "legacy"),
            ]))
            .unwrap();

        assert_eq!(config.source, "./bank");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.load_strategy, LoadStrategy::FanOut);
        assert_eq!(config.parser_mode, ParserMode::Legacy);
        assert_eq!(config.manifest_path, "data/main.json");
        assert!(!config.is_remote());
    }

    #[test]
    fn bad_env_value_is_reported() {
        let err = Config::default()
            .with_env_overrides(env(&[("MCQ_PAGE_SIZE", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "MCQ_PAGE_SIZE"));
    }

    #[test]
    fn zero_page_size_is_bumped() {
        let config = Config::default()
            .with_env_overrides(env(&[("MCQ_PAGE_SIZE", "0")]))
            .unwrap();
        assert_eq!(config.page_size, 1);
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = Config::from_toml_str(
            r#"
            source = "https://quiz.example.org"
            page_size = 5
            load_strategy = "fan_out"
            "#,
        )
        .unwrap();

        assert!(config.is_remote());
        assert_eq!(config.page_size, 5);
        assert_eq!(config.load_strategy, LoadStrategy::FanOut);
        assert_eq!(config.parser_mode, ParserMode::Flexible);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
