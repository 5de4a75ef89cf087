use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件（可选） → 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 采样温度，范围 [0, 2]
    pub temperature: f32,
    /// 单次调用的最大尝试次数
    pub max_retries: u32,
    /// 单次调用的超时时间（秒）
    pub request_timeout_sec: f64,
    // --- 流水线配置 ---
    /// 最终输出的题目数量
    pub target_item_count: usize,
    /// 每个文本块生成的候选题数量
    pub max_candidates_per_chunk: usize,
    /// 文本块的目标字符数
    pub target_chars: usize,
    /// 文档ID，用于生成 `doc-id#chunk-N`
    pub doc_id: String,
    /// 同时进行的候选生成数量
    pub max_concurrent_requests: usize,
    /// 候选生成失败时是否跳过（默认直接终止）
    pub skip_failed_candidates: bool,
    /// 默认输出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.groq.com/openai/v1".to_string(),
            llm_model_name: "llama-3.1-8b-instant".to_string(),
            temperature: 0.2,
            max_retries: 3,
            request_timeout_sec: 60.0,
            target_item_count: 8,
            max_candidates_per_chunk: 3,
            target_chars: 3000,
            doc_id: "doc-001".to_string(),
            max_concurrent_requests: 1,
            skip_failed_candidates: false,
            output_dir: "runs".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 只使用默认值和环境变量构建配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件（可选）和环境变量加载配置
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let base = match config_path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides()?)
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        toml::from_str(&content).map_err(|e| {
            AppError::File(FileError::TomlParseFailed {
                path: path.display().to_string(),
                source: e,
            })
        })
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let api_key = std::env::var("LLM_API_KEY")
            .or_else(|_| std::env::var("GROQ_API_KEY"))
            .unwrap_or(self.llm_api_key);

        Ok(Self {
            llm_api_key: api_key,
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            temperature: env_or("LLM_TEMPERATURE", self.temperature)?,
            max_retries: env_or("LLM_MAX_RETRIES", self.max_retries)?,
            request_timeout_sec: env_or("LLM_TIMEOUT_SEC", self.request_timeout_sec)?,
            target_item_count: env_or("TARGET_ITEM_COUNT", self.target_item_count)?,
            max_candidates_per_chunk: env_or(
                "MAX_CANDIDATES_PER_CHUNK",
                self.max_candidates_per_chunk,
            )?,
            target_chars: env_or("TARGET_CHARS", self.target_chars)?,
            doc_id: std::env::var("DOC_ID").unwrap_or(self.doc_id),
            max_concurrent_requests: env_or(
                "MAX_CONCURRENT_REQUESTS",
                self.max_concurrent_requests,
            )?,
            skip_failed_candidates: env_or("SKIP_FAILED_CANDIDATES", self.skip_failed_candidates)?,
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(self.output_dir),
            verbose_logging: env_or("VERBOSE_LOGGING", self.verbose_logging)?,
        })
    }

    /// 校验配置是否可用于一次完整运行
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                value: self.temperature.to_string(),
                reason: "必须在 [0, 2] 范围内",
            });
        }
        if self.request_timeout_sec.is_nan() || self.request_timeout_sec <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_sec",
                value: self.request_timeout_sec.to_string(),
                reason: "必须大于 0",
            });
        }
        if self.target_item_count == 0 {
            return Err(invalid_zero("target_item_count"));
        }
        if self.max_candidates_per_chunk == 0 {
            return Err(invalid_zero("max_candidates_per_chunk"));
        }
        if self.target_chars == 0 {
            return Err(invalid_zero("target_chars"));
        }
        if self.max_retries == 0 {
            return Err(invalid_zero("max_retries"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(invalid_zero("max_concurrent_requests"));
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            llm_api_key: "test-key".to_string(),
            llm_api_base_url: "http://127.0.0.1:9/v1".to_string(),
            ..Self::default()
        }
    }
}

fn invalid_zero(field: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        value: "0".to_string(),
        reason: "必须为正整数",
    }
}

/// 读取并解析环境变量，不存在时使用默认值
fn env_or<T: FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: std::any::type_name::<T>().to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.llm_model_name, "llama-3.1-8b-instant");
        assert_eq!(config.target_item_count, 8);
        assert_eq!(config.max_candidates_per_chunk, 3);
        assert_eq!(config.target_chars, 3000);
        assert_eq!(config.doc_id, "doc-001");
        assert_eq!(config.max_concurrent_requests, 1);
        assert!(!config.skip_failed_candidates);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "target_item_count = 4\ntemperature = 0.7").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();

        assert_eq!(config.target_item_count, 4);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.target_chars, 3000);
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "target_item_count = \"many\"").unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();

        assert!(matches!(
            err,
            AppError::File(FileError::TomlParseFailed { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_key_and_bad_temperature() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EnvVarNotFound { .. })
        ));

        let config = Config {
            temperature: 2.5,
            ..Config::test_config()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "temperature",
                ..
            })
        ));

        let config = Config {
            target_item_count: 0,
            ..Config::test_config()
        };
        assert!(config.validate().is_err());

        assert!(Config::test_config().validate().is_ok());
    }
}
