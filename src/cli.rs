//! 命令行参数
//!
//! 命令行参数优先级最高，覆盖配置文件和环境变量。

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::Config;

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "QUIZGEN_CONFIG";

#[derive(Parser, Debug)]
#[command(name = "quizgen")]
#[command(about = "Generate multiple-choice reading questions from a text document", long_about = None)]
pub struct Cli {
    /// Input text file
    #[arg(long)]
    pub input: PathBuf,

    /// Number of items to select
    #[arg(long)]
    pub n: Option<usize>,

    /// Output JSONL path (default: <output_dir>/quiz_<timestamp>.jsonl)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature in [0, 2]
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Candidates generated per chunk
    #[arg(long)]
    pub max_candidates_per_chunk: Option<usize>,

    /// Target chunk size in characters
    #[arg(long)]
    pub target_chars: Option<usize>,

    /// Candidates generated concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Skip candidates whose generation fails instead of aborting
    #[arg(long)]
    pub skip_failed: bool,

    /// Show question previews for every candidate
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML config file (falls back to $QUIZGEN_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// 配置文件路径：`--config` 优先，其次 `QUIZGEN_CONFIG`
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// 把命令行参数覆盖到配置上
    pub fn apply(&self, config: Config) -> Config {
        Config {
            target_item_count: self.n.unwrap_or(config.target_item_count),
            llm_model_name: self.model.clone().unwrap_or(config.llm_model_name),
            temperature: self.temperature.unwrap_or(config.temperature),
            max_candidates_per_chunk: self
                .max_candidates_per_chunk
                .unwrap_or(config.max_candidates_per_chunk),
            target_chars: self.target_chars.unwrap_or(config.target_chars),
            max_concurrent_requests: self.concurrency.unwrap_or(config.max_concurrent_requests),
            skip_failed_candidates: self.skip_failed || config.skip_failed_candidates,
            verbose_logging: self.verbose || config.verbose_logging,
            ..config
        }
    }

    /// 输出路径，未指定时按当前时间生成
    pub fn output_path(&self, config: &Config) -> PathBuf {
        match &self.out {
            Some(path) => path.clone(),
            None => default_output_path(Path::new(&config.output_dir)),
        }
    }
}

/// `<dir>/quiz_YYYYmmdd_HHMMSS.jsonl`
pub fn default_output_path(dir: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("quiz_{}.jsonl", stamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "quizgen",
            "--input",
            "doc.txt",
            "--n",
            "4",
            "--model",
            "other-model",
            "--temperature",
            "0.7",
            "--concurrency",
            "2",
            "--skip-failed",
        ]);

        let config = cli.apply(Config::default());

        assert_eq!(cli.input, PathBuf::from("doc.txt"));
        assert_eq!(config.target_item_count, 4);
        assert_eq!(config.llm_model_name, "other-model");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_concurrent_requests, 2);
        assert!(config.skip_failed_candidates);
        assert_eq!(config.target_chars, 3000);
    }

    #[test]
    fn test_missing_flags_keep_config() {
        let cli = Cli::parse_from(["quizgen", "--input", "doc.txt"]);
        let base = Config {
            target_item_count: 5,
            skip_failed_candidates: true,
            ..Config::default()
        };

        let config = cli.apply(base);

        assert_eq!(config.target_item_count, 5);
        assert!(config.skip_failed_candidates);
    }

    #[test]
    fn test_default_output_path() {
        let cli = Cli::parse_from(["quizgen", "--input", "doc.txt"]);

        let path = cli.output_path(&Config::default());

        assert!(path.starts_with("runs"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("quiz_") && name.ends_with(".jsonl"));
        assert_eq!(name.len(), "quiz_20240101_120000.jsonl".len());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["quizgen"]).is_err());
    }
}
