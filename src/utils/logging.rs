/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::Chunk;
use crate::orchestrator::RunReport;

/// 初始化全局日志
///
/// `RUST_LOG` 控制过滤级别（默认 `info`），`LOG_FORMAT=json` 切换为 JSON 输出。
/// 重复调用不会报错。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let _ = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init(),
        _ => builder.try_init(),
    };
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 程序配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 阅读理解出题模式");
    info!("🤖 模型: {} (温度 {})", config.llm_model_name, config.temperature);
    info!("🎯 目标题目数: {}", config.target_item_count);
    info!("📊 最大并发数: {}", config.max_concurrent_requests);
    info!("{}", "=".repeat(60));
}

/// 记录文本块切分信息
///
/// # 参数
/// - `total`: 文本块总数
/// - `candidates_per_chunk`: 每块候选数
/// - `target_count`: 目标题目数
pub fn log_chunks_loaded(total: usize, candidates_per_chunk: usize, target_count: usize) {
    info!("✓ 文档切分为 {} 个文本块", total);
    info!(
        "📋 每块生成 {} 个候选，共 {} 个，最终选出 {} 道",
        candidates_per_chunk,
        total * candidates_per_chunk,
        target_count
    );
}

/// 记录文本块开始处理
///
/// # 参数
/// - `chunk`: 文本块
/// - `total`: 文本块总数
pub fn log_chunk_start(chunk: &Chunk, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📦 开始处理第 {}/{} 块 {}", chunk.index, total, chunk);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `report`: 运行结果
/// - `output`: 输出文件路径
pub fn print_final_stats(report: &RunReport, output: &Path) {
    let metrics = &report.metrics;
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 文本块: {}", report.chunk_count);
    info!("🧪 候选题: {} (跳过 {})", report.candidate_count, report.skipped_count);
    info!("✅ 选中: {}", report.items.len());
    info!("📍 答案位置分布: {:?}", report.position_counts);
    info!("{}", "─".repeat(60));
    info!("有效率: {:.2}", metrics.valid_rate);
    info!("平均难度: {:.2}", metrics.avg_difficulty);
    info!("选项相似度: {:.3}", metrics.option_similarity_mean);
    info!("位置熵: {:.3}", metrics.position_bias_entropy);
    info!("单题耗时: {:.1}s", metrics.time_per_item);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("阅读理解出题", 4), "阅读理解...");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
