use anyhow::{Context, Result};
use clap::Parser;

use quizgen::cli::Cli;
use quizgen::utils::logging;
use quizgen::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    // 初始化日志
    logging::init();

    let cli = Cli::parse();

    // 加载配置：默认值 → 配置文件 → 环境变量 → 命令行
    let config_path = cli.config_path();
    let config = Config::load(config_path.as_deref()).context("加载配置失败")?;
    let config = cli.apply(config);
    let output = cli.output_path(&config);

    // 初始化并运行应用
    let app = App::initialize(config)?;
    let report = app.run(&cli.input, &output).await?;

    println!("Wrote {} items to {}", report.items.len(), output.display());

    Ok(())
}
