// ==========================================
// 志愿者排表系统 - 命令行入口
// ==========================================
// 用法: volunteer-scheduler [--verbose] <input.json> [config.json]
// 输入: GroupingInput JSON
// 输出: GroupingResult JSON（stdout），日志写 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use volunteer_scheduler::logging::{self, LogOptions};
use volunteer_scheduler::{EngineConfig, GroupingInput, GroupingOrchestrator};

fn main() -> Result<()> {
    let mut verbose = false;
    let mut paths: Vec<PathBuf> = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else {
            paths.push(PathBuf::from(arg));
        }
    }

    if verbose {
        logging::init_with(&LogOptions::verbose());
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", volunteer_scheduler::APP_NAME, volunteer_scheduler::VERSION);

    let Some(input_path) = paths.first() else {
        bail!("用法: volunteer-scheduler [--verbose] <input.json> [config.json]");
    };

    // 加载配置
    let config = match paths.get(1) {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => EngineConfig::default(),
    };

    // 加载输入
    let content = std::fs::read_to_string(input_path)
        .with_context(|| format!("读取输入失败: {}", input_path.display()))?;
    let input: GroupingInput =
        serde_json::from_str(&content).context("输入数据格式错误")?;

    // 执行分组
    let orchestrator = GroupingOrchestrator::new(config)?;
    let result = orchestrator.run(input)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
