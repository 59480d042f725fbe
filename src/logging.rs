// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber，日志统一写 stderr
// stdout 只输出分组结果 JSON
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤: 本库 info，其余 warn
const DEFAULT_DIRECTIVE: &str = "warn,volunteer_scheduler=info";

/// 详细模式: 输出各阶段的单人分配明细
const VERBOSE_DIRECTIVE: &str = "warn,volunteer_scheduler=debug";

/// 日志选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub directive: String,
    pub with_location: bool, // 是否输出文件与行号
}

impl LogOptions {
    /// 由 RUST_LOG 取值构造；未设置或为空时使用默认过滤
    pub fn from_directive(env_value: Option<&str>) -> Self {
        let directive = env_value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_DIRECTIVE)
            .to_string();
        Self {
            directive,
            with_location: false,
        }
    }

    /// 读取 RUST_LOG 环境变量
    pub fn from_env() -> Self {
        Self::from_directive(std::env::var("RUST_LOG").ok().as_deref())
    }

    /// 详细模式（命令行 --verbose），忽略 RUST_LOG
    pub fn verbose() -> Self {
        Self {
            directive: VERBOSE_DIRECTIVE.to_string(),
            with_location: true,
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
    }
}

/// 按选项初始化日志系统
///
/// # 返回
/// - `true`: 本次完成初始化
/// - `false`: 全局 subscriber 已存在
///
/// # 示例
/// ```no_run
/// use volunteer_scheduler::logging::{self, LogOptions};
/// logging::init_with(&LogOptions::verbose());
/// ```
pub fn init_with(options: &LogOptions) -> bool {
    fmt()
        .with_env_filter(options.filter())
        .with_target(options.with_location)
        .with_file(options.with_location)
        .with_line_number(options.with_location)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// 初始化日志系统（RUST_LOG 优先）
pub fn init() {
    init_with(&LogOptions::from_env());
}

/// 初始化测试环境的日志系统
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(VERBOSE_DIRECTIVE))
        .with_test_writer()
        .try_init();
}
