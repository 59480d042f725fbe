// ==========================================
// 志愿者排表系统 - 配置层
// ==========================================
// 职责: 引擎参数（阈值、角色定义、填充范围）
// 约定: 无全局可变配置，配置对象随引擎构造传入
// ==========================================

pub mod engine_config;
pub mod error;

pub use engine_config::{EngineConfig, SpecialistRoleConfig};
pub use error::{ConfigError, ConfigResult};
