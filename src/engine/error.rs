// ==========================================
// 志愿者排表系统 - 引擎错误类型
// ==========================================
// 仅承载结构性错误（整次运行中止）
// 记录级问题、容量不足、锁定冲突均进入报告，不走 Err
// ==========================================

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入结构错误 =====
    #[error("人员ID重复: {0}")]
    DuplicatePersonId(String),

    #[error("直接指定的小组不存在 (人员 {person_id}): 小组 {group_id}")]
    UnknownDirectTarget { person_id: String, group_id: u32 },

    #[error("同一人员存在多条不同目标的直接指定 ({person_id}): 小组 {first} 与 小组 {second}")]
    ConflictingDirectAssignment {
        person_id: String,
        first: u32,
        second: u32,
    },

    // ===== 配置错误 =====
    #[error("引擎配置无效: {0}")]
    InvalidConfig(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;
