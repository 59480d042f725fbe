// ==========================================
// 志愿者排表系统 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::Role;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 读取错误 =====
    #[error("配置文件读取失败 ({path}): {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),

    // ===== 取值错误 =====
    #[error("独立阈值超出范围: {0}（应在 (0, 1] 之间）")]
    InvalidThreshold(f64),

    #[error("目标小组数必须大于 0")]
    InvalidTargetGroupCount,

    #[error("专项角色重复配置: {0}")]
    DuplicateSpecialistRole(Role),

    #[error("非专项角色不能作为专项配额: {0}")]
    NotSpecialistRole(Role),

    #[error("组长角色名称不能为空")]
    EmptyLeaderRoleName,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
