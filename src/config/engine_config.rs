// ==========================================
// 志愿者排表系统 - 引擎配置
// ==========================================
// 职责: 显式配置对象，构造引擎时传入
// 来源: JSON 字符串 / JSON 文件 / 默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::{PersonCategory, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// 专项角色定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistRoleConfig {
    /// 角色
    pub role: Role,

    /// 显示名称（中文）
    pub name: String,

    /// 可担任该角色的人员类别
    #[serde(default = "default_eligible_category")]
    pub eligible_category: PersonCategory,
}

fn default_eligible_category() -> PersonCategory {
    PersonCategory::Normal
}

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 独立岗位阈值（需求人数 ≤ 理想组规模 × 阈值 时单独成组）
    pub independence_threshold: f64,

    /// 目标小组数（缺省时等于组长人数）
    pub target_group_count: Option<usize>,

    /// 组长角色名称
    pub leader_role_name: String,

    /// 专项角色（按顺序执行）
    pub specialist_roles: Vec<SpecialistRoleConfig>,

    /// 轮转填充阶段覆盖的人员类别
    pub bulk_fill_categories: Vec<PersonCategory>,

    /// 每名内部人员最多关联家属数（缺省不限）
    pub max_family_per_internal: Option<usize>,

    /// 正式志愿者名额（缺省不做候补划分）
    pub formal_volunteer_count: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            independence_threshold: 0.5,
            target_group_count: None,
            leader_role_name: "小组长".to_string(),
            specialist_roles: vec![
                SpecialistRoleConfig {
                    role: Role::SpecialistA,
                    name: "小闪电".to_string(),
                    eligible_category: PersonCategory::Normal,
                },
                SpecialistRoleConfig {
                    role: Role::SpecialistB,
                    name: "摄影".to_string(),
                    eligible_category: PersonCategory::Normal,
                },
            ],
            bulk_fill_categories: vec![PersonCategory::Internal, PersonCategory::Family],
            max_family_per_internal: None,
            formal_volunteer_count: None,
        }
    }
}

impl EngineConfig {
    // ==========================================
    // 加载
    // ==========================================

    /// 从 JSON 字符串加载（缺失字段取默认值）
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - `path`: 配置文件路径
    ///
    /// # 返回
    /// - `Ok(EngineConfig)`: 已通过校验的配置
    /// - `Err(ConfigError)`: 读取/解析/校验失败
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    // ==========================================
    // 校验
    // ==========================================

    pub fn validate(&self) -> ConfigResult<()> {
        let threshold = self.independence_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        if self.target_group_count == Some(0) {
            return Err(ConfigError::InvalidTargetGroupCount);
        }

        if self.leader_role_name.trim().is_empty() {
            return Err(ConfigError::EmptyLeaderRoleName);
        }

        let mut seen = BTreeSet::new();
        for spec in &self.specialist_roles {
            if !spec.role.is_specialist() {
                return Err(ConfigError::NotSpecialistRole(spec.role));
            }
            if !seen.insert(spec.role) {
                return Err(ConfigError::DuplicateSpecialistRole(spec.role));
            }
        }

        Ok(())
    }

    /// 专项角色显示名称
    pub fn specialist_name(&self, role: Role) -> Option<&str> {
        self.specialist_roles
            .iter()
            .find(|s| s.role == role)
            .map(|s| s.name.as_str())
    }
}
