// ==========================================
// 志愿者排表系统 - 人员领域模型
// ==========================================
// 红线: 人员ID全局唯一（跨类别）
// 红线: 每人最多属于一个小组
// ==========================================

use crate::domain::types::{PersonCategory, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// Person - 人员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    // ===== 主键 =====
    pub id: String,   // 学号等稳定唯一标识
    pub name: String, // 姓名

    // ===== 分类 =====
    pub category: PersonCategory,
    #[serde(default)]
    pub roles: BTreeSet<Role>, // 角色标记

    // ===== 评分 =====
    #[serde(default)]
    pub general_score: Option<f64>, // 面试总分
    #[serde(default)]
    pub specialist_scores: BTreeMap<Role, f64>, // 专项角色得分

    // ===== 关系 =====
    #[serde(default)]
    pub partner_id: Option<String>, // 结伴对象

    // ===== 状态 =====
    #[serde(default)]
    pub reserve: bool, // 候补
    #[serde(default)]
    pub group_id: Option<u32>, // 所属小组（引擎写入）
}

impl Person {
    /// 构造函数
    ///
    /// # 参数
    /// - `id`: 人员ID
    /// - `name`: 姓名
    /// - `category`: 人员类别
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: PersonCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            roles: BTreeSet::new(),
            general_score: None,
            specialist_scores: BTreeMap::new(),
            partner_id: None,
            reserve: false,
            group_id: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn with_general_score(mut self, score: f64) -> Self {
        self.general_score = Some(score);
        self
    }

    pub fn with_specialist_score(mut self, role: Role, score: f64) -> Self {
        self.specialist_scores.insert(role, score);
        self
    }

    pub fn with_partner(mut self, partner_id: impl Into<String>) -> Self {
        self.partner_id = Some(partner_id.into());
        self.roles.insert(Role::Paired);
        self
    }

    pub fn as_reserve(mut self) -> Self {
        self.reserve = true;
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_placed(&self) -> bool {
        self.group_id.is_some()
    }

    /// 专项角色得分（仅返回有限正数）
    pub fn specialist_score(&self, role: Role) -> Option<f64> {
        self.specialist_scores
            .get(&role)
            .copied()
            .filter(|s| s.is_finite() && *s > 0.0)
    }

    /// 归一化总分（缺失视为 0）
    pub fn normalized_score(&self) -> f64 {
        self.general_score.filter(|s| s.is_finite()).unwrap_or(0.0)
    }
}
