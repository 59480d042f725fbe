// ==========================================
// 志愿者排表系统 - 小组领域模型
// ==========================================
// 红线: 成员数不超过岗位需求人数
// 红线: 组长一经设定即为本组成员
// ==========================================

use crate::domain::types::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// PositionRequirement - 岗位需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRequirement {
    pub category_name: String, // 岗位类别
    #[serde(default)]
    pub description: String, // 岗位描述
    pub headcount: i64,        // 需求人数 (> 0)
}

impl PositionRequirement {
    pub fn new(category_name: impl Into<String>, headcount: i64) -> Self {
        Self {
            category_name: category_name.into(),
            description: String::new(),
            headcount,
        }
    }
}

// ==========================================
// Group - 小组
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    // ===== 主键 =====
    pub group_id: u32,

    // ===== 岗位 =====
    pub position_name: String,
    pub position_description: String,
    pub required_size: usize,

    // ===== 成员 =====
    pub leader_id: Option<String>,
    pub members: Vec<String>,          // 按加入顺序
    pub roles_filled: BTreeMap<Role, String>, // 专项角色 -> 人员ID
}

impl Group {
    /// 构造函数
    ///
    /// # 参数
    /// - `group_id`: 小组ID
    /// - `position_name`: 岗位名称
    /// - `required_size`: 需求人数
    pub fn new(group_id: u32, position_name: impl Into<String>, required_size: usize) -> Self {
        Self {
            group_id,
            position_name: position_name.into(),
            position_description: String::new(),
            required_size,
            leader_id: None,
            members: Vec::new(),
            roles_filled: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.position_description = description.into();
        self
    }

    pub fn contains(&self, person_id: &str) -> bool {
        self.members.iter().any(|m| m == person_id)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles_filled.contains_key(&role)
    }

    /// 加入成员（容量不足时返回 false，不修改）
    pub fn add_member(&mut self, person_id: &str) -> bool {
        if !self.can_accept(1) {
            return false;
        }
        self.members.push(person_id.to_string());
        true
    }
}

// ==========================================
// Trait: GroupCapacity
// ==========================================
// 用途: 分配引擎容量检查接口
pub trait GroupCapacity {
    /// 检查是否可以再容纳 `count` 人
    fn can_accept(&self, count: usize) -> bool;

    /// 检查是否已满
    fn is_full(&self) -> bool;

    /// 剩余容量
    fn remaining_capacity(&self) -> usize;

    /// 填充率（0.0 - 1.0）
    fn fill_ratio(&self) -> f64;
}

impl GroupCapacity for Group {
    fn can_accept(&self, count: usize) -> bool {
        self.members.len() + count <= self.required_size
    }

    fn is_full(&self) -> bool {
        self.members.len() >= self.required_size
    }

    /// # 返回
    /// 剩余容量，相对于 required_size（不会为负）
    fn remaining_capacity(&self) -> usize {
        self.required_size.saturating_sub(self.members.len())
    }

    fn fill_ratio(&self) -> f64 {
        if self.required_size == 0 {
            return 1.0;
        }
        self.members.len() as f64 / self.required_size as f64
    }
}
