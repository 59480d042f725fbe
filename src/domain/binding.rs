// ==========================================
// 志愿者排表系统 - 绑定集合领域模型
// ==========================================
// 红线: 合并后每人最多属于一个绑定集合
// 红线: 每人最多一条直接指定
// ==========================================

use crate::domain::types::BindingType;
use serde::{Deserialize, Serialize};

// ==========================================
// BindingSet - 绑定集合（必须同组）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSet {
    pub binding_id: String,
    pub binding_type: BindingType,
    pub members: Vec<String>,      // 有序、去重
    pub target_group: Option<u32>, // 直接指定带来的锁定目标
    #[serde(default)]
    pub unbound: bool, // 家属未能关联内部人员时的单人集合
}

impl BindingSet {
    pub fn new(binding_id: impl Into<String>, binding_type: BindingType, members: Vec<String>) -> Self {
        Self {
            binding_id: binding_id.into(),
            binding_type,
            members,
            target_group: None,
            unbound: false,
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, person_id: &str) -> bool {
        self.members.iter().any(|m| m == person_id)
    }

    pub fn is_pinned(&self) -> bool {
        self.target_group.is_some()
    }
}

// ==========================================
// BindingConflict - 锁定冲突
// ==========================================
// 同一集合成员被直接指定到不同小组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConflict {
    pub binding_id: String,
    pub binding_type: BindingType,
    pub assigned_groups: Vec<u32>, // 升序
    pub conflicting_members: Vec<ConflictMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictMember {
    pub person_id: String,
    pub name: String,
    pub group_id: u32,
}

// ==========================================
// DirectAssignment - 直接指定
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectAssignment {
    pub person_id: String,
    pub group_id: u32,
}

impl DirectAssignment {
    pub fn new(person_id: impl Into<String>, group_id: u32) -> Self {
        Self {
            person_id: person_id.into(),
            group_id,
        }
    }
}
