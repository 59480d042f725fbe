// ==========================================
// 志愿者排表系统 - 领域类型定义
// ==========================================
// 职责: 人员类别、角色、绑定类型、分配阶段
// 序列化格式: SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 人员类别 (Person Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonCategory {
    Normal,   // 普通志愿者
    Internal, // 内部人员
    Family,   // 内部人员家属
    Group,    // 团体报名
}

impl fmt::Display for PersonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonCategory::Normal => write!(f, "NORMAL"),
            PersonCategory::Internal => write!(f, "INTERNAL"),
            PersonCategory::Family => write!(f, "FAMILY"),
            PersonCategory::Group => write!(f, "GROUP"),
        }
    }
}

// ==========================================
// 角色 (Role)
// ==========================================
// 组长与专项角色为每组配额角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Leader,      // 组长
    SpecialistA, // 专项角色A (小闪电)
    SpecialistB, // 专项角色B (摄影)
    Paired,      // 情侣/结伴报名
}

impl Role {
    /// 是否为专项配额角色
    pub fn is_specialist(&self) -> bool {
        matches!(self, Role::SpecialistA | Role::SpecialistB)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Leader => write!(f, "LEADER"),
            Role::SpecialistA => write!(f, "SPECIALIST_A"),
            Role::SpecialistB => write!(f, "SPECIALIST_B"),
            Role::Paired => write!(f, "PAIRED"),
        }
    }
}

// ==========================================
// 绑定类型 (Binding Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BindingType {
    Pair,   // 结伴
    Family, // 家属
    Roster, // 团体名单
    Direct, // 直接指定
    Merged, // 合并后的混合绑定
}

impl BindingType {
    /// 组内成员排序优先级（数值越小越靠前）
    pub fn sort_priority(&self) -> u8 {
        match self {
            BindingType::Direct => 1,
            BindingType::Pair => 2,
            BindingType::Family => 3,
            BindingType::Roster => 4,
            BindingType::Merged => 5,
        }
    }

    /// 绑定ID前缀
    pub fn id_prefix(&self) -> &'static str {
        match self {
            BindingType::Pair => "PAIR",
            BindingType::Family => "FAMILY",
            BindingType::Roster => "ROSTER",
            BindingType::Direct => "DIRECT",
            BindingType::Merged => "MERGED",
        }
    }
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id_prefix())
    }
}

// ==========================================
// 分配阶段 (Assignment Phase)
// ==========================================
// 顺序即执行顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Leaders,           // 组长分配
    PinnedBindings,    // 已锁定目标组的绑定集合
    FreeBindings,      // 未锁定的绑定集合
    DirectIndividuals, // 直接指定的个人
    SpecialistRoles,   // 专项角色
    BulkFill,          // 内部/家属轮转填充
    FinalFill,         // 最终填充
}

impl Phase {
    /// 全部阶段（执行顺序）
    pub const ALL: [Phase; 7] = [
        Phase::Leaders,
        Phase::PinnedBindings,
        Phase::FreeBindings,
        Phase::DirectIndividuals,
        Phase::SpecialistRoles,
        Phase::BulkFill,
        Phase::FinalFill,
    ];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Leaders => write!(f, "LEADERS"),
            Phase::PinnedBindings => write!(f, "PINNED_BINDINGS"),
            Phase::FreeBindings => write!(f, "FREE_BINDINGS"),
            Phase::DirectIndividuals => write!(f, "DIRECT_INDIVIDUALS"),
            Phase::SpecialistRoles => write!(f, "SPECIALIST_ROLES"),
            Phase::BulkFill => write!(f, "BULK_FILL"),
            Phase::FinalFill => write!(f, "FINAL_FILL"),
        }
    }
}
