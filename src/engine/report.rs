// ==========================================
// 志愿者排表系统 - 分配报告
// ==========================================
// 职责: 记录各阶段结果、容量缺口与未分配人员
// 红线: 所有缺口必须带原因，不得静默丢弃
// ==========================================

use crate::domain::types::{Phase, Role};
use serde::{Deserialize, Serialize};

// ==========================================
// 阶段汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    #[serde(default)]
    pub role: Option<Role>, // 仅专项角色阶段
    pub placed: usize,
    pub shortfalls: usize,
}

// ==========================================
// 容量缺口 (Capacity Shortfall)
// ==========================================

/// 自由绑定集合被跳过的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipCause {
    NoGroupLargeEnough, // 没有小组能整体容纳
    AnchorGroupFull,    // 已有成员所在小组容量不足
    SplitAcrossGroups,  // 已有成员分散在不同小组
}

/// 专项角色缺失原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialistGap {
    NoCandidate, // 候选人耗尽
    GroupFull,   // 小组已满
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shortfall {
    LeaderMissing {
        group_id: u32,
    },
    PinnedOverflow {
        binding_id: String,
        group_id: u32,
        person_ids: Vec<String>,
    },
    BindingSkipped {
        binding_id: String,
        size: usize,
        cause: SkipCause,
    },
    DirectTargetFull {
        person_id: String,
        group_id: u32,
    },
    DirectTargetNotHonored {
        person_id: String,
        group_id: u32,
        placed_in: u32,
    },
    SpecialistMissing {
        role: Role,
        group_id: u32,
        cause: SpecialistGap,
    },
    NoCapacity {
        person_ids: Vec<String>,
    },
}

// ==========================================
// 未分配人员
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnplacedReason {
    Reserve,          // 候补且未被直接指定
    PinnedOverflow,   // 锁定集合超出目标小组容量
    BindingSkipped,   // 所在绑定集合被跳过
    DirectTargetFull, // 直接指定的小组已满
    NoCapacity,       // 总容量不足
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplacedPerson {
    pub person_id: String,
    pub name: String,
    pub reason: UnplacedReason,
}

// ==========================================
// AssignmentReport - 分配报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub phases: Vec<PhaseSummary>,
    pub shortfalls: Vec<Shortfall>,
    pub unplaced: Vec<UnplacedPerson>,
}

impl AssignmentReport {
    /// 已分配总人数
    pub fn total_placed(&self) -> usize {
        self.phases.iter().map(|p| p.placed).sum()
    }

    /// 缺少组长的小组
    pub fn groups_missing_leader(&self) -> Vec<u32> {
        self.shortfalls
            .iter()
            .filter_map(|s| match s {
                Shortfall::LeaderMissing { group_id } => Some(*group_id),
                _ => None,
            })
            .collect()
    }

    /// 缺少指定专项角色的小组
    pub fn groups_missing_specialist(&self, role: Role) -> Vec<u32> {
        self.shortfalls
            .iter()
            .filter_map(|s| match s {
                Shortfall::SpecialistMissing {
                    role: r, group_id, ..
                } if *r == role => Some(*group_id),
                _ => None,
            })
            .collect()
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseSummary> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}
