// ==========================================
// 志愿者排表系统 - 结果校验
// ==========================================
// 职责: 分配完成后复核不变量
// 输出: 违规列表（为空表示通过）+ 人数汇总
// ==========================================

use crate::domain::{BindingSet, Group, GroupCapacity, Person};
use crate::engine::report::{AssignmentReport, Shortfall};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Violation {
    DoublePlacement { person_id: String },
    CapacityExceeded { group_id: u32, members: usize, required: usize },
    LeaderNotMember { group_id: u32, leader_id: String },
    MembershipMismatch { person_id: String },
    BindingSplit { binding_id: String, groups: Vec<u32> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub total_required: usize,
    pub total_placed: usize,
    pub underfilled_groups: Vec<u32>,
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

pub struct ResultVerifier {
    // 无状态
}

impl ResultVerifier {
    pub fn new() -> Self {
        Self {}
    }

    /// 复核分配结果
    ///
    /// 被跳过的绑定集合不参与整体同组检查
    pub fn verify(
        &self,
        groups: &[Group],
        people: &[Person],
        binding_sets: &[BindingSet],
        report: &AssignmentReport,
    ) -> VerificationReport {
        let mut result = VerificationReport {
            total_required: groups.iter().map(|g| g.required_size).sum(),
            ..Default::default()
        };

        // 1. 容量 / 组长 / 重复分配
        let mut seen: HashSet<&str> = HashSet::new();
        let mut member_group: HashMap<&str, u32> = HashMap::new();
        for group in groups {
            if group.members.len() > group.required_size {
                result.violations.push(Violation::CapacityExceeded {
                    group_id: group.group_id,
                    members: group.members.len(),
                    required: group.required_size,
                });
            }
            if !group.is_full() {
                result.underfilled_groups.push(group.group_id);
            }
            if let Some(leader) = &group.leader_id {
                if !group.contains(leader) {
                    result.violations.push(Violation::LeaderNotMember {
                        group_id: group.group_id,
                        leader_id: leader.clone(),
                    });
                }
            }
            for member in &group.members {
                if !seen.insert(member.as_str()) {
                    result.violations.push(Violation::DoublePlacement {
                        person_id: member.clone(),
                    });
                }
                member_group.insert(member.as_str(), group.group_id);
            }
        }
        result.total_placed = seen.len();

        // 2. 人员归属与小组成员一致
        for person in people {
            if person.group_id != member_group.get(person.id.as_str()).copied() {
                result.violations.push(Violation::MembershipMismatch {
                    person_id: person.id.clone(),
                });
            }
        }

        // 3. 绑定集合整体同组
        let skipped: HashSet<&str> = report
            .shortfalls
            .iter()
            .filter_map(|s| match s {
                Shortfall::BindingSkipped { binding_id, .. } => Some(binding_id.as_str()),
                Shortfall::PinnedOverflow { binding_id, .. } => Some(binding_id.as_str()),
                _ => None,
            })
            .collect();
        for set in binding_sets.iter().filter(|s| !skipped.contains(s.binding_id.as_str())) {
            let placed_groups: BTreeSet<u32> = set
                .members
                .iter()
                .filter_map(|m| member_group.get(m.as_str()).copied())
                .collect();
            if placed_groups.len() > 1 {
                result.violations.push(Violation::BindingSplit {
                    binding_id: set.binding_id.clone(),
                    groups: placed_groups.into_iter().collect(),
                });
            }
        }

        if result.is_valid() {
            info!(
                total_required = result.total_required,
                total_placed = result.total_placed,
                underfilled = result.underfilled_groups.len(),
                "结果校验通过"
            );
        } else {
            warn!(violations = result.violations.len(), "结果校验发现违规");
        }
        result
    }
}

impl Default for ResultVerifier {
    fn default() -> Self {
        Self::new()
    }
}
