// ==========================================
// 分配阶段实现
// ==========================================
// 每个阶段单次扫描，不回溯
// 各阶段返回本阶段放入人数；缺口写入 state.shortfalls
// ==========================================

use super::state::AssignmentState;
use crate::config::SpecialistRoleConfig;
use crate::domain::{BindingSet, DirectAssignment, GroupCapacity, PersonCategory, Role};
use crate::engine::report::{Shortfall, SkipCause, SpecialistGap, UnplacedReason};
use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, warn};

impl AssignmentState {
    // ==========================================
    // 阶段1: 组长
    // ==========================================

    /// 无组长的小组按ID顺序选组长
    ///
    /// 优先锁定到本组的候选，其次无锁定的候选（输入顺序）；
    /// 锁定到其他小组的候选不参与本组
    pub(crate) fn assign_leaders(&mut self, leader_role_name: &str) -> usize {
        let mut candidates: Vec<String> = self
            .people
            .iter()
            .filter(|p| p.has_role(Role::Leader))
            .map(|p| p.id.clone())
            .collect();

        let group_ids: Vec<u32> = self.groups.iter().map(|g| g.group_id).collect();
        let mut placed = 0;

        for group_id in group_ids {
            let needs_leader = self
                .group(group_id)
                .map(|g| g.leader_id.is_none() && !g.is_full())
                .unwrap_or(false);
            if !needs_leader {
                if self.group(group_id).is_some_and(|g| g.leader_id.is_none()) {
                    self.shortfalls.push(Shortfall::LeaderMissing { group_id });
                }
                continue;
            }

            candidates.retain(|c| self.is_available(c));
            let pick = candidates
                .iter()
                .position(|c| self.pinned_group(c) == Some(group_id))
                .or_else(|| candidates.iter().position(|c| self.pinned_group(c).is_none()));

            let assigned = match pick {
                Some(idx) => {
                    let candidate = candidates.remove(idx);
                    let ok = self.place(&candidate, group_id);
                    if ok {
                        debug!(group_id, person_id = %candidate, role = leader_role_name, "组长已分配");
                        if let Some(group) = self.group_mut(group_id) {
                            group.leader_id = Some(candidate);
                        }
                        placed += 1;
                    }
                    ok
                }
                None => false,
            };

            if !assigned {
                warn!(group_id, role = leader_role_name, "{}候选不足", leader_role_name);
                self.shortfalls.push(Shortfall::LeaderMissing { group_id });
            }
        }

        placed
    }

    // ==========================================
    // 阶段2: 已锁定绑定集合
    // ==========================================

    /// 锁定集合成员依次放入目标小组，容量耗尽后的成员记为溢出
    pub(crate) fn assign_pinned_bindings(&mut self, binding_sets: &[BindingSet]) -> usize {
        let mut placed = 0;

        for set in binding_sets {
            let Some(group_id) = set.target_group else {
                continue;
            };

            let pending: Vec<&String> = set.members.iter().filter(|m| self.is_available(m)).collect();
            let mut overflow = Vec::new();
            for member in pending {
                if self.place(member, group_id) {
                    placed += 1;
                } else {
                    overflow.push(member.clone());
                }
            }

            if !overflow.is_empty() {
                warn!(
                    binding_id = %set.binding_id,
                    group_id,
                    overflow = overflow.len(),
                    "锁定集合超出目标小组容量"
                );
                for person_id in &overflow {
                    self.record_reason(person_id, UnplacedReason::PinnedOverflow);
                }
                self.shortfalls.push(Shortfall::PinnedOverflow {
                    binding_id: set.binding_id.clone(),
                    group_id,
                    person_ids: overflow,
                });
            }
        }

        placed
    }

    // ==========================================
    // 阶段3: 自由绑定集合
    // ==========================================

    /// 未锁定集合按规模降序整体放入剩余容量最大的小组
    ///
    /// 集合已有成员（如组长）均在同一小组时，以该小组为目标
    pub(crate) fn assign_free_bindings(&mut self, binding_sets: &[BindingSet]) -> usize {
        let mut free: Vec<&BindingSet> = binding_sets.iter().filter(|s| !s.is_pinned()).collect();
        free.sort_by(|a, b| b.size().cmp(&a.size()));

        let mut placed = 0;
        for set in free {
            let pending: Vec<String> = set
                .members
                .iter()
                .filter(|m| self.is_available(m))
                .cloned()
                .collect();
            if pending.is_empty() {
                continue;
            }

            let anchors: BTreeSet<u32> = set
                .members
                .iter()
                .filter_map(|m| self.placed_group(m))
                .collect();

            let target = match anchors.len() {
                0 => self
                    .largest_open_group(pending.len())
                    .ok_or(SkipCause::NoGroupLargeEnough),
                1 => anchors
                    .first()
                    .copied()
                    .filter(|&g| self.remaining(g) >= pending.len())
                    .ok_or(SkipCause::AnchorGroupFull),
                _ => Err(SkipCause::SplitAcrossGroups),
            };

            match target {
                Ok(group_id) => {
                    for member in &pending {
                        if self.place(member, group_id) {
                            placed += 1;
                        }
                    }
                    debug!(binding_id = %set.binding_id, group_id, size = pending.len(), "绑定集合已分配");
                }
                Err(cause) => {
                    warn!(binding_id = %set.binding_id, size = set.size(), ?cause, "绑定集合无法整体分配，已跳过");
                    for member in &pending {
                        self.record_reason(member, UnplacedReason::BindingSkipped);
                    }
                    self.shortfalls.push(Shortfall::BindingSkipped {
                        binding_id: set.binding_id.clone(),
                        size: set.size(),
                        cause,
                    });
                }
            }
        }

        placed
    }

    /// 剩余容量最大且能容纳 `needed` 人的小组（并列取ID最小）
    fn largest_open_group(&self, needed: usize) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for group in &self.groups {
            let remaining = group.remaining_capacity();
            if remaining < needed {
                continue;
            }
            if best.map_or(true, |(_, r)| remaining > r) {
                best = Some((group.group_id, remaining));
            }
        }
        best.map(|(id, _)| id)
    }

    // ==========================================
    // 阶段4: 直接指定个人
    // ==========================================

    pub(crate) fn assign_direct_individuals(&mut self, direct_assignments: &[DirectAssignment]) -> usize {
        let mut placed = 0;
        for direct in direct_assignments {
            if let Some(placed_in) = self.placed_group(&direct.person_id) {
                if placed_in != direct.group_id {
                    warn!(
                        person_id = %direct.person_id,
                        group_id = direct.group_id,
                        placed_in,
                        "直接指定未能生效，人员已在其他小组"
                    );
                    self.shortfalls.push(Shortfall::DirectTargetNotHonored {
                        person_id: direct.person_id.clone(),
                        group_id: direct.group_id,
                        placed_in,
                    });
                }
                continue;
            }
            if !self.is_available(&direct.person_id) {
                continue;
            }
            if self.place(&direct.person_id, direct.group_id) {
                placed += 1;
            } else {
                warn!(person_id = %direct.person_id, group_id = direct.group_id, "直接指定的小组已满");
                self.record_reason(&direct.person_id, UnplacedReason::DirectTargetFull);
                self.shortfalls.push(Shortfall::DirectTargetFull {
                    person_id: direct.person_id.clone(),
                    group_id: direct.group_id,
                });
            }
        }
        placed
    }

    // ==========================================
    // 阶段5: 专项角色
    // ==========================================

    /// 单个专项角色: 每个缺该角色且有容量的小组取得分最高的候选人
    pub(crate) fn assign_specialist_role(&mut self, spec: &SpecialistRoleConfig) -> usize {
        let role = spec.role;
        let mut pool: Vec<(String, f64)> = self
            .people
            .iter()
            .filter(|p| p.category == spec.eligible_category && self.is_available(&p.id))
            .filter_map(|p| p.specialist_score(role).map(|s| (p.id.clone(), s)))
            .collect();
        pool.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let mut queue: VecDeque<String> = pool.into_iter().map(|(id, _)| id).collect();

        debug!(role = %role, candidates = queue.len(), "专项角色候选池");

        let group_ids: Vec<u32> = self.groups.iter().map(|g| g.group_id).collect();
        let mut placed = 0;
        for group_id in group_ids {
            let Some(group) = self.group(group_id) else {
                continue;
            };
            if group.has_role(role) {
                continue;
            }
            if group.is_full() {
                self.shortfalls.push(Shortfall::SpecialistMissing {
                    role,
                    group_id,
                    cause: SpecialistGap::GroupFull,
                });
                continue;
            }

            let mut filled = false;
            while let Some(candidate) = queue.pop_front() {
                if !self.is_available(&candidate) {
                    continue;
                }
                if self.place(&candidate, group_id) {
                    self.grant_role(&candidate, role);
                    if let Some(group) = self.group_mut(group_id) {
                        group.roles_filled.insert(role, candidate);
                    }
                    placed += 1;
                    filled = true;
                    break;
                }
            }

            if !filled {
                self.shortfalls.push(Shortfall::SpecialistMissing {
                    role,
                    group_id,
                    cause: SpecialistGap::NoCandidate,
                });
            }
        }

        if queue.iter().any(|c| self.is_available(c)) {
            debug!(role = %role, remaining = queue.len(), "专项角色候选人有剩余");
        }
        placed
    }

    // ==========================================
    // 阶段6: 内部/家属轮转填充
    // ==========================================

    /// 每轮每个有空位的小组放入一人；小组按剩余容量降序、ID升序
    pub(crate) fn bulk_fill(&mut self, categories: &[PersonCategory]) -> usize {
        let mut pending: VecDeque<String> = self
            .people
            .iter()
            .filter(|p| categories.contains(&p.category) && self.is_available(&p.id))
            .map(|p| p.id.clone())
            .collect();

        let mut placed = 0;
        while !pending.is_empty() {
            let mut order: Vec<(u32, usize)> = self
                .groups
                .iter()
                .map(|g| (g.group_id, g.remaining_capacity()))
                .filter(|(_, r)| *r > 0)
                .collect();
            if order.is_empty() {
                break;
            }
            order.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

            for (group_id, _) in order {
                let Some(person_id) = pending.pop_front() else {
                    break;
                };
                if self.place(&person_id, group_id) {
                    placed += 1;
                }
            }
        }

        placed
    }

    // ==========================================
    // 阶段7: 最终填充
    // ==========================================

    /// 剩余人员按总分降序（缺失为 0）、ID升序依次填入各小组空位
    pub(crate) fn final_fill(&mut self) -> usize {
        let mut rest: Vec<(String, f64)> = self
            .people
            .iter()
            .filter(|p| self.is_available(&p.id))
            .map(|p| (p.id.clone(), p.normalized_score()))
            .collect();
        rest.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });

        let slots: Vec<u32> = self
            .groups
            .iter()
            .flat_map(|g| std::iter::repeat(g.group_id).take(g.remaining_capacity()))
            .collect();

        let mut placed = 0;
        let mut leftover = Vec::new();
        let mut slot_iter = slots.into_iter();
        for (person_id, _) in rest {
            match slot_iter.next() {
                Some(group_id) if self.place(&person_id, group_id) => placed += 1,
                _ => leftover.push(person_id),
            }
        }

        if !leftover.is_empty() {
            warn!(count = leftover.len(), "总容量不足，部分人员未分配");
            self.shortfalls.push(Shortfall::NoCapacity {
                person_ids: leftover,
            });
        }
        placed
    }
}
