// ==========================================
// 分配状态（小组/人员 arena + 缺口记录）
// ==========================================
// 小组按ID升序存放；人员保持输入顺序
// 人员 group_id 即"已分配"标记
// 锁定目标: 直接指定优先，其次所在锁定集合的目标小组
// ==========================================

use crate::domain::{BindingSet, DirectAssignment, Group, GroupCapacity, Person, Role};
use crate::engine::report::{Shortfall, UnplacedPerson, UnplacedReason};
use std::collections::{HashMap, HashSet};
use tracing::trace;

pub(crate) struct AssignmentState {
    pub(crate) groups: Vec<Group>,
    group_index: HashMap<u32, usize>,
    pub(crate) people: Vec<Person>,
    person_index: HashMap<String, usize>,
    excluded: HashSet<String>,
    pins: HashMap<String, u32>,
    pub(crate) shortfalls: Vec<Shortfall>,
    pub(crate) pending_reasons: HashMap<String, UnplacedReason>,
}

impl AssignmentState {
    /// 构造分配状态
    ///
    /// 候补人员除非被直接指定，否则不参与任何阶段
    pub(crate) fn new(
        mut groups: Vec<Group>,
        mut people: Vec<Person>,
        binding_sets: &[BindingSet],
        direct_assignments: &[DirectAssignment],
    ) -> Self {
        groups.sort_by_key(|g| g.group_id);
        for group in &mut groups {
            group.leader_id = None;
            group.members.clear();
            group.roles_filled.clear();
        }
        let group_index = groups
            .iter()
            .enumerate()
            .map(|(idx, g)| (g.group_id, idx))
            .collect();

        let directed: HashSet<&str> = direct_assignments
            .iter()
            .map(|d| d.person_id.as_str())
            .collect();
        let mut excluded = HashSet::new();
        let mut person_index = HashMap::with_capacity(people.len());
        for (idx, person) in people.iter_mut().enumerate() {
            person.group_id = None;
            if person.reserve && !directed.contains(person.id.as_str()) {
                excluded.insert(person.id.clone());
            }
            person_index.insert(person.id.clone(), idx);
        }

        let mut pins: HashMap<String, u32> = direct_assignments
            .iter()
            .map(|d| (d.person_id.clone(), d.group_id))
            .collect();
        for set in binding_sets {
            let Some(target) = set.target_group else {
                continue;
            };
            for member in &set.members {
                pins.entry(member.clone()).or_insert(target);
            }
        }

        Self {
            groups,
            group_index,
            people,
            person_index,
            excluded,
            pins,
            shortfalls: Vec::new(),
            pending_reasons: HashMap::new(),
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    pub(crate) fn person(&self, person_id: &str) -> Option<&Person> {
        self.person_index.get(person_id).map(|&idx| &self.people[idx])
    }

    pub(crate) fn group(&self, group_id: u32) -> Option<&Group> {
        self.group_index.get(&group_id).map(|&idx| &self.groups[idx])
    }

    pub(crate) fn remaining(&self, group_id: u32) -> usize {
        self.group(group_id)
            .map(|g| g.remaining_capacity())
            .unwrap_or(0)
    }

    pub(crate) fn placed_group(&self, person_id: &str) -> Option<u32> {
        self.person(person_id).and_then(|p| p.group_id)
    }

    /// 锁定目标小组（直接指定或锁定集合）
    pub(crate) fn pinned_group(&self, person_id: &str) -> Option<u32> {
        self.pins.get(person_id).copied()
    }

    /// 可参与分配: 已知、未分配、非排除候补
    pub(crate) fn is_available(&self, person_id: &str) -> bool {
        match self.person(person_id) {
            Some(p) => p.group_id.is_none() && !self.excluded.contains(person_id),
            None => false,
        }
    }

    // ==========================================
    // 变更
    // ==========================================

    /// 将人员放入小组
    ///
    /// # 返回
    /// - `true`: 放入成功
    /// - `false`: 人员不可用、小组不存在或容量不足（不修改状态）
    pub(crate) fn place(&mut self, person_id: &str, group_id: u32) -> bool {
        if !self.is_available(person_id) {
            return false;
        }
        let (Some(&gi), Some(&pi)) = (self.group_index.get(&group_id), self.person_index.get(person_id)) else {
            return false;
        };
        if !self.groups[gi].add_member(person_id) {
            return false;
        }
        self.people[pi].group_id = Some(group_id);
        self.pending_reasons.remove(person_id);
        trace!(person_id, group_id, "人员已分配");
        true
    }

    /// 为已分配人员补记角色标记
    pub(crate) fn grant_role(&mut self, person_id: &str, role: Role) {
        if let Some(&idx) = self.person_index.get(person_id) {
            self.people[idx].roles.insert(role);
        }
    }

    pub(crate) fn group_mut(&mut self, group_id: u32) -> Option<&mut Group> {
        let idx = *self.group_index.get(&group_id)?;
        self.groups.get_mut(idx)
    }

    pub(crate) fn record_reason(&mut self, person_id: &str, reason: UnplacedReason) {
        self.pending_reasons.insert(person_id.to_string(), reason);
    }

    /// 汇总未分配人员（输入顺序）
    pub(crate) fn collect_unplaced(&self) -> Vec<UnplacedPerson> {
        self.people
            .iter()
            .filter(|p| p.group_id.is_none())
            .map(|p| {
                let reason = if self.excluded.contains(&p.id) {
                    UnplacedReason::Reserve
                } else {
                    self.pending_reasons
                        .get(&p.id)
                        .copied()
                        .unwrap_or(UnplacedReason::NoCapacity)
                };
                UnplacedPerson {
                    person_id: p.id.clone(),
                    name: p.name.clone(),
                    reason,
                }
            })
            .collect()
    }
}
