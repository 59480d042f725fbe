use super::merge::merge_overlapping;
use super::statistics::BindingStatistics;
use crate::domain::relation::non_blank;
use crate::domain::{
    BindingConflict, BindingSet, BindingType, ConflictMember, DirectAssignment, FamilyLink,
    PairRecord, Person, PersonCategory, RosterRecord,
};
use crate::engine::validation::{IssueKind, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{info, instrument, warn};

// ==========================================
// BindingIdAllocator - 绑定ID分配
// ==========================================
// 全部类型共享一个计数器: PAIR_001, FAMILY_002, ...
#[derive(Debug, Default)]
pub(crate) struct BindingIdAllocator {
    next: usize,
}

impl BindingIdAllocator {
    pub(crate) fn next(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{}_{:03}", prefix, self.next)
    }
}

const UNBOUND_FAMILY_PREFIX: &str = "UNBOUND_FAMILY";

// ==========================================
// PersonDirectory - 人员索引
// ==========================================
struct PersonDirectory<'a> {
    by_id: HashMap<&'a str, &'a Person>,
    internal_by_name: HashMap<&'a str, &'a str>,
}

impl<'a> PersonDirectory<'a> {
    fn new(people: &'a [Person]) -> Self {
        let mut by_id = HashMap::with_capacity(people.len());
        let mut internal_by_name = HashMap::new();
        for person in people {
            by_id.insert(person.id.as_str(), person);
            if person.category == PersonCategory::Internal {
                // 同名内部人员取第一个
                internal_by_name
                    .entry(person.name.trim())
                    .or_insert(person.id.as_str());
            }
        }
        Self {
            by_id,
            internal_by_name,
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    fn name_of(&self, id: &str) -> String {
        self.by_id
            .get(id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }
}

// ==========================================
// BindingOutcome - 绑定构建结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingOutcome {
    pub binding_sets: Vec<BindingSet>,
    pub conflicts: Vec<BindingConflict>,
    pub issues: Vec<ValidationIssue>,
    pub statistics: BindingStatistics,
}

// ==========================================
// BindingBuilder - 绑定集合构建器
// ==========================================
pub struct BindingBuilder {
    max_family_per_internal: Option<usize>,
}

impl BindingBuilder {
    /// 构造函数
    ///
    /// # 参数
    /// - `max_family_per_internal`: 每名内部人员最多关联家属数（None 表示不限）
    pub fn new(max_family_per_internal: Option<usize>) -> Self {
        Self {
            max_family_per_internal,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 构建绑定集合
    ///
    /// 顺序: 结伴 -> 家属 -> 团体名单 -> 合并 -> 挂载直接指定
    ///
    /// # 参数
    /// - `people`: 已校验人员
    /// - `pairs`: 结伴记录
    /// - `family_links`: 家属关联记录
    /// - `rosters`: 团体名单
    /// - `direct_assignments`: 已校验的直接指定
    #[instrument(skip_all, fields(
        pairs = pairs.len(),
        family_links = family_links.len(),
        rosters = rosters.len(),
        direct = direct_assignments.len()
    ))]
    pub fn build(
        &self,
        people: &[Person],
        pairs: &[PairRecord],
        family_links: &[FamilyLink],
        rosters: &[RosterRecord],
        direct_assignments: &[DirectAssignment],
    ) -> BindingOutcome {
        let directory = PersonDirectory::new(people);
        let mut ids = BindingIdAllocator::default();
        let mut issues = Vec::new();
        let mut sets = Vec::new();

        self.bind_pairs(&directory, pairs, &mut ids, &mut sets, &mut issues);
        self.bind_families(&directory, family_links, &mut ids, &mut sets, &mut issues);
        self.bind_rosters(&directory, rosters, &mut ids, &mut sets, &mut issues);

        let raw_count = sets.len();
        let mut binding_sets = merge_overlapping(sets, &mut ids);
        let conflicts = attach_direct_targets(&mut binding_sets, direct_assignments, &directory);
        let statistics = BindingStatistics::collect(&binding_sets, &conflicts);

        info!(
            raw_sets = raw_count,
            merged_sets = binding_sets.len(),
            pinned = statistics.pinned_sets,
            conflicts = conflicts.len(),
            issues = issues.len(),
            "绑定集合构建完成"
        );

        BindingOutcome {
            binding_sets,
            conflicts,
            issues,
            statistics,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 结伴: 四个字段齐全、两人均存在且不是同一人
    fn bind_pairs(
        &self,
        directory: &PersonDirectory<'_>,
        pairs: &[PairRecord],
        ids: &mut BindingIdAllocator,
        sets: &mut Vec<BindingSet>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for (row, pair) in pairs.iter().enumerate() {
            let fields = (
                non_blank(&pair.first_id),
                non_blank(&pair.first_name),
                non_blank(&pair.second_id),
                non_blank(&pair.second_name),
            );
            let (first, second) = match fields {
                (Some(a), Some(_), Some(b), Some(_)) => (a, b),
                _ => {
                    issues.push(ValidationIssue::new(
                        IssueKind::MalformedRelation,
                        format!("结伴记录#{}", row + 1),
                        "结伴记录字段不完整，已跳过",
                    ));
                    continue;
                }
            };

            if first == second {
                issues.push(ValidationIssue::new(
                    IssueKind::MalformedRelation,
                    first,
                    "结伴双方为同一人，已跳过",
                ));
                continue;
            }

            let missing: Vec<&str> = [first, second]
                .into_iter()
                .filter(|id| !directory.contains(id))
                .collect();
            if !missing.is_empty() {
                issues.push(ValidationIssue::new(
                    IssueKind::UnknownPerson,
                    missing.join(","),
                    "结伴记录引用了不存在的人员，已跳过",
                ));
                continue;
            }

            sets.push(BindingSet::new(
                ids.next(BindingType::Pair.id_prefix()),
                BindingType::Pair,
                vec![first.to_string(), second.to_string()],
            ));
        }
    }

    /// 家属: 希望同组且内部人员可解析 -> 两人集合；否则单人集合
    fn bind_families(
        &self,
        directory: &PersonDirectory<'_>,
        family_links: &[FamilyLink],
        ids: &mut BindingIdAllocator,
        sets: &mut Vec<BindingSet>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let mut per_internal: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for (row, link) in family_links.iter().enumerate() {
            let family_id = match (non_blank(&link.id), non_blank(&link.name)) {
                (Some(id), Some(_)) => id,
                _ => {
                    issues.push(ValidationIssue::new(
                        IssueKind::MissingField,
                        format!("家属记录#{}", row + 1),
                        "家属记录缺少ID或姓名，已跳过",
                    ));
                    continue;
                }
            };

            if !directory.contains(family_id) {
                issues.push(ValidationIssue::new(
                    IssueKind::UnknownPerson,
                    family_id,
                    "家属记录引用了不存在的人员，已跳过",
                ));
                continue;
            }

            let internal_name = non_blank(&link.internal_name);
            if let Some(name) = internal_name {
                per_internal.entry(name).or_default().push(family_id);
            }

            let internal_id = if link.wants_same_group {
                let resolved = internal_name.and_then(|n| directory.internal_by_name.get(n).copied());
                if resolved.is_none() {
                    issues.push(ValidationIssue::new(
                        IssueKind::UnresolvedInternal,
                        family_id,
                        format!(
                            "无法解析关联内部人员 ({})，按未绑定处理",
                            internal_name.unwrap_or("-")
                        ),
                    ));
                }
                resolved.filter(|id| *id != family_id)
            } else {
                None
            };

            match internal_id {
                Some(internal_id) => sets.push(BindingSet::new(
                    ids.next(BindingType::Family.id_prefix()),
                    BindingType::Family,
                    vec![internal_id.to_string(), family_id.to_string()],
                )),
                None => {
                    let mut set = BindingSet::new(
                        ids.next(UNBOUND_FAMILY_PREFIX),
                        BindingType::Family,
                        vec![family_id.to_string()],
                    );
                    set.unbound = true;
                    sets.push(set);
                }
            }
        }

        if let Some(limit) = self.max_family_per_internal {
            for (internal_name, family_ids) in per_internal.iter().filter(|(_, f)| f.len() > limit) {
                issues.push(ValidationIssue::new(
                    IssueKind::FamilyLimitExceeded,
                    *internal_name,
                    format!(
                        "关联家属 {} 人，超过上限 {}: {}",
                        family_ids.len(),
                        limit,
                        family_ids.join(", ")
                    ),
                ));
            }
        }
    }

    /// 团体名单: 每份名单一个集合，缺失/未知成员跳过
    fn bind_rosters(
        &self,
        directory: &PersonDirectory<'_>,
        rosters: &[RosterRecord],
        ids: &mut BindingIdAllocator,
        sets: &mut Vec<BindingSet>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for roster in rosters {
            let mut members: Vec<String> = Vec::new();
            for (row, entry) in roster.members.iter().enumerate() {
                let id = match (non_blank(&entry.id), non_blank(&entry.name)) {
                    (Some(id), Some(_)) => id,
                    _ => {
                        issues.push(ValidationIssue::new(
                            IssueKind::MissingField,
                            format!("{}#{}", roster.name, row + 1),
                            "团体名单行缺少学号或姓名，已跳过",
                        ));
                        continue;
                    }
                };
                if !directory.contains(id) {
                    issues.push(ValidationIssue::new(
                        IssueKind::UnknownPerson,
                        id,
                        format!("团体名单 {} 引用了不存在的人员，已跳过", roster.name),
                    ));
                    continue;
                }
                if !members.iter().any(|m| m == id) {
                    members.push(id.to_string());
                }
            }

            if members.is_empty() {
                issues.push(ValidationIssue::new(
                    IssueKind::EmptyRoster,
                    roster.name.clone(),
                    "团体名单无有效成员，已跳过",
                ));
                continue;
            }

            sets.push(BindingSet::new(
                ids.next(BindingType::Roster.id_prefix()),
                BindingType::Roster,
                members,
            ));
        }
    }
}

impl Default for BindingBuilder {
    fn default() -> Self {
        Self::new(None)
    }
}

/// 挂载直接指定
///
/// - 成员的直接指定目标只有一个 -> 锁定到该小组
/// - 多个不同目标 -> 不锁定，记录冲突
fn attach_direct_targets(
    sets: &mut [BindingSet],
    direct_assignments: &[DirectAssignment],
    directory: &PersonDirectory<'_>,
) -> Vec<BindingConflict> {
    let targets: HashMap<&str, u32> = direct_assignments
        .iter()
        .map(|d| (d.person_id.as_str(), d.group_id))
        .collect();

    let mut conflicts = Vec::new();
    for set in sets.iter_mut() {
        let distinct: BTreeSet<u32> = set
            .members
            .iter()
            .filter_map(|m| targets.get(m.as_str()).copied())
            .collect();

        match distinct.len() {
            0 => {}
            1 => set.target_group = distinct.into_iter().next(),
            _ => {
                let conflicting_members: Vec<ConflictMember> = set
                    .members
                    .iter()
                    .filter_map(|m| {
                        targets.get(m.as_str()).map(|&group_id| ConflictMember {
                            person_id: m.clone(),
                            name: directory.name_of(m),
                            group_id,
                        })
                    })
                    .collect();
                warn!(
                    binding_id = %set.binding_id,
                    groups = ?distinct,
                    "绑定集合成员被指定到不同小组，按未锁定处理"
                );
                conflicts.push(BindingConflict {
                    binding_id: set.binding_id.clone(),
                    binding_type: set.binding_type,
                    assigned_groups: distinct.into_iter().collect(),
                    conflicting_members,
                });
            }
        }
    }
    conflicts
}
