use super::*;
use crate::config::{EngineConfig, SpecialistRoleConfig};
use crate::domain::{BindingType, GroupCapacity, PersonCategory};
use crate::engine::report::{Shortfall, SkipCause, SpecialistGap, UnplacedReason};
use std::collections::HashSet;

// ==========================================
// 测试辅助函数
// ==========================================

fn create_test_groups(sizes: &[usize]) -> Vec<Group> {
    sizes
        .iter()
        .enumerate()
        .map(|(idx, &size)| Group::new(idx as u32 + 1, "测试岗位", size))
        .collect()
}

fn normal(id: &str) -> Person {
    Person::new(id, format!("志愿者{}", id), PersonCategory::Normal)
}

fn internal(id: &str) -> Person {
    Person::new(id, format!("内部{}", id), PersonCategory::Internal)
}

fn binding(id: &str, members: &[&str], target: Option<u32>) -> BindingSet {
    let mut set = BindingSet::new(
        id,
        BindingType::Roster,
        members.iter().map(|m| m.to_string()).collect(),
    );
    set.target_group = target;
    set
}

fn config_with_roles(roles: Vec<SpecialistRoleConfig>) -> EngineConfig {
    EngineConfig {
        specialist_roles: roles,
        ..EngineConfig::default()
    }
}

fn no_specialists() -> AssignmentEngine {
    AssignmentEngine::new(config_with_roles(Vec::new()))
}

fn group_of(outcome: &AssignmentOutcome, person_id: &str) -> Option<u32> {
    outcome
        .people
        .iter()
        .find(|p| p.id == person_id)
        .and_then(|p| p.group_id)
}

// ==========================================
// 阶段1: 组长
// ==========================================

#[test]
fn test_leaders_assigned_in_input_order() {
    let people = vec![
        normal("N1"),
        normal("L1").with_role(Role::Leader),
        normal("L2").with_role(Role::Leader),
    ];
    let outcome = no_specialists().assign(create_test_groups(&[3, 3, 3]), people, &[], &[]);

    assert_eq!(outcome.groups[0].leader_id.as_deref(), Some("L1"));
    assert_eq!(outcome.groups[1].leader_id.as_deref(), Some("L2"));
    assert_eq!(outcome.groups[2].leader_id, None);
    assert_eq!(outcome.report.groups_missing_leader(), vec![3]);
    assert!(outcome.groups[0].contains("L1"), "组长必须是本组成员");
}

#[test]
fn test_directed_leader_leads_target_group() {
    let people = vec![
        normal("L1").with_role(Role::Leader),
        normal("L2").with_role(Role::Leader),
    ];
    let direct = vec![DirectAssignment::new("L1", 2)];

    let outcome = no_specialists().assign(create_test_groups(&[3, 3]), people, &[], &direct);

    assert_eq!(group_of(&outcome, "L1"), Some(2));
    assert_eq!(outcome.groups[0].leader_id.as_deref(), Some("L2"));
    assert_eq!(outcome.groups[1].leader_id.as_deref(), Some("L1"));
    assert!(outcome.report.shortfalls.is_empty(), "{:?}", outcome.report.shortfalls);
}

#[test]
fn test_leader_in_pinned_set_stays_with_set() {
    let people = vec![
        normal("L1").with_role(Role::Leader),
        normal("L2").with_role(Role::Leader),
        normal("X"),
    ];
    let sets = vec![binding("PAIR_001", &["L1", "X"], Some(2))];

    let outcome = no_specialists().assign(create_test_groups(&[3, 3]), people, &sets, &[]);

    assert_eq!(group_of(&outcome, "L1"), Some(2));
    assert_eq!(group_of(&outcome, "X"), Some(2));
    assert_eq!(outcome.groups[1].leader_id.as_deref(), Some("L1"));
    assert_eq!(outcome.groups[0].leader_id.as_deref(), Some("L2"));
    assert!(outcome.report.shortfalls.is_empty(), "{:?}", outcome.report.shortfalls);
}

#[test]
fn test_leader_pinned_elsewhere_not_used_for_other_group() {
    let people = vec![normal("L1").with_role(Role::Leader), normal("N1")];
    let direct = vec![DirectAssignment::new("L1", 2)];

    let outcome = no_specialists().assign(create_test_groups(&[2, 2]), people, &[], &direct);

    assert_eq!(outcome.groups[0].leader_id, None);
    assert_eq!(outcome.groups[1].leader_id.as_deref(), Some("L1"));
    assert_eq!(outcome.report.groups_missing_leader(), vec![1]);
}

// ==========================================
// 阶段2/3: 绑定集合
// ==========================================

#[test]
fn test_pinned_set_with_direct_member_lands_in_target() {
    let people: Vec<Person> = ["X", "Y", "Z"].iter().map(|id| normal(id)).collect();
    let sets = vec![binding("ROSTER_001", &["X", "Y"], Some(5))];
    let direct = vec![DirectAssignment::new("X", 5)];

    let outcome = no_specialists().assign(create_test_groups(&[3, 3, 3, 3, 3]), people, &sets, &direct);

    assert_eq!(group_of(&outcome, "X"), Some(5));
    assert_eq!(group_of(&outcome, "Y"), Some(5));
    let direct_phase = outcome.report.phase(Phase::DirectIndividuals).unwrap();
    assert_eq!(direct_phase.placed, 0, "已随集合分配的直接指定人员不应重复分配");
    assert_eq!(direct_phase.shortfalls, 0);
}

#[test]
fn test_pinned_overflow_reported() {
    let people: Vec<Person> = ["A", "B", "C"].iter().map(|id| normal(id)).collect();
    let sets = vec![binding("ROSTER_001", &["A", "B", "C"], Some(1))];

    let outcome = no_specialists().assign(create_test_groups(&[2]), people, &sets, &[]);

    assert_eq!(outcome.groups[0].members, vec!["A", "B"]);
    assert!(outcome.report.shortfalls.contains(&Shortfall::PinnedOverflow {
        binding_id: "ROSTER_001".to_string(),
        group_id: 1,
        person_ids: vec!["C".to_string()],
    }));
    assert_eq!(outcome.report.unplaced.len(), 1);
    assert_eq!(outcome.report.unplaced[0].reason, UnplacedReason::PinnedOverflow);
}

#[test]
fn test_free_sets_largest_first_into_roomiest_group() {
    let people: Vec<Person> = ["A", "B", "C", "D", "E", "F", "G"]
        .iter()
        .map(|id| normal(id))
        .collect();
    let sets = vec![
        binding("ROSTER_001", &["A", "B"], None),
        binding("ROSTER_002", &["C", "D", "E", "F", "G"], None),
    ];

    let outcome = no_specialists().assign(create_test_groups(&[4, 6]), people, &sets, &[]);

    for id in ["C", "D", "E", "F", "G"] {
        assert_eq!(group_of(&outcome, id), Some(2), "{} 应在第2组", id);
    }
    assert_eq!(group_of(&outcome, "A"), Some(1));
    assert_eq!(group_of(&outcome, "B"), Some(1));
}

#[test]
fn test_free_set_tie_prefers_lowest_group_id() {
    let people: Vec<Person> = ["A", "B"].iter().map(|id| normal(id)).collect();
    let sets = vec![binding("PAIR_001", &["A", "B"], None)];

    let outcome = no_specialists().assign(create_test_groups(&[4, 4]), people, &sets, &[]);
    assert_eq!(outcome.groups[0].members, vec!["A", "B"]);
}

#[test]
fn test_oversized_free_set_skipped_whole() {
    let people: Vec<Person> = ["A", "B", "C", "D", "E"].iter().map(|id| normal(id)).collect();
    let sets = vec![binding("ROSTER_001", &["A", "B", "C", "D", "E"], None)];

    let outcome = no_specialists().assign(create_test_groups(&[4, 4]), people, &sets, &[]);

    assert!(outcome.report.shortfalls.contains(&Shortfall::BindingSkipped {
        binding_id: "ROSTER_001".to_string(),
        size: 5,
        cause: SkipCause::NoGroupLargeEnough,
    }));
    assert_eq!(
        outcome.report.phase(Phase::FreeBindings).unwrap().placed,
        0,
        "跳过的集合不应部分分配"
    );
    // 跳过后成员在最终填充阶段按个人处理
    assert!(outcome.report.unplaced.is_empty());
}

#[test]
fn test_free_set_anchored_to_leader_group() {
    let people = vec![
        normal("L").with_role(Role::Leader),
        normal("M"),
        normal("N"),
    ];
    let sets = vec![binding("PAIR_001", &["L", "M"], None)];

    let outcome = no_specialists().assign(create_test_groups(&[3, 5]), people, &sets, &[]);

    assert_eq!(group_of(&outcome, "L"), Some(1));
    assert_eq!(group_of(&outcome, "M"), Some(1), "集合应跟随已分配成员所在小组");
}

// ==========================================
// 阶段4: 直接指定个人
// ==========================================

#[test]
fn test_direct_target_full_reported() {
    let people = vec![normal("L").with_role(Role::Leader), normal("X")];
    let direct = vec![DirectAssignment::new("X", 1)];

    let outcome = no_specialists().assign(create_test_groups(&[1]), people, &[], &direct);

    assert!(outcome.report.shortfalls.contains(&Shortfall::DirectTargetFull {
        person_id: "X".to_string(),
        group_id: 1,
    }));
    assert_eq!(outcome.report.unplaced[0].reason, UnplacedReason::DirectTargetFull);
}

#[test]
fn test_direct_target_not_honored_reported() {
    // 锁定冲突的集合按自由集合整体放入第1组，A 的直接指定无法再生效
    let people: Vec<Person> = ["A", "B"].iter().map(|id| normal(id)).collect();
    let sets = vec![binding("PAIR_001", &["A", "B"], None)];
    let direct = vec![DirectAssignment::new("A", 2)];

    let outcome = no_specialists().assign(create_test_groups(&[5, 3]), people, &sets, &direct);

    assert_eq!(group_of(&outcome, "A"), Some(1));
    assert!(outcome.report.shortfalls.contains(&Shortfall::DirectTargetNotHonored {
        person_id: "A".to_string(),
        group_id: 2,
        placed_in: 1,
    }));
    assert_eq!(outcome.report.phase(Phase::DirectIndividuals).unwrap().shortfalls, 1);
}

// ==========================================
// 阶段5: 专项角色
// ==========================================

#[test]
fn test_specialist_shortage_reported_per_group() {
    let people = vec![
        normal("S1").with_specialist_score(Role::SpecialistA, 70.0),
        normal("S2").with_specialist_score(Role::SpecialistA, 95.0),
        normal("S3").with_specialist_score(Role::SpecialistA, 80.0),
        normal("S4").with_specialist_score(Role::SpecialistA, 0.0),
        internal("I1").with_specialist_score(Role::SpecialistA, 99.0),
    ];
    let engine = AssignmentEngine::new(config_with_roles(vec![SpecialistRoleConfig {
        role: Role::SpecialistA,
        name: "小闪电".to_string(),
        eligible_category: PersonCategory::Normal,
    }]));

    let outcome = engine.assign(create_test_groups(&[3, 3, 3, 3, 3]), people, &[], &[]);

    let with_role: Vec<u32> = outcome
        .groups
        .iter()
        .filter(|g| g.has_role(Role::SpecialistA))
        .map(|g| g.group_id)
        .collect();
    assert_eq!(with_role, vec![1, 2, 3]);
    assert_eq!(outcome.groups[0].roles_filled.get(&Role::SpecialistA).map(String::as_str), Some("S2"));
    assert_eq!(outcome.groups[1].roles_filled.get(&Role::SpecialistA).map(String::as_str), Some("S3"));
    assert_eq!(outcome.groups[2].roles_filled.get(&Role::SpecialistA).map(String::as_str), Some("S1"));
    assert_eq!(outcome.report.groups_missing_specialist(Role::SpecialistA), vec![4, 5]);

    let flagged: Vec<&str> = outcome
        .people
        .iter()
        .filter(|p| p.has_role(Role::SpecialistA))
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(flagged, vec!["S1", "S2", "S3"], "入选人员应带专项角色标记");
}

#[test]
fn test_full_group_reported_without_candidate_loss() {
    let people = vec![
        normal("L").with_role(Role::Leader),
        normal("S1").with_specialist_score(Role::SpecialistB, 60.0),
    ];
    let engine = AssignmentEngine::new(config_with_roles(vec![SpecialistRoleConfig {
        role: Role::SpecialistB,
        name: "摄影".to_string(),
        eligible_category: PersonCategory::Normal,
    }]));

    let outcome = engine.assign(create_test_groups(&[1, 2]), people, &[], &[]);

    assert!(outcome.report.shortfalls.contains(&Shortfall::SpecialistMissing {
        role: Role::SpecialistB,
        group_id: 1,
        cause: SpecialistGap::GroupFull,
    }));
    assert_eq!(outcome.groups[1].roles_filled.get(&Role::SpecialistB).map(String::as_str), Some("S1"));
}

// ==========================================
// 阶段6/7: 填充
// ==========================================

#[test]
fn test_bulk_fill_round_robin() {
    let people: Vec<Person> = ["I1", "I2", "I3", "I4"].iter().map(|id| internal(id)).collect();
    let outcome = no_specialists().assign(create_test_groups(&[2, 3]), people, &[], &[]);

    assert_eq!(outcome.groups[0].members, vec!["I2", "I4"]);
    assert_eq!(outcome.groups[1].members, vec!["I1", "I3"]);
    assert_eq!(outcome.report.phase(Phase::BulkFill).unwrap().placed, 4);
}

#[test]
fn test_bulk_fill_equal_capacity_uses_group_id_order() {
    let people: Vec<Person> = ["I1", "I2"].iter().map(|id| internal(id)).collect();
    let outcome = no_specialists().assign(create_test_groups(&[2, 2]), people, &[], &[]);

    assert_eq!(outcome.groups[0].members, vec!["I1"]);
    assert_eq!(outcome.groups[1].members, vec!["I2"]);
}

#[test]
fn test_final_fill_by_score_then_id() {
    let people = vec![
        normal("A").with_general_score(80.0),
        normal("B"),
        normal("C").with_general_score(90.0),
        normal("D").with_general_score(80.0),
    ];
    let outcome = no_specialists().assign(create_test_groups(&[1, 2]), people, &[], &[]);

    assert_eq!(outcome.groups[0].members, vec!["C"]);
    assert_eq!(outcome.groups[1].members, vec!["A", "D"]);
    assert!(outcome.report.shortfalls.contains(&Shortfall::NoCapacity {
        person_ids: vec!["B".to_string()],
    }));
    assert_eq!(outcome.report.unplaced[0].person_id, "B");
    assert_eq!(outcome.report.unplaced[0].reason, UnplacedReason::NoCapacity);
}

#[test]
fn test_reserve_excluded_unless_directed() {
    let people = vec![
        normal("R1").as_reserve(),
        normal("R2").as_reserve(),
        normal("N1"),
    ];
    let direct = vec![DirectAssignment::new("R2", 2)];
    let outcome = no_specialists().assign(create_test_groups(&[3, 3]), people, &[], &direct);

    assert_eq!(group_of(&outcome, "R1"), None);
    assert_eq!(group_of(&outcome, "R2"), Some(2));
    assert_eq!(group_of(&outcome, "N1"), Some(1));
    assert_eq!(outcome.report.unplaced.len(), 1);
    assert_eq!(outcome.report.unplaced[0].reason, UnplacedReason::Reserve);
}

// ==========================================
// 不变量
// ==========================================

fn create_mixed_population() -> (Vec<Person>, Vec<BindingSet>, Vec<DirectAssignment>) {
    let mut people = Vec::new();
    for i in 0..6 {
        people.push(normal(&format!("L{:02}", i)).with_role(Role::Leader));
    }
    for i in 0..30 {
        let score = (i * 37 % 100) as f64;
        people.push(
            normal(&format!("N{:02}", i))
                .with_general_score(score)
                .with_specialist_score(Role::SpecialistA, (i % 7) as f64)
                .with_specialist_score(Role::SpecialistB, (i % 5) as f64),
        );
    }
    for i in 0..8 {
        people.push(internal(&format!("I{:02}", i)));
    }
    let sets = vec![
        binding("ROSTER_001", &["N01", "N02", "N03", "N04"], None),
        binding("PAIR_002", &["N10", "N11"], Some(3)),
        binding("FAMILY_003", &["I00", "I01"], None),
        binding("ROSTER_004", &["N20", "N21", "N22", "N23", "N24", "N25", "N26", "N27", "N28"], None),
    ];
    let direct = vec![
        DirectAssignment::new("N10", 3),
        DirectAssignment::new("N15", 6),
    ];
    (people, sets, direct)
}

#[test]
fn test_no_double_placement_and_capacity_respected() {
    let (people, sets, direct) = create_mixed_population();
    let outcome = AssignmentEngine::default().assign(create_test_groups(&[7, 7, 7, 7, 7, 5]), people, &sets, &direct);

    let mut seen = HashSet::new();
    for group in &outcome.groups {
        assert!(group.members.len() <= group.required_size, "小组 {} 超出容量", group.group_id);
        for member in &group.members {
            assert!(seen.insert(member.clone()), "{} 被重复分配", member);
        }
        if let Some(leader) = &group.leader_id {
            assert!(group.contains(leader));
        }
    }

    for person in &outcome.people {
        match person.group_id {
            Some(group_id) => {
                let group = outcome.groups.iter().find(|g| g.group_id == group_id).unwrap();
                assert!(group.contains(&person.id));
            }
            None => assert!(!seen.contains(&person.id)),
        }
    }

    // 未跳过的集合整体同组
    let skipped: HashSet<String> = outcome
        .report
        .shortfalls
        .iter()
        .filter_map(|s| match s {
            Shortfall::BindingSkipped { binding_id, .. } => Some(binding_id.clone()),
            _ => None,
        })
        .collect();
    assert!(skipped.contains("ROSTER_004"), "9人集合无法整体放入");
    for set in sets.iter().filter(|s| !skipped.contains(&s.binding_id)) {
        let groups: HashSet<Option<u32>> = set.members.iter().map(|m| group_of(&outcome, m)).collect();
        assert_eq!(groups.len(), 1, "集合 {} 被拆分", set.binding_id);
    }

    assert_eq!(group_of(&outcome, "N15"), Some(6));
    assert!(outcome.groups.iter().all(|g| g.is_full()), "总人数足够时所有小组应填满");
}

#[test]
fn test_assignment_is_deterministic() {
    let (people, sets, direct) = create_mixed_population();
    let engine = AssignmentEngine::default();
    let first = engine.assign(create_test_groups(&[7, 7, 7, 7, 7, 5]), people.clone(), &sets, &direct);
    let second = engine.assign(create_test_groups(&[7, 7, 7, 7, 7, 5]), people, &sets, &direct);

    assert_eq!(first.groups, second.groups);
    assert_eq!(first.report, second.report);
}
