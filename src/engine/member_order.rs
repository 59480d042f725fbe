// ==========================================
// 志愿者排表系统 - 组内成员排序
// ==========================================
// 供下游名单输出使用，不影响分配结果
// 顺序: 组长 -> 绑定块 -> 零散成员
// 绑定块: 类型优先级 -> 规模降序 -> 绑定ID；块内按人员ID
// 直接指定且不在任何集合中的个人视为 DIRECT 单人块
// ==========================================

use crate::domain::{BindingSet, BindingType, DirectAssignment, Group};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};

struct Block<'a> {
    priority: u8,
    size: usize,
    key: &'a str,
    members: Vec<&'a str>,
}

/// 组内成员排序
pub fn order_members(
    group: &Group,
    binding_sets: &[BindingSet],
    direct_assignments: &[DirectAssignment],
) -> Vec<String> {
    let set_of: HashMap<&str, &BindingSet> = binding_sets
        .iter()
        .filter(|s| !s.unbound)
        .flat_map(|s| s.members.iter().map(move |m| (m.as_str(), s)))
        .collect();
    let directed: HashSet<&str> = direct_assignments
        .iter()
        .map(|d| d.person_id.as_str())
        .collect();

    let leader = group.leader_id.as_deref();
    let mut blocks: BTreeMap<&str, Block<'_>> = BTreeMap::new();
    let mut loose: Vec<&str> = Vec::new();

    for member in group.members.iter().map(String::as_str) {
        if Some(member) == leader {
            continue;
        }
        if let Some(set) = set_of.get(member) {
            blocks
                .entry(set.binding_id.as_str())
                .or_insert_with(|| Block {
                    priority: set.binding_type.sort_priority(),
                    size: set.size(),
                    key: set.binding_id.as_str(),
                    members: Vec::new(),
                })
                .members
                .push(member);
        } else if directed.contains(member) {
            blocks.insert(
                member,
                Block {
                    priority: BindingType::Direct.sort_priority(),
                    size: 1,
                    key: member,
                    members: vec![member],
                },
            );
        } else {
            loose.push(member);
        }
    }

    let mut blocks: Vec<Block<'_>> = blocks.into_values().collect();
    blocks.sort_by_key(|b| (b.priority, Reverse(b.size), b.key));

    let mut ordered: Vec<String> = Vec::with_capacity(group.members.len());
    if let Some(leader) = leader.filter(|l| group.contains(l)) {
        ordered.push(leader.to_string());
    }
    for mut block in blocks {
        block.members.sort_unstable();
        ordered.extend(block.members.into_iter().map(str::to_string));
    }
    loose.sort_unstable();
    ordered.extend(loose.into_iter().map(str::to_string));
    ordered
}
