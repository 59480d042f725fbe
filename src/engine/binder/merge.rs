// ==========================================
// 绑定集合合并（传递闭包）
// ==========================================
// 共享成员的集合合并为一个；合并采用并查集
// 类型: 全部同类型则保留，否则为 MERGED
// 成员: 按首次出现顺序去重
// ==========================================

use super::core::BindingIdAllocator;
use crate::domain::{BindingSet, BindingType};
use std::collections::HashMap;
use tracing::debug;

/// 并查集（按秩合并 + 路径压缩）
pub(crate) struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub(crate) fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// 合并共享成员的绑定集合
///
/// 输出顺序: 按各连通分量中最早出现的集合排列
pub(crate) fn merge_overlapping(
    sets: Vec<BindingSet>,
    ids: &mut BindingIdAllocator,
) -> Vec<BindingSet> {
    let mut dsu = DisjointSets::new(sets.len());
    let mut owner: HashMap<&str, usize> = HashMap::new();
    for (idx, set) in sets.iter().enumerate() {
        for member in &set.members {
            match owner.get(member.as_str()) {
                Some(&first) => dsu.union(first, idx),
                None => {
                    owner.insert(member.as_str(), idx);
                }
            }
        }
    }

    // 连通分量（保持首次出现顺序）
    let mut component_of_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for idx in 0..sets.len() {
        let root = dsu.find(idx);
        let slot = *component_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(idx);
    }

    let mut pool: Vec<Option<BindingSet>> = sets.into_iter().map(Some).collect();
    let mut merged = Vec::with_capacity(components.len());

    for component in components {
        let parts: Vec<BindingSet> = component
            .iter()
            .filter_map(|&idx| pool[idx].take())
            .collect();

        if parts.len() == 1 {
            merged.extend(parts);
            continue;
        }

        let first_type = parts[0].binding_type;
        let binding_type = if parts.iter().all(|p| p.binding_type == first_type) {
            first_type
        } else {
            BindingType::Merged
        };

        let mut members: Vec<String> = Vec::new();
        for part in &parts {
            for member in &part.members {
                if !members.contains(member) {
                    members.push(member.clone());
                }
            }
        }

        let binding_id = ids.next(BindingType::Merged.id_prefix());
        debug!(
            binding_id = %binding_id,
            merged_from = ?parts.iter().map(|p| p.binding_id.as_str()).collect::<Vec<_>>(),
            size = members.len(),
            "绑定集合合并"
        );
        merged.push(BindingSet::new(binding_id, binding_type, members));
    }

    merged
}
