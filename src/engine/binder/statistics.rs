use crate::domain::{BindingConflict, BindingSet, BindingType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 绑定集合统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingStatistics {
    pub total_sets: usize,
    pub total_members: usize,
    pub average_size: f64,
    pub pinned_sets: usize,
    pub unbound_sets: usize,
    pub conflict_count: usize,
    pub type_distribution: BTreeMap<BindingType, usize>,
    pub size_distribution: BTreeMap<usize, usize>, // 集合规模 -> 数量
}

impl BindingStatistics {
    pub fn collect(sets: &[BindingSet], conflicts: &[BindingConflict]) -> Self {
        let mut stats = BindingStatistics {
            total_sets: sets.len(),
            conflict_count: conflicts.len(),
            ..Default::default()
        };

        for set in sets {
            stats.total_members += set.size();
            if set.is_pinned() {
                stats.pinned_sets += 1;
            }
            if set.unbound {
                stats.unbound_sets += 1;
            }
            *stats.type_distribution.entry(set.binding_type).or_insert(0) += 1;
            *stats.size_distribution.entry(set.size()).or_insert(0) += 1;
        }

        if stats.total_sets > 0 {
            stats.average_size = stats.total_members as f64 / stats.total_sets as f64;
        }
        stats
    }
}
