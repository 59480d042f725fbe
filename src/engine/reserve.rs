// ==========================================
// 志愿者排表系统 - 正式/候补划分
// ==========================================
// 普通志愿者（组长除外）按总分降序取前 N 名为正式，其余为候补
// 缺失总分排在最后；同分保持输入顺序
// ==========================================

use crate::domain::{Person, PersonCategory, Role};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSplit {
    pub formal: Vec<String>,
    pub reserve: Vec<String>,
}

/// 划分正式/候补（原地更新 `reserve` 标记，仅作用于普通志愿者）
pub fn split_formal_reserve(people: &mut [Person], formal_count: usize) -> ReserveSplit {
    let mut ranked: Vec<usize> = people
        .iter()
        .enumerate()
        .filter(|(_, p)| p.category == PersonCategory::Normal && !p.has_role(Role::Leader))
        .map(|(idx, _)| idx)
        .collect();

    ranked.sort_by(|&a, &b| {
        match (people[a].general_score, people[b].general_score) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });

    let mut split = ReserveSplit::default();
    for (rank, idx) in ranked.into_iter().enumerate() {
        let person = &mut people[idx];
        person.reserve = rank >= formal_count;
        if person.reserve {
            split.reserve.push(person.id.clone());
        } else {
            split.formal.push(person.id.clone());
        }
    }

    info!(
        formal = split.formal.len(),
        reserve = split.reserve.len(),
        "正式/候补划分完成"
    );
    split
}
