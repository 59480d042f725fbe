// ==========================================
// 志愿者排表系统 - 容量均衡器
// ==========================================
// 职责: 决定每个岗位类别的小组数与各组人数
// 输入: (岗位, 需求人数) 列表 + 目标小组数 + 独立阈值
// 输出: 每个岗位一个组规模列表（顺序与输入一致）
// ==========================================
// 红线: 各岗位组规模之和等于需求人数
// 取整: 四舍六入五成双
// ==========================================

use crate::domain::{Group, PositionRequirement};
use tracing::{debug, instrument, warn};

/// 计算各岗位的分组规模
///
/// 规则：
/// 1) 理想组规模 = 总人数 / 目标小组数
/// 2) 需求人数 ≤ 理想组规模 × 阈值 的岗位单独成一组
/// 3) 其余岗位按剩余人数/剩余组数重新计算理想规模，组数 = max(1, round(需求/理想))
/// 4) 组数之和与剩余组数不一致时：不足则从需求最大的岗位起逐一加组；
///    超出则从需求最小的岗位起逐一减组（每岗位至少一组）
/// 5) 岗位内均分，前 `需求 % 组数` 个组多 1 人
///
/// # 参数
/// - `requirements`: (岗位, 需求人数)
/// - `target_group_count`: 目标小组数（≤ 0 时返回空）
/// - `independence_threshold`: 独立阈值
///
/// # 返回
/// 每个岗位一个组规模列表；需求为 0 的岗位对应空列表
#[instrument(skip(requirements), fields(categories = requirements.len()))]
pub fn balance<S: AsRef<str>>(
    requirements: &[(S, usize)],
    target_group_count: i64,
    independence_threshold: f64,
) -> Vec<Vec<usize>> {
    if requirements.is_empty() || target_group_count <= 0 {
        return Vec::new();
    }

    let headcounts: Vec<usize> = requirements.iter().map(|(_, h)| *h).collect();
    let total: usize = headcounts.iter().sum();
    if total == 0 {
        return vec![Vec::new(); requirements.len()];
    }

    // 1. 独立岗位判定
    let ideal = total as f64 / target_group_count as f64;
    let independent_limit = ideal * independence_threshold;

    let mut counts = vec![0usize; requirements.len()];
    let mut others = Vec::new();
    for (idx, &headcount) in headcounts.iter().enumerate() {
        if headcount == 0 {
            continue;
        }
        if headcount as f64 <= independent_limit {
            counts[idx] = 1;
            debug!(category = requirements[idx].0.as_ref(), headcount, "独立成组");
        } else {
            others.push(idx);
        }
    }

    let independent_count = counts.iter().filter(|&&c| c == 1).count() as i64;
    if independent_count > target_group_count {
        warn!(
            independent_count,
            target_group_count, "独立岗位数超过目标小组数，每个独立岗位仍单独成组"
        );
    }

    // 2. 非独立岗位分配剩余组数
    if !others.is_empty() {
        let remaining_slots = target_group_count - independent_count;
        if remaining_slots < others.len() as i64 {
            warn!(
                remaining_slots,
                categories = others.len(),
                "剩余组数不足，每个岗位至少保留一组"
            );
            for &idx in &others {
                counts[idx] = 1;
            }
        } else {
            let remaining_people: usize = others.iter().map(|&i| headcounts[i]).sum();
            let new_ideal = remaining_people as f64 / remaining_slots as f64;
            for &idx in &others {
                let raw = (headcounts[idx] as f64 / new_ideal).round_ties_even();
                counts[idx] = (raw as usize).max(1);
            }
            reconcile(&mut counts, &others, &headcounts, remaining_slots as usize);
        }
    }

    // 3. 岗位内均分
    headcounts
        .iter()
        .zip(counts.iter())
        .map(|(&headcount, &groups)| split_evenly(headcount, groups))
        .collect()
}

/// 调整组数使其总和等于剩余组数
fn reconcile(counts: &mut [usize], others: &[usize], headcounts: &[usize], slots: usize) {
    let assigned: usize = others.iter().map(|&i| counts[i]).sum();

    if assigned < slots {
        // 不足: 需求大的岗位优先加组（稳定排序，同需求按输入顺序）
        let mut order = others.to_vec();
        order.sort_by(|a, b| headcounts[*b].cmp(&headcounts[*a]));
        let mut deficit = slots - assigned;
        for &idx in order.iter().cycle() {
            if deficit == 0 {
                break;
            }
            counts[idx] += 1;
            deficit -= 1;
        }
    } else if assigned > slots {
        // 超出: 需求小的岗位优先减组，下限 1
        let mut order = others.to_vec();
        order.sort_by(|a, b| headcounts[*a].cmp(&headcounts[*b]));
        let mut excess = assigned - slots;
        while excess > 0 {
            let mut progressed = false;
            for &idx in &order {
                if excess == 0 {
                    break;
                }
                if counts[idx] > 1 {
                    counts[idx] -= 1;
                    excess -= 1;
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
    }
}

/// 均分: 前 `headcount % groups` 个组多 1 人
fn split_evenly(headcount: usize, groups: usize) -> Vec<usize> {
    if groups == 0 {
        return Vec::new();
    }
    let base = headcount / groups;
    let extra = headcount % groups;
    (0..groups)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

// ==========================================
// GroupPlanner - 小组骨架规划
// ==========================================
// 小组ID从 1 开始，按岗位顺序、组规模顺序连续编号
pub struct GroupPlanner {
    independence_threshold: f64,
}

impl GroupPlanner {
    pub fn new(independence_threshold: f64) -> Self {
        Self {
            independence_threshold,
        }
    }

    /// 生成小组骨架
    ///
    /// # 参数
    /// - `requirements`: 已校验的岗位需求
    /// - `target_group_count`: 目标小组数
    pub fn plan(&self, requirements: &[PositionRequirement], target_group_count: usize) -> Vec<Group> {
        let pairs: Vec<(&str, usize)> = requirements
            .iter()
            .map(|r| {
                (
                    r.category_name.as_str(),
                    usize::try_from(r.headcount).unwrap_or(0),
                )
            })
            .collect();

        let target = i64::try_from(target_group_count).unwrap_or(i64::MAX);
        let sizes = balance(&pairs, target, self.independence_threshold);

        let mut groups = Vec::new();
        let mut next_id: u32 = 1;
        for (requirement, sublist) in requirements.iter().zip(sizes.iter()) {
            for &size in sublist {
                groups.push(
                    Group::new(next_id, requirement.category_name.clone(), size)
                        .with_description(requirement.description.clone()),
                );
                next_id += 1;
            }
        }

        debug!(groups = groups.len(), target_group_count, "小组骨架规划完成");
        groups
    }
}
