// ==========================================
// 志愿者排表系统 - 分配引擎
// ==========================================
// 职责: 多阶段把每个可分配人员放入且仅放入一个小组
// 输入: 小组骨架 + 人员 + 绑定集合 + 直接指定
// 输出: 已填充小组 + 人员归属 + 分配报告
// ==========================================
// 阶段顺序: 组长 -> 锁定绑定 -> 自由绑定 -> 直接指定个人
//          -> 专项角色 -> 内部/家属轮转 -> 最终填充
// 红线: 不重复分配；不超容量；未跳过的集合整体同组
// ==========================================

mod phases;
mod state;

#[cfg(test)]
mod tests;

use crate::config::EngineConfig;
use crate::domain::{BindingSet, DirectAssignment, Group, Person, Phase, Role};
use crate::engine::report::{AssignmentReport, PhaseSummary};
use serde::{Deserialize, Serialize};
use state::AssignmentState;
use tracing::{info, instrument};

/// 分配结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub groups: Vec<Group>,
    pub people: Vec<Person>,
    pub report: AssignmentReport,
}

// ==========================================
// AssignmentEngine - 分配引擎
// ==========================================
pub struct AssignmentEngine {
    config: EngineConfig,
}

impl AssignmentEngine {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 引擎配置（专项角色、轮转填充类别）
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// 执行分配
    ///
    /// # 参数
    /// - `groups`: 小组骨架（成员会被清空后重新填充）
    /// - `people`: 人员（group_id 会被重置）
    /// - `binding_sets`: 合并后的绑定集合
    /// - `direct_assignments`: 已校验的直接指定
    #[instrument(skip_all, fields(
        groups = groups.len(),
        people = people.len(),
        binding_sets = binding_sets.len(),
        direct = direct_assignments.len()
    ))]
    pub fn assign(
        &self,
        groups: Vec<Group>,
        people: Vec<Person>,
        binding_sets: &[BindingSet],
        direct_assignments: &[DirectAssignment],
    ) -> AssignmentOutcome {
        let mut state = AssignmentState::new(groups, people, binding_sets, direct_assignments);
        let mut phases = Vec::with_capacity(Phase::ALL.len() + self.config.specialist_roles.len());

        // 步骤1: 组长
        let before = state.shortfalls.len();
        let placed = state.assign_leaders(&self.config.leader_role_name);
        phases.push(summarize(&state, Phase::Leaders, None, placed, before));

        // 步骤2: 已锁定绑定集合
        let before = state.shortfalls.len();
        let placed = state.assign_pinned_bindings(binding_sets);
        phases.push(summarize(&state, Phase::PinnedBindings, None, placed, before));

        // 步骤3: 自由绑定集合
        let before = state.shortfalls.len();
        let placed = state.assign_free_bindings(binding_sets);
        phases.push(summarize(&state, Phase::FreeBindings, None, placed, before));

        // 步骤4: 直接指定个人
        let before = state.shortfalls.len();
        let placed = state.assign_direct_individuals(direct_assignments);
        phases.push(summarize(&state, Phase::DirectIndividuals, None, placed, before));

        // 步骤5: 专项角色（按配置顺序逐个执行）
        for spec in &self.config.specialist_roles {
            let before = state.shortfalls.len();
            let placed = state.assign_specialist_role(spec);
            phases.push(summarize(&state, Phase::SpecialistRoles, Some(spec.role), placed, before));
        }

        // 步骤6: 内部/家属轮转填充
        let before = state.shortfalls.len();
        let placed = state.bulk_fill(&self.config.bulk_fill_categories);
        phases.push(summarize(&state, Phase::BulkFill, None, placed, before));

        // 步骤7: 最终填充
        let before = state.shortfalls.len();
        let placed = state.final_fill();
        phases.push(summarize(&state, Phase::FinalFill, None, placed, before));

        let unplaced = state.collect_unplaced();
        let report = AssignmentReport {
            phases,
            shortfalls: std::mem::take(&mut state.shortfalls),
            unplaced,
        };

        info!(
            placed = report.total_placed(),
            unplaced = report.unplaced.len(),
            shortfalls = report.shortfalls.len(),
            "分配完成"
        );

        AssignmentOutcome {
            groups: state.groups,
            people: state.people,
            report,
        }
    }
}

fn summarize(
    state: &AssignmentState,
    phase: Phase,
    role: Option<Role>,
    placed: usize,
    shortfalls_before: usize,
) -> PhaseSummary {
    let shortfalls = state.shortfalls.len() - shortfalls_before;
    info!(phase = %phase, role = ?role, placed, shortfalls, "分配阶段完成");
    PhaseSummary {
        phase,
        role,
        placed,
        shortfalls,
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
