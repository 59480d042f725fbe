// ==========================================
// 志愿者排表系统 - 引擎编排器
// ==========================================
// 用途: 串联校验、规划、绑定、分配、复核
// 流程: 人员校验 -> 候补划分 -> 岗位校验 -> 小组规划
//      -> 直接指定校验 -> 绑定构建 -> 分配 -> 成员排序 -> 复核
// ==========================================

use crate::config::EngineConfig;
use crate::domain::{
    BindingConflict, BindingSet, DirectAssignment, FamilyLink, Group, PairRecord, Person,
    PositionRequirement, Role, RosterRecord,
};
use crate::engine::assignment::AssignmentEngine;
use crate::engine::balancer::GroupPlanner;
use crate::engine::binder::{BindingBuilder, BindingStatistics};
use crate::engine::error::EngineResult;
use crate::engine::member_order::order_members;
use crate::engine::report::AssignmentReport;
use crate::engine::reserve::{split_formal_reserve, ReserveSplit};
use crate::engine::validation::{InputValidator, ValidationIssue};
use crate::engine::verifier::{ResultVerifier, VerificationReport};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

// ==========================================
// GroupingInput - 输入数据包
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupingInput {
    pub people: Vec<Person>,
    pub requirements: Vec<PositionRequirement>,
    #[serde(default)]
    pub pairs: Vec<PairRecord>,
    #[serde(default)]
    pub family_links: Vec<FamilyLink>,
    #[serde(default)]
    pub rosters: Vec<RosterRecord>,
    #[serde(default)]
    pub direct_assignments: Vec<DirectAssignment>,
    /// 组长报名人数（缺省时按带组长角色的人员计数）
    #[serde(default)]
    pub leader_headcount: Option<usize>,
}

// ==========================================
// GroupingResult - 分组结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupingReport {
    pub assignment: AssignmentReport,
    pub conflicts: Vec<BindingConflict>,
    pub validation_issues: Vec<ValidationIssue>,
    pub binding_statistics: BindingStatistics,
    pub verification: VerificationReport,
    #[serde(default)]
    pub reserve_split: Option<ReserveSplit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupingResult {
    pub groups: Vec<Group>, // 成员已按输出顺序排列
    pub people: Vec<Person>,
    pub binding_sets: Vec<BindingSet>,
    pub report: GroupingReport,
}

impl GroupingResult {
    pub fn group(&self, group_id: u32) -> Option<&Group> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }

    /// 人员所在小组
    pub fn group_of(&self, person_id: &str) -> Option<u32> {
        self.people
            .iter()
            .find(|p| p.id == person_id)
            .and_then(|p| p.group_id)
    }
}

// ==========================================
// GroupingOrchestrator - 引擎编排器
// ==========================================
pub struct GroupingOrchestrator {
    config: EngineConfig,
    validator: InputValidator,
    planner: GroupPlanner,
    binder: BindingBuilder,
    engine: AssignmentEngine,
    verifier: ResultVerifier,
}

impl GroupingOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - `config`: 引擎配置（构造时校验）
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            validator: InputValidator::new(),
            planner: GroupPlanner::new(config.independence_threshold),
            binder: BindingBuilder::new(config.max_family_per_internal),
            engine: AssignmentEngine::new(config.clone()),
            verifier: ResultVerifier::new(),
            config,
        })
    }

    /// 执行完整分组流程
    ///
    /// # 返回
    /// - `Ok(GroupingResult)`: 分组结果（容量缺口、冲突、记录级问题在报告中）
    /// - `Err(EngineError)`: 结构性错误，整次运行中止
    #[instrument(skip_all, fields(
        people = input.people.len(),
        requirements = input.requirements.len()
    ))]
    pub fn run(&self, input: GroupingInput) -> EngineResult<GroupingResult> {
        info!("开始执行分组流程");
        let mut validation_issues = Vec::new();

        // ==========================================
        // 步骤1: 人员校验
        // ==========================================
        debug!("步骤1: 人员校验");
        let (mut people, issues) = self.validator.validate_people(input.people)?;
        validation_issues.extend(issues);

        // ==========================================
        // 步骤2: 正式/候补划分
        // ==========================================
        let reserve_split = self.config.formal_volunteer_count.map(|formal_count| {
            debug!(formal_count, "步骤2: 正式/候补划分");
            split_formal_reserve(&mut people, formal_count)
        });

        // ==========================================
        // 步骤3: 岗位校验与小组规划
        // ==========================================
        debug!("步骤3: 小组规划");
        let (requirements, issues) = self.validator.validate_requirements(input.requirements);
        validation_issues.extend(issues);

        let target_group_count = self.target_group_count(&people, input.leader_headcount);
        if target_group_count == 0 {
            warn!("目标小组数为 0，不生成小组");
        }
        let groups = self.planner.plan(&requirements, target_group_count);

        info!(
            target_group_count,
            planned_groups = groups.len(),
            "小组规划完成"
        );

        // ==========================================
        // 步骤4: 直接指定校验
        // ==========================================
        debug!("步骤4: 直接指定校验");
        let group_ids: HashSet<u32> = groups.iter().map(|g| g.group_id).collect();
        let (direct_assignments, issues) = self.validator.validate_direct_assignments(
            input.direct_assignments,
            &people,
            &group_ids,
        )?;
        validation_issues.extend(issues);

        // ==========================================
        // 步骤5: 绑定集合构建
        // ==========================================
        debug!("步骤5: 绑定集合构建");
        let binding = self.binder.build(
            &people,
            &input.pairs,
            &input.family_links,
            &input.rosters,
            &direct_assignments,
        );
        validation_issues.extend(binding.issues);

        // ==========================================
        // 步骤6: 分配
        // ==========================================
        debug!("步骤6: 多阶段分配");
        let outcome = self.engine.assign(
            groups,
            people,
            &binding.binding_sets,
            &direct_assignments,
        );

        // ==========================================
        // 步骤7: 成员排序与复核
        // ==========================================
        debug!("步骤7: 成员排序与结果复核");
        let mut groups = outcome.groups;
        for group in &mut groups {
            group.members = order_members(group, &binding.binding_sets, &direct_assignments);
        }
        let verification = self.verifier.verify(
            &groups,
            &outcome.people,
            &binding.binding_sets,
            &outcome.report,
        );

        info!(
            groups = groups.len(),
            placed = verification.total_placed,
            unplaced = outcome.report.unplaced.len(),
            conflicts = binding.conflicts.len(),
            issues = validation_issues.len(),
            "分组流程完成"
        );

        Ok(GroupingResult {
            groups,
            people: outcome.people,
            binding_sets: binding.binding_sets,
            report: GroupingReport {
                assignment: outcome.report,
                conflicts: binding.conflicts,
                validation_issues,
                binding_statistics: binding.statistics,
                verification,
                reserve_split,
            },
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 目标小组数: 配置 > 组长报名人数 > 带组长角色的正式人员数
    fn target_group_count(&self, people: &[Person], leader_headcount: Option<usize>) -> usize {
        self.config
            .target_group_count
            .or(leader_headcount)
            .unwrap_or_else(|| {
                people
                    .iter()
                    .filter(|p| p.has_role(Role::Leader) && !p.reserve)
                    .count()
            })
    }
}
