// ==========================================
// 志愿者排表系统 - 引擎层
// ==========================================
// 职责: 校验、容量均衡、绑定构建、多阶段分配、复核
// 红线: 引擎不做文件解析与报表渲染
// 红线: 结构性错误返回 Err，其余问题进入报告
// ==========================================

pub mod assignment;
pub mod balancer;
pub mod binder;
pub mod error;
pub mod member_order;
pub mod orchestrator;
pub mod report;
pub mod reserve;
pub mod validation;
pub mod verifier;

// 重导出核心引擎
pub use assignment::{AssignmentEngine, AssignmentOutcome};
pub use balancer::{balance, GroupPlanner};
pub use binder::{BindingBuilder, BindingOutcome, BindingStatistics};
pub use error::{EngineError, EngineResult};
pub use member_order::order_members;
pub use orchestrator::{GroupingInput, GroupingOrchestrator, GroupingReport, GroupingResult};
pub use report::{
    AssignmentReport, PhaseSummary, Shortfall, SkipCause, SpecialistGap, UnplacedPerson,
    UnplacedReason,
};
pub use reserve::{split_formal_reserve, ReserveSplit};
pub use validation::{InputValidator, IssueKind, ValidationIssue};
pub use verifier::{ResultVerifier, VerificationReport, Violation};
