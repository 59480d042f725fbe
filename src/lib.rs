// ==========================================
// 志愿者排表系统 - 核心库
// ==========================================
// 系统定位: 一次性活动的志愿者分组分配
// 核心: 容量均衡 + 绑定集合 + 多阶段分配
// 边界: 表格解析与报表渲染由外部完成
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 人员/小组/绑定
pub mod domain;

// 引擎层 - 分组规则
pub mod engine;

// 配置层 - 引擎参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BindingType, PersonCategory, Phase, Role};

// 领域实体
pub use domain::{
    BindingConflict, BindingSet, DirectAssignment, FamilyLink, Group, GroupCapacity, PairRecord,
    Person, PositionRequirement, RosterMember, RosterRecord,
};

// 配置
pub use config::{ConfigError, EngineConfig, SpecialistRoleConfig};

// 引擎
pub use engine::{
    balance, AssignmentEngine, BindingBuilder, EngineError, EngineResult, GroupPlanner,
    GroupingInput, GroupingOrchestrator, GroupingResult,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "志愿者排表系统";
