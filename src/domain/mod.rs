// ==========================================
// 志愿者排表系统 - 领域层
// ==========================================
// 职责: 人员、小组、绑定集合与原始关系记录
// 约定: 小组与人员以ID互相引用，不持有对象引用
// ==========================================

pub mod binding;
pub mod group;
pub mod person;
pub mod relation;
pub mod types;

pub use binding::{BindingConflict, BindingSet, ConflictMember, DirectAssignment};
pub use group::{Group, GroupCapacity, PositionRequirement};
pub use person::Person;
pub use relation::{FamilyLink, PairRecord, RosterMember, RosterRecord};
pub use types::{BindingType, PersonCategory, Phase, Role};
