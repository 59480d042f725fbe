// ==========================================
// 志愿者排表系统 - 绑定集合构建器
// ==========================================
// 职责: 由结伴/家属/团体名单生成"必须同组"集合
// 输入: 人员 + 原始关系记录 + 直接指定
// 输出: 合并后的绑定集合 + 锁定冲突 + 记录级问题 + 统计
// ==========================================
// 红线: 合并后每人最多属于一个集合
// 红线: 冲突集合不锁定，由自由绑定阶段处理
// ==========================================

mod core;
mod merge;
mod statistics;


pub use self::core::{BindingBuilder, BindingOutcome};
pub use statistics::BindingStatistics;
