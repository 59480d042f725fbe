// ==========================================
// 志愿者排表系统 - 输入校验
// ==========================================
// 职责: 人员/岗位/直接指定的前置检查
// 结构性问题 -> EngineError（中止）
// 记录级问题 -> ValidationIssue（跳过该记录，继续运行）
// ==========================================

use crate::domain::{DirectAssignment, Person, PositionRequirement};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

// ==========================================
// ValidationIssue - 记录级问题
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    MissingField,              // 必填字段缺失
    DuplicateName,             // 姓名重复（仅提示）
    UnknownPerson,             // 引用了不存在的人员
    InvalidHeadcount,          // 需求人数非正
    MalformedRelation,         // 关系记录格式错误
    DuplicateDirectAssignment, // 重复的直接指定（目标相同）
    FamilyLimitExceeded,       // 内部人员关联家属过多
    UnresolvedInternal,        // 家属关联的内部人员无法解析
    EmptyRoster,               // 团体名单无有效成员
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub subject: String, // 问题对象（人员ID/名单名/岗位名）
    pub message: String,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        let issue = Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        };
        warn!(kind = ?issue.kind, subject = %issue.subject, "{}", issue.message);
        issue
    }
}

// ==========================================
// InputValidator - 输入校验器
// ==========================================
pub struct InputValidator {
    // 无状态
}

impl InputValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 校验人员列表
    ///
    /// # 返回
    /// - `Ok((有效人员, 问题列表))`
    /// - `Err(DuplicatePersonId)`: 人员ID重复
    pub fn validate_people(
        &self,
        people: Vec<Person>,
    ) -> EngineResult<(Vec<Person>, Vec<ValidationIssue>)> {
        let mut issues = Vec::new();
        let mut valid = Vec::with_capacity(people.len());
        let mut seen_ids = HashSet::new();
        let mut names: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for mut person in people {
            person.id = person.id.trim().to_string();
            person.name = person.name.trim().to_string();

            if person.id.is_empty() || person.name.is_empty() {
                issues.push(ValidationIssue::new(
                    IssueKind::MissingField,
                    if person.id.is_empty() { &person.name } else { &person.id },
                    "人员缺少ID或姓名，已跳过",
                ));
                continue;
            }

            if !seen_ids.insert(person.id.clone()) {
                return Err(EngineError::DuplicatePersonId(person.id));
            }

            names
                .entry(person.name.clone())
                .or_default()
                .push(person.id.clone());
            valid.push(person);
        }

        for (name, ids) in names.iter().filter(|(_, ids)| ids.len() > 1) {
            issues.push(ValidationIssue::new(
                IssueKind::DuplicateName,
                name.clone(),
                format!("姓名重复: {}", ids.join(", ")),
            ));
        }

        Ok((valid, issues))
    }

    /// 校验岗位需求（需求人数非正或名称为空的岗位被跳过）
    pub fn validate_requirements(
        &self,
        requirements: Vec<PositionRequirement>,
    ) -> (Vec<PositionRequirement>, Vec<ValidationIssue>) {
        let mut issues = Vec::new();
        let mut valid = Vec::with_capacity(requirements.len());

        for requirement in requirements {
            if requirement.category_name.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    IssueKind::MissingField,
                    "",
                    "岗位名称为空，已跳过",
                ));
                continue;
            }
            if requirement.headcount <= 0 {
                issues.push(ValidationIssue::new(
                    IssueKind::InvalidHeadcount,
                    requirement.category_name.clone(),
                    format!("需求人数非正 ({})，已跳过", requirement.headcount),
                ));
                continue;
            }
            valid.push(requirement);
        }

        (valid, issues)
    }

    /// 校验直接指定
    ///
    /// # 参数
    /// - `assignments`: 原始直接指定（输入顺序）
    /// - `people`: 已校验人员
    /// - `group_ids`: 已规划的小组ID
    ///
    /// # 返回
    /// 去重后的直接指定；目标小组不存在或同一人多目标时返回 Err
    pub fn validate_direct_assignments(
        &self,
        assignments: Vec<DirectAssignment>,
        people: &[Person],
        group_ids: &HashSet<u32>,
    ) -> EngineResult<(Vec<DirectAssignment>, Vec<ValidationIssue>)> {
        let known: HashSet<&str> = people.iter().map(|p| p.id.as_str()).collect();
        let mut issues = Vec::new();
        let mut valid: Vec<DirectAssignment> = Vec::with_capacity(assignments.len());
        let mut targets: HashMap<String, u32> = HashMap::new();

        for mut assignment in assignments {
            assignment.person_id = assignment.person_id.trim().to_string();

            if !known.contains(assignment.person_id.as_str()) {
                issues.push(ValidationIssue::new(
                    IssueKind::UnknownPerson,
                    assignment.person_id.clone(),
                    "直接指定引用了不存在的人员，已跳过",
                ));
                continue;
            }

            if !group_ids.contains(&assignment.group_id) {
                return Err(EngineError::UnknownDirectTarget {
                    person_id: assignment.person_id,
                    group_id: assignment.group_id,
                });
            }

            match targets.get(&assignment.person_id) {
                Some(&first) if first == assignment.group_id => {
                    issues.push(ValidationIssue::new(
                        IssueKind::DuplicateDirectAssignment,
                        assignment.person_id.clone(),
                        format!("重复的直接指定 (小组 {})，已合并", first),
                    ));
                }
                Some(&first) => {
                    return Err(EngineError::ConflictingDirectAssignment {
                        person_id: assignment.person_id,
                        first,
                        second: assignment.group_id,
                    });
                }
                None => {
                    targets.insert(assignment.person_id.clone(), assignment.group_id);
                    valid.push(assignment);
                }
            }
        }

        Ok((valid, issues))
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PersonCategory;

    fn person(id: &str, name: &str) -> Person {
        Person::new(id, name, PersonCategory::Normal)
    }

    #[test]
    fn test_duplicate_id_is_structural() {
        let validator = InputValidator::new();
        let result = validator.validate_people(vec![person("S1", "甲"), person("S1", "乙")]);
        assert!(matches!(result, Err(EngineError::DuplicatePersonId(id)) if id == "S1"));
    }

    #[test]
    fn test_blank_fields_skipped_and_duplicate_names_warned() {
        let validator = InputValidator::new();
        let (valid, issues) = validator
            .validate_people(vec![person(" ", "甲"), person("S2", "乙"), person("S3", "乙")])
            .unwrap();
        assert_eq!(valid.len(), 2);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, IssueKind::MissingField);
        assert_eq!(issues[1].kind, IssueKind::DuplicateName);
    }

    #[test]
    fn test_direct_assignment_rules() {
        let validator = InputValidator::new();
        let people = vec![person("S1", "甲"), person("S2", "乙")];
        let groups: HashSet<u32> = [1, 2].into_iter().collect();

        let (valid, issues) = validator
            .validate_direct_assignments(
                vec![
                    DirectAssignment::new("S1", 1),
                    DirectAssignment::new("S1", 1),
                    DirectAssignment::new("S9", 2),
                ],
                &people,
                &groups,
            )
            .unwrap();
        assert_eq!(valid, vec![DirectAssignment::new("S1", 1)]);
        assert_eq!(issues.len(), 2);

        let conflicting = validator.validate_direct_assignments(
            vec![DirectAssignment::new("S2", 1), DirectAssignment::new("S2", 2)],
            &people,
            &groups,
        );
        assert!(matches!(
            conflicting,
            Err(EngineError::ConflictingDirectAssignment { first: 1, second: 2, .. })
        ));

        let unknown_group = validator.validate_direct_assignments(
            vec![DirectAssignment::new("S2", 9)],
            &people,
            &groups,
        );
        assert!(matches!(unknown_group, Err(EngineError::UnknownDirectTarget { group_id: 9, .. })));
    }
}
