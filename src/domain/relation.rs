// ==========================================
// 志愿者排表系统 - 原始关系记录
// ==========================================
// 由外部导入方产出的规范化记录，字段可能缺失
// ==========================================

use serde::{Deserialize, Serialize};

/// 结伴报名记录（两人）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub second_id: Option<String>,
    #[serde(default)]
    pub second_name: Option<String>,
}

impl PairRecord {
    pub fn new(first_id: &str, first_name: &str, second_id: &str, second_name: &str) -> Self {
        Self {
            first_id: Some(first_id.to_string()),
            first_name: Some(first_name.to_string()),
            second_id: Some(second_id.to_string()),
            second_name: Some(second_name.to_string()),
        }
    }
}

/// 家属关联记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyLink {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub internal_name: Option<String>, // 关联内部人员姓名
    #[serde(default)]
    pub wants_same_group: bool, // 是否希望同组
}

impl FamilyLink {
    pub fn new(id: &str, name: &str, internal_name: &str, wants_same_group: bool) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            internal_name: Some(internal_name.to_string()),
            wants_same_group,
        }
    }
}

/// 团体名单中的一行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// 团体名单（一个团体一份）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub name: String,
    #[serde(default)]
    pub members: Vec<RosterMember>,
}

impl RosterRecord {
    pub fn new(name: &str, members: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            members: members
                .iter()
                .map(|(id, name)| RosterMember {
                    id: Some(id.to_string()),
                    name: Some(name.to_string()),
                })
                .collect(),
        }
    }
}

/// 去除首尾空白后非空则返回
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
