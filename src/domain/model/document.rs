use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub pk: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub manager: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Board {
    pub pk: Option<i64>,
    pub group: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub search_able: bool,
    #[serde(default)]
    pub manager: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub pk: Option<i64>,
    pub board: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
    pub name: String,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryTag {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseLink {
    pub pk: i64,
    pub category: CategoryTag,
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    pub pk: i64,
    pub category: CategoryTag,
    pub file: String,
}

/// 訴訟案件
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SuitCase {
    pub pk: Option<i64>,
    pub company: Option<i64>,
    pub project: Option<i64>,
    #[serde(default)]
    pub sort: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub related_case: Option<i64>,
    #[serde(default)]
    pub court: String,
    #[serde(default)]
    pub other_agency: String,
    #[serde(default)]
    pub case_number: String,
    #[serde(default)]
    pub case_name: String,
    #[serde(default)]
    pub plaintiff: String,
    #[serde(default)]
    pub plaintiff_attorney: String,
    #[serde(default)]
    pub defendant: String,
    #[serde(default)]
    pub defendant_attorney: String,
    #[serde(default)]
    pub related_debtor: String,
    #[serde(default)]
    pub case_start_date: Option<String>,
    #[serde(default)]
    pub case_end_date: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub links: Vec<CaseLink>,
    #[serde(default)]
    pub files: Vec<CaseFile>,
    #[serde(default)]
    pub prev_pk: Option<i64>,
    #[serde(default)]
    pub next_pk: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub pk: Option<i64>,
    pub post: i64,
    pub link: String,
    #[serde(default)]
    pub hit: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttachedFile {
    pub pk: Option<i64>,
    #[serde(default)]
    pub post: Option<i64>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub hit: i64,
}

/// 公告/文件貼文
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub company: Option<i64>,
    pub project: Option<i64>,
    pub board: Option<i64>,
    #[serde(default)]
    pub is_notice: bool,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub lawsuit: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub execution_date: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_hide_comment: bool,
    #[serde(default)]
    pub hit: i64,
    #[serde(default)]
    pub blame: i64,
    #[serde(default)]
    pub secret: bool,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub files: Vec<AttachedFile>,
    #[serde(default)]
    pub soft_delete: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}
