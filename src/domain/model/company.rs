use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Company {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub ceo: String,
    #[serde(default)]
    pub tax_number: String,
    #[serde(default)]
    pub org_number: String,
    #[serde(default)]
    pub business_cond: String,
    #[serde(default)]
    pub business_even: String,
    #[serde(default)]
    pub es_date: Option<String>,
    #[serde(default)]
    pub op_date: Option<String>,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub address3: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub company: Option<i64>,
    #[serde(default)]
    pub sort: String,
    pub name: String,
    #[serde(default)]
    pub id_number: String,
    #[serde(default)]
    pub personal_phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: Option<i64>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub duty: Option<i64>,
    #[serde(default)]
    pub grade: Option<i64>,
    #[serde(default)]
    pub date_join: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Rank {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub company: Option<i64>,
    #[serde(default)]
    pub sort: String,
    pub rank: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Department {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub company: Option<i64>,
    #[serde(default)]
    pub upper_depart: Option<i64>,
    #[serde(default)]
    pub level: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub task: String,
}

/// 職員列表過濾條件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffFilter {
    pub page: Option<u64>,
    pub com: Option<i64>,
    pub dep: Option<String>,
    pub rank: Option<String>,
    pub sts: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankFilter {
    pub page: Option<u64>,
    pub com: Option<i64>,
    pub sort: Option<String>,
    pub q: Option<String>,
}
