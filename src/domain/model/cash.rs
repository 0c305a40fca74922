use serde::{Deserialize, Serialize};

/// 帳目大分類（收入/支出）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountSort {
    pub pk: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectAccountD2 {
    pub pk: i64,
    #[serde(default)]
    pub d1: Option<serde_json::Value>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectAccountD3 {
    pub pk: i64,
    #[serde(default)]
    pub d2: Option<i64>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProBankAcc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub project: Option<i64>,
    #[serde(default)]
    pub bankcode: Option<i64>,
    #[serde(default)]
    pub alias_name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub holder: String,
    #[serde(default)]
    pub open_date: Option<String>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub is_hide: bool,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub directpay: bool,
    #[serde(default)]
    pub is_imprest: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BalanceByAccount {
    #[serde(default)]
    pub bank_acc: String,
    #[serde(default)]
    pub bank_num: String,
    #[serde(default)]
    pub date_inc: i64,
    #[serde(default)]
    pub date_out: i64,
    #[serde(default)]
    pub inc_sum: Option<i64>,
    #[serde(default)]
    pub out_sum: Option<i64>,
}

/// 現場收支帳
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectCashBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub project: Option<i64>,
    #[serde(default)]
    pub sort: Option<i64>,
    #[serde(default)]
    pub project_account_d1: Option<i64>,
    #[serde(default)]
    pub project_account_d2: Option<i64>,
    #[serde(default)]
    pub project_account_d3: Option<i64>,
    #[serde(default)]
    pub is_separate: bool,
    #[serde(default)]
    pub separated: Option<i64>,
    #[serde(default)]
    pub is_imprest: bool,
    #[serde(default)]
    pub is_contract_payment: bool,
    #[serde(default)]
    pub contract: Option<i64>,
    #[serde(default)]
    pub installment_order: Option<i64>,
    #[serde(default)]
    pub refund_contractor: Option<i64>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub trader: String,
    #[serde(default)]
    pub bank_account: Option<i64>,
    #[serde(default)]
    pub income: Option<i64>,
    #[serde(default)]
    pub outlay: Option<i64>,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub deal_date: Option<String>,
}

/// 收支帳列表過濾條件
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CashBookFilter {
    pub project: Option<i64>,
    pub page: Option<u64>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub sort: Option<i64>,
    pub account_d1: Option<i64>,
    pub pro_acc_d2: Option<i64>,
    pub pro_acc_d3: Option<i64>,
    pub bank_account: Option<i64>,
    pub contract: Option<i64>,
    pub search: Option<String>,
}

/// 現場資金結算紀錄
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProCalculated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub project: i64,
    #[serde(default)]
    pub calculated: Option<String>,
    #[serde(default)]
    pub user: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LastDeal {
    pub deal_date: String,
}
