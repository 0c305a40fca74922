use super::NumericCode;
use serde::{Deserialize, Serialize};

/// 登入使用者的權限資料，等級為 "0"（無）/"1"（讀）/"2"（寫）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StaffAuth {
    #[serde(default)]
    pub company: Option<i64>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub assigned_project: Option<i64>,
    #[serde(default)]
    pub allowed_projects: Vec<i64>,
    #[serde(default)]
    pub contract: NumericCode,
    #[serde(default)]
    pub payment: NumericCode,
    #[serde(default)]
    pub notice: NumericCode,
    #[serde(default)]
    pub project_cash: NumericCode,
    #[serde(default)]
    pub project_docs: NumericCode,
    #[serde(default)]
    pub project: NumericCode,
    #[serde(default)]
    pub company_cash: NumericCode,
    #[serde(default)]
    pub company_docs: NumericCode,
    #[serde(default)]
    pub human_resource: NumericCode,
    #[serde(default)]
    pub company_settings: NumericCode,
    #[serde(default)]
    pub auth_manage: NumericCode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub pk: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub staffauth: Option<StaffAuth>,
}

impl UserInfo {
    /// 未設定權限時預設公司 1
    pub fn company_id(&self) -> i64 {
        self.staffauth
            .as_ref()
            .and_then(|a| a.company)
            .unwrap_or(1)
    }

    pub fn is_staff(&self) -> bool {
        self.is_superuser || self.staffauth.as_ref().is_some_and(|a| a.is_staff)
    }

    pub fn has_company_cash(&self) -> bool {
        self.is_superuser
            || self
                .staffauth
                .as_ref()
                .is_some_and(|a| a.company_cash > NumericCode(0))
    }
}
