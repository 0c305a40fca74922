pub mod account;
pub mod cash;
pub mod company;
pub mod contract;
pub mod document;
pub mod schedule;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub use account::{StaffAuth, UserInfo};
pub use cash::*;
pub use company::*;
pub use contract::*;
pub use document::*;
pub use schedule::*;

/// 分頁列表回應 `{ results, count }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default)]
    pub count: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: 0,
        }
    }
}

/// 部分端點不分頁，直接回傳陣列
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Paged(page) => page.results,
            Listing::Plain(items) => items,
        }
    }
}

/// 下拉選單項目
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectOption<V> {
    pub value: V,
    pub label: String,
}

/// 具有主鍵的資源
pub trait Keyed {
    fn key(&self) -> Option<i64>;
}

/// 關聯欄位：API 可能只給 id，也可能展開成物件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(i64),
    Object(T),
}

impl<T: Keyed> Ref<T> {
    pub fn id(&self) -> Option<i64> {
        match self {
            Ref::Id(id) => Some(*id),
            Ref::Object(obj) => obj.key(),
        }
    }

    pub fn object(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Object(obj) => Some(obj),
        }
    }
}

/// 以字串傳輸的數字代碼（狀態、權限等級等），比較一律以數值進行
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericCode(pub u32);

impl NumericCode {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn advance(self, by: u32) -> Self {
        Self(self.0 + by)
    }

    /// 空字串視為 0
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(Self(0));
        }
        trimmed.parse::<u32>().ok().map(Self)
    }
}

impl fmt::Display for NumericCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NumericCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Serialize for NumericCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for NumericCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(Self(n)),
            Raw::Text(s) => Self::parse(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid numeric code: {:?}", s))),
        }
    }
}

/// 空字串與 None 同義
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
