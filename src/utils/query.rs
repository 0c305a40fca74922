use std::fmt::Display;
use url::form_urlencoded;

/// 查詢字串組裝器，空值一律略過
#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    pairs: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 必定輸出的參數（值可為空字串）
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// 只在有值且非空字串時輸出
    pub fn opt<T: Display>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(v) = value {
            let v = v.to_string();
            if !v.is_empty() {
                self.pairs.push((key.to_string(), v));
            }
        }
        self
    }

    pub fn flag(mut self, key: &str, enabled: bool) -> Self {
        if enabled {
            self.pairs.push((key.to_string(), "true".to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn build(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }

    /// 附加到資源路徑，例如 `/contract-set/?project=1`
    pub fn to_path(&self, resource: &str) -> String {
        if self.is_empty() {
            resource.to_string()
        } else {
            format!("{}?{}", resource, self.build())
        }
    }
}

/// `ceil(count / per_page)`
pub fn page_count(count: u64, per_page: u64) -> u64 {
    if per_page == 0 {
        return 0;
    }
    count.div_ceil(per_page)
}

/// 解碼 URI 的百分比編碼（`+` 保留原樣）
pub fn decode_uri(raw: &str) -> String {
    let escaped = raw.replace('+', "%2B").replace('&', "%26");
    form_urlencoded::parse(format!("v={}", escaped).as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| raw.to_string())
}
