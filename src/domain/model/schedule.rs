use serde::{Deserialize, Serialize};

/// API 端的行程資料
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl Schedule {
    /// 行事曆事件：整日行程用日期，其他用時間
    pub fn to_event(&self) -> Event {
        let (start, end) = if self.all_day {
            (self.start_date.clone(), self.end_date.clone())
        } else {
            (self.start_time.clone(), self.end_time.clone())
        };
        Event {
            id: self.pk.map(|pk| pk.to_string()),
            title: self.title.clone(),
            start,
            end,
            all_day: self.all_day,
        }
    }

    pub fn from_event(event: &Event) -> Self {
        let (start_date, end_date, start_time, end_time) = if event.all_day {
            (event.start.clone(), event.end.clone(), None, None)
        } else {
            (None, None, event.start.clone(), event.end.clone())
        };
        Self {
            pk: None,
            title: event.title.clone(),
            all_day: event.all_day,
            start_date,
            end_date,
            start_time,
            end_time,
        }
    }

    /// `YYYY-MM`，用於重新整理所在月份
    pub fn month(&self) -> Option<String> {
        self.start_date
            .as_deref()
            .or(self.start_time.as_deref())
            .filter(|s| s.len() >= 7)
            .map(|s| s[..7].to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: Option<String>,
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default, rename = "allDay")]
    pub all_day: bool,
}
