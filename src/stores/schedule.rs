use crate::domain::model::{Event, Listing, Schedule};
use crate::domain::ports::{ApiClient, ApiClientExt};
use crate::utils::error::Result;
use crate::utils::query::QueryBuilder;
use std::sync::Arc;

/// 今天所在月份 `YYYY-MM`
pub fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

pub struct ScheduleStore {
    api: Arc<dyn ApiClient>,
    pub schedule: Option<Schedule>,
    pub schedule_list: Vec<Schedule>,
}

impl ScheduleStore {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            schedule: None,
            schedule_list: Vec::new(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.schedule_list.iter().map(Schedule::to_event).collect()
    }

    /// 未指定月份時取本月
    pub async fn fetch_schedule_list(&mut self, month: Option<&str>) -> Result<()> {
        let month = month
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(current_month);
        let path = QueryBuilder::new()
            .param("search", &month)
            .to_path("/schedule/");
        let list: Listing<Schedule> = self.api.fetch(&path).await?;
        self.schedule_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_schedule(&mut self, pk: i64) -> Result<()> {
        let schedule: Schedule = self.api.fetch(&format!("/schedule/{}/", pk)).await?;
        self.schedule = Some(schedule);
        Ok(())
    }

    pub async fn create_schedule(&mut self, event: &Event) -> Result<Schedule> {
        let created: Schedule = self
            .api
            .create("/schedule/", &Schedule::from_event(event))
            .await?;
        self.refresh_after_save(&created).await?;
        Ok(created)
    }

    pub async fn update_schedule(&mut self, pk: i64, event: &Event) -> Result<Schedule> {
        let updated: Schedule = self
            .api
            .replace(&format!("/schedule/{}/", pk), &Schedule::from_event(event))
            .await?;
        self.refresh_after_save(&updated).await?;
        Ok(updated)
    }

    pub async fn delete_schedule(&mut self, pk: i64, month: &str) -> Result<()> {
        self.api.delete(&format!("/schedule/{}/", pk)).await?;
        self.fetch_schedule_list(Some(month)).await
    }

    async fn refresh_after_save(&mut self, saved: &Schedule) -> Result<()> {
        self.fetch_schedule_list(saved.month().as_deref()).await?;
        if let Some(pk) = saved.pk {
            self.fetch_schedule(pk).await?;
        }
        Ok(())
    }
}
