use crate::domain::ports::ApiClient;
use crate::utils::error::{ClientError, Result};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 單一步驟的執行結果
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Done,
    Failed(String),
    Skipped(String),
    Compensated,
    CompensationFailed(String),
}

#[derive(Debug, Clone)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub duration: Duration,
}

impl StepRecord {
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            StepStatus::Failed(_) | StepStatus::CompensationFailed(_)
        )
    }
}

/// 撤銷已完成步驟的 API 呼叫
#[derive(Debug, Clone, PartialEq)]
pub enum Compensation {
    Delete { path: String },
    Patch { path: String, body: Value },
}

impl Compensation {
    async fn apply(&self, api: &dyn ApiClient) -> Result<()> {
        match self {
            Compensation::Delete { path } => api.delete(path).await,
            Compensation::Patch { path, body } => api.patch(path, body).await.map(|_| ()),
        }
    }
}

/// 多步驟寫入：任一步失敗時，依反序執行已登記的補償
pub struct Saga {
    workflow: String,
    api: Arc<dyn ApiClient>,
    steps: Vec<StepRecord>,
    compensations: Vec<(String, Compensation)>,
}

impl Saga {
    pub fn new(workflow: impl Into<String>, api: Arc<dyn ApiClient>) -> Self {
        Self {
            workflow: workflow.into(),
            api,
            steps: Vec::new(),
            compensations: Vec::new(),
        }
    }

    /// 執行一個步驟；失敗時先回滾再回傳 `WorkflowAborted`
    pub async fn run<T, F>(&mut self, step: &str, action: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        match action.await {
            Ok(value) => {
                tracing::debug!("✅ [{}] {}", self.workflow, step);
                self.record(step, StepStatus::Done, started);
                Ok(value)
            }
            Err(e) => {
                tracing::error!("❌ [{}] {} failed: {}", self.workflow, step, e);
                self.record(step, StepStatus::Failed(e.to_string()), started);
                self.rollback().await;
                Err(ClientError::WorkflowAborted {
                    workflow: self.workflow.clone(),
                    step: step.to_string(),
                    source: Box::new(e),
                })
            }
        }
    }

    /// 登記前一步驟的補償動作
    pub fn on_rollback(&mut self, step: &str, compensation: Compensation) {
        self.compensations.push((step.to_string(), compensation));
    }

    pub fn skip(&mut self, step: &str, reason: &str) {
        tracing::debug!("⏭️ [{}] {} skipped: {}", self.workflow, step, reason);
        self.record(step, StepStatus::Skipped(reason.to_string()), Instant::now());
    }

    /// 補償失敗只記錄，不中斷其餘補償
    pub async fn rollback(&mut self) {
        while let Some((step, compensation)) = self.compensations.pop() {
            let started = Instant::now();
            let name = format!("undo:{}", step);
            match compensation.apply(self.api.as_ref()).await {
                Ok(()) => {
                    tracing::warn!("↩️ [{}] {} rolled back", self.workflow, step);
                    self.record(&name, StepStatus::Compensated, started);
                }
                Err(e) => {
                    tracing::error!("❌ [{}] rollback of {} failed: {}", self.workflow, step, e);
                    self.record(&name, StepStatus::CompensationFailed(e.to_string()), started);
                }
            }
        }
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }

    fn record(&mut self, step: &str, status: StepStatus, started: Instant) {
        self.steps.push(StepRecord {
            name: step.to_string(),
            status,
            duration: started.elapsed(),
        });
    }
}

/// 依序執行、各自記錄結果的任務清單（失敗不中斷後續任務）
#[derive(Debug, Default)]
pub struct TaskLog {
    steps: Vec<StepRecord>,
}

impl TaskLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 成功回傳 `Some(value)`，失敗記錄後回傳 `None`
    pub async fn attempt<T, F>(&mut self, task: &str, action: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        match action.await {
            Ok(value) => {
                tracing::debug!("✅ {}", task);
                self.push(task, StepStatus::Done, started);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("⚠️ {} failed: {}", task, e);
                self.push(task, StepStatus::Failed(e.user_friendly_message()), started);
                None
            }
        }
    }

    pub fn skip(&mut self, task: &str, reason: &str) {
        tracing::debug!("⏭️ {} skipped: {}", task, reason);
        self.push(task, StepStatus::Skipped(reason.to_string()), Instant::now());
    }

    pub fn failures(&self) -> Vec<&StepRecord> {
        self.steps.iter().filter(|s| s.is_failure()).collect()
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }

    fn push(&mut self, task: &str, status: StepStatus, started: Instant) {
        self.steps.push(StepRecord {
            name: task.to_string(),
            status,
            duration: started.elapsed(),
        });
    }
}
