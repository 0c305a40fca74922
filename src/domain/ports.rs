use crate::utils::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// REST API 的傳輸介面；路徑皆為相對於 base URL 的資源路徑
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;
    async fn post(&self, path: &str, body: &Value) -> Result<Value>;
    async fn put(&self, path: &str, body: &Value) -> Result<Value>;
    async fn patch(&self, path: &str, body: &Value) -> Result<Value>;
    async fn delete(&self, path: &str) -> Result<()>;
}

/// 型別化的呼叫輔助，所有 `ApiClient` 自動取得
#[async_trait]
pub trait ApiClientExt: ApiClient {
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.get(path).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn create<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let value = self.post(path, &body).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn replace<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let value = self.put(path, &body).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn modify<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let value = self.patch(path, &body).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl<A: ApiClient + ?Sized> ApiClientExt for A {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// 使用者通知（toast/banner）
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, title: &str, message: &str);

    fn success(&self) {
        self.notify(NoticeLevel::Success, "알림!", "저장이 완료되었습니다.");
    }

    fn deleted(&self) {
        self.notify(NoticeLevel::Warning, "알림!", "해당 오브젝트가 삭제되었습니다.");
    }

    fn error(&self, err: &crate::utils::error::ClientError) {
        self.notify(NoticeLevel::Danger, "에러!", &err.user_friendly_message());
    }
}

/// 換頁時的進度指示
pub trait ProgressIndicator: Send + Sync {
    fn start(&self);
    fn close(&self);
}
