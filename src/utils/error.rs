use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API responded {status} for {path}: {body}")]
    Api {
        status: u16,
        path: String,
        body: serde_json::Value,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid reference in {field}: {value:?}")]
    InvalidReference { field: String, value: String },

    #[error("Workflow '{workflow}' aborted at step '{step}': {source}")]
    WorkflowAborted {
        workflow: String,
        step: String,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// 取得 HTTP 狀態碼（若錯誤來自 API 回應）
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::WorkflowAborted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// 給使用者看的通知訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::Api { body, .. } => match body {
                serde_json::Value::Object(map) if !map.is_empty() => map
                    .iter()
                    .map(|(field, detail)| format!("{}: {}", field, flatten_detail(detail)))
                    .collect::<Vec<_>>()
                    .join("\n"),
                serde_json::Value::Null => self.to_string(),
                other => flatten_detail(other),
            },
            ClientError::Http(_) => "서버와 통신할 수 없습니다.".to_string(),
            ClientError::WorkflowAborted { step, source, .. } => {
                format!("[{}] {}", step, source.user_friendly_message())
            }
            other => other.to_string(),
        }
    }
}

fn flatten_detail(detail: &serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(flatten_detail)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
