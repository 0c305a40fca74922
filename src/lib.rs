pub mod adapters;
pub mod config;
pub mod context;
pub mod domain;
pub mod nav;
pub mod router;
pub mod stores;
pub mod utils;
pub mod workflow;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::HttpApiClient, notify::TracingNotifier};
pub use config::ClientConfig;
pub use context::AppContext;
pub use domain::ports::{ApiClient, ApiClientExt, Notifier, ProgressIndicator};
pub use utils::error::{ClientError, Result};
