use crate::config::toml_config::ClientConfig;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "rebs")]
#[command(about = "Command line client for the REBS real-estate back office API")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "rebs.toml")]
    pub config: PathBuf,

    /// Override the API base URL from config
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List contracts of a project
    Contracts(ContractsArgs),
    /// Register a new contract from a JSON form file
    Book {
        /// Booking form (JSON)
        form: PathBuf,
    },
    /// Update an existing contract from a JSON form file
    UpdateBooking {
        form: PathBuf,
    },
    /// Contract release records
    #[command(subcommand)]
    Release(ReleaseCommand),
    /// List company staff
    Staff(StaffArgs),
    /// List project cash book entries
    Cashbook(CashbookArgs),
    /// List schedules of a month (YYYY-MM)
    Schedule {
        month: Option<String>,
    },
    /// Print the navigation menu visible to a user profile (JSON)
    Menu {
        /// User profile (JSON); anonymous when omitted
        #[arg(long)]
        user: Option<PathBuf>,
        /// Mark the menu entry for this path active
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct ContractsArgs {
    #[arg(long)]
    pub project: i64,
    #[arg(long)]
    pub order_group: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub page: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum ReleaseCommand {
    /// Create a release record (JSON)
    Create { record: PathBuf },
    /// Update a release record (JSON)
    Update {
        pk: i64,
        record: PathBuf,
        #[arg(long, default_value = "1")]
        page: u64,
    },
    /// Release a contractor directly
    Run {
        contractor: i64,
        #[arg(long)]
        completion_date: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct StaffArgs {
    #[arg(long)]
    pub company: Option<i64>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub page: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CashbookArgs {
    #[arg(long)]
    pub project: i64,
    #[arg(long)]
    pub from_date: Option<String>,
    #[arg(long)]
    pub to_date: Option<String>,
    #[arg(long)]
    pub contract: Option<i64>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub page: Option<u64>,
}

impl CliConfig {
    /// 讀取設定檔；檔案不存在但有 `--base-url` 時使用預設值
    pub fn load_client_config(&self) -> Result<ClientConfig> {
        let mut config = match (Path::new(&self.config).exists(), &self.base_url) {
            (false, Some(url)) => ClientConfig::for_base_url(url.clone()),
            _ => ClientConfig::from_file(&self.config)?,
        };
        if let Some(url) = &self.base_url {
            tracing::info!("🔧 base URL overridden to: {}", url);
            config.api.base_url = url.clone();
        }
        Ok(config)
    }
}
