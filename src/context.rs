use crate::adapters::http::HttpApiClient;
use crate::adapters::notify::{ProgressCounter, TracingNotifier};
use crate::config::toml_config::ClientConfig;
use crate::domain::model::UserInfo;
use crate::domain::ports::{ApiClient, Notifier, ProgressIndicator};
use crate::nav::{self, CurrentRoute, MenuItem};
use crate::router::{Navigation, ResolvedRoute, RouteLocation, Router};
use crate::stores::{CompanyStore, ContractStore, ProCashStore, ScheduleStore};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use crate::workflow::{BookingWorkflow, ReleaseWorkflow};
use std::sync::Arc;

/// 應用程式狀態容器：共用的 API 連線、通知器與各資料倉儲
pub struct AppContext {
    pub config: ClientConfig,
    pub api: Arc<dyn ApiClient>,
    pub notifier: Arc<dyn Notifier>,

    pub contracts: ContractStore,
    pub company: CompanyStore,
    pub pro_cash: ProCashStore,
    pub schedule: ScheduleStore,

    pub user: Option<UserInfo>,
    pub router: Router,
    pub current: Option<ResolvedRoute>,
}

impl AppContext {
    /// 依設定建立 HTTP 連線與預設通知器
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let api: Arc<dyn ApiClient> = Arc::new(HttpApiClient::from_config(&config.api)?);
        Self::with_parts(
            config,
            api,
            Arc::new(TracingNotifier),
            Arc::new(ProgressCounter::default()),
        )
    }

    pub fn with_parts(
        config: ClientConfig,
        api: Arc<dyn ApiClient>,
        notifier: Arc<dyn Notifier>,
        progress: Arc<dyn ProgressIndicator>,
    ) -> Result<Self> {
        tracing::debug!("🔧 building app context for {}", config.api.base_url);
        Ok(Self {
            contracts: ContractStore::new(Arc::clone(&api)),
            company: CompanyStore::new(Arc::clone(&api)),
            pro_cash: ProCashStore::new(Arc::clone(&api)),
            schedule: ScheduleStore::new(Arc::clone(&api)),
            router: Router::new(progress)?,
            config,
            api,
            notifier,
            user: None,
            current: None,
        })
    }

    pub fn sign_in(&mut self, user: UserInfo) {
        tracing::info!("👤 signed in as {}", user.username);
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }

    pub fn page_size(&self) -> u64 {
        self.config.pagination.page_size
    }

    pub fn com_id(&self) -> i64 {
        CompanyStore::init_com_id(self.user.as_ref())
    }

    pub fn booking(&mut self) -> BookingWorkflow<'_> {
        BookingWorkflow::new(&mut self.contracts, &self.pro_cash, self.notifier.as_ref())
    }

    pub fn release(&mut self) -> ReleaseWorkflow<'_> {
        ReleaseWorkflow::new(&mut self.contracts, &self.pro_cash, self.notifier.as_ref())
    }

    /// 導航並在成功顯示時更新目前路由；轉址會一路跟隨
    pub fn navigate(&mut self, to: &RouteLocation) -> Result<Navigation> {
        let mut target = to.clone();
        // 路由表的轉址不會形成循環，但仍設上限
        for _ in 0..8 {
            match self
                .router
                .navigate(&target, self.current.as_ref(), self.user.as_ref())?
            {
                Navigation::Render(route) => {
                    self.current = Some(route.clone());
                    return Ok(Navigation::Render(route));
                }
                Navigation::Redirect(next) if next == target => {
                    return Ok(Navigation::Redirect(next));
                }
                Navigation::Redirect(next) => target = next,
            }
        }
        Ok(Navigation::Redirect(target))
    }

    /// 目前使用者可見的選單
    pub fn menu(&self) -> Vec<MenuItem> {
        let (is_super, is_staff, is_cash) = match &self.user {
            Some(u) => (u.is_superuser, u.is_staff(), u.has_company_cash()),
            None => (false, false, false),
        };
        let mut menu = nav::filter_menu(nav::default_menu(), is_super, is_staff, is_cash);
        if let Some(route) = &self.current {
            nav::mark_active(&mut menu, &CurrentRoute::from(route));
        }
        menu
    }
}
