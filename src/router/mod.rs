pub mod routes;

use crate::domain::model::UserInfo;
use crate::domain::ports::ProgressIndicator;
use crate::utils::error::{ClientError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use url::form_urlencoded;

pub use routes::{
    route_table, RouteMeta, RouteRecord, Section, LOGIN, NOT_FOUND, NO_AUTH_VIEW, PUBLIC_ROUTES,
    REGISTER, REGISTER_CODE,
};

/// Java `String.hashCode()` 相容的 32 位元雜湊（UTF-16 單位）
pub fn hash_code(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// 導航目標：以名稱或路徑指定
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteLocation {
    pub name: Option<String>,
    pub path: Option<String>,
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
}

impl RouteLocation {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// 路徑可帶查詢字串，例如 `/contracts/register?contract=3`
    pub fn path(path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, parse_query(q)),
            None => (path, Vec::new()),
        };
        Self {
            path: Some(path.to_string()),
            query,
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Display) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_query(mut self, key: &str, value: impl Display) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn parse_query(raw: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn full_path(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in query {
        serializer.append_pair(k, v);
    }
    format!("{}?{}", path, serializer.finish())
}

/// 比對成功的路由
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub name: String,
    pub path: String,
    pub full_path: String,
    pub params: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub meta: RouteMeta,
    pub view: Option<String>,
}

impl ResolvedRoute {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Render(ResolvedRoute),
    Redirect(RouteLocation),
}

struct CompiledRoute {
    record: RouteRecord,
    pattern: Regex,
    catch_all: bool,
}

/// `:name(regex)` 片段拆成 (名稱, 規則)
fn split_param(segment: &str) -> Option<(&str, Option<&str>)> {
    let body = segment.strip_prefix(':')?;
    match body.find('(') {
        Some(open) => {
            let close = body.rfind(')')?;
            Some((&body[..open], Some(&body[open + 1..close])))
        }
        None => Some((body.trim_end_matches(['*', '+', '?']), None)),
    }
}

fn compile(path: &str) -> Result<Regex> {
    let segments = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| match split_param(segment) {
            Some((name, rule)) => format!("(?P<{}>{})", name, rule.unwrap_or("[^/]+")),
            None => regex::escape(segment),
        })
        .collect::<Vec<_>>();
    let source = format!("^/{}/?$", segments.join("/"));
    Regex::new(&source).map_err(|e| ClientError::Config {
        message: format!("invalid route pattern {}: {}", path, e),
    })
}

/// 以參數填入路由樣式
fn fill_params(pattern: &str, params: &BTreeMap<String, String>) -> Result<String> {
    let mut out = Vec::new();
    for segment in pattern.split('/') {
        match split_param(segment) {
            Some((name, _)) => {
                let value = params.get(name).ok_or_else(|| ClientError::Validation {
                    message: format!("missing route param '{}' for {}", name, pattern),
                })?;
                out.push(value.clone());
            }
            None => out.push(segment.to_string()),
        }
    }
    Ok(out.join("/"))
}

/// 路由表與導航守衛
pub struct Router {
    routes: Vec<CompiledRoute>,
    progress: Arc<dyn ProgressIndicator>,
    register_code: Option<String>,
}

impl Router {
    pub fn new(progress: Arc<dyn ProgressIndicator>) -> Result<Self> {
        Self::with_routes(route_table(), progress)
    }

    pub fn with_routes(records: Vec<RouteRecord>, progress: Arc<dyn ProgressIndicator>) -> Result<Self> {
        let routes = records
            .into_iter()
            .map(|record| {
                Ok(CompiledRoute {
                    pattern: compile(&record.path)?,
                    catch_all: record.name == NOT_FOUND,
                    record,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("🧭 router ready with {} routes", routes.len());
        Ok(Self {
            routes,
            progress,
            register_code: None,
        })
    }

    /// 註冊碼驗證頁輸入的代碼
    pub fn set_register_code(&mut self, code: impl Into<String>) {
        self.register_code = Some(code.into());
    }

    pub fn records(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes.iter().map(|r| &r.record)
    }

    pub fn find(&self, name: &str) -> Option<&RouteRecord> {
        self.records().find(|r| r.name == name)
    }

    /// 目標位置轉為具體路由；萬用路由最後比對
    pub fn resolve(&self, to: &RouteLocation) -> Result<ResolvedRoute> {
        let path = match (&to.name, &to.path) {
            (Some(name), _) => {
                let record = self.find(name).ok_or_else(|| ClientError::Validation {
                    message: format!("unknown route name: {}", name),
                })?;
                fill_params(&record.path, &to.params)?
            }
            (None, Some(path)) => path.clone(),
            (None, None) => "/".to_string(),
        };

        let candidates = self
            .routes
            .iter()
            .filter(|r| !r.catch_all)
            .chain(self.routes.iter().filter(|r| r.catch_all));
        for route in candidates {
            if let Some(caps) = route.pattern.captures(&path) {
                let params = route
                    .pattern
                    .capture_names()
                    .flatten()
                    .filter_map(|n| caps.name(n).map(|m| (n.to_string(), m.as_str().to_string())))
                    .collect();
                return Ok(ResolvedRoute {
                    name: route.record.name.clone(),
                    full_path: full_path(&path, &to.query),
                    path,
                    params,
                    query: to.query.clone(),
                    meta: route.record.meta.clone(),
                    view: route.record.view.clone(),
                });
            }
        }
        Err(ClientError::Validation {
            message: format!("no route matches {}", path),
        })
    }

    /// 導航：進度指示開始 → 守衛 → 結束
    pub fn navigate(
        &self,
        to: &RouteLocation,
        from: Option<&ResolvedRoute>,
        user: Option<&UserInfo>,
    ) -> Result<Navigation> {
        self.progress.start();
        let result = self.guard(to, from, user);
        self.progress.close();
        if let Ok(Navigation::Redirect(target)) = &result {
            tracing::debug!("🧭 redirect -> {:?}", target.name.as_ref().or(target.path.as_ref()));
        }
        result
    }

    fn guard(
        &self,
        to: &RouteLocation,
        from: Option<&ResolvedRoute>,
        user: Option<&UserInfo>,
    ) -> Result<Navigation> {
        let mut target = self.resolve(to)?;

        if user.is_none() && !PUBLIC_ROUTES.contains(&target.name.as_str()) {
            return Ok(Navigation::Redirect(
                RouteLocation::named(LOGIN).with_query("redirect", &target.full_path),
            ));
        }

        let record = self.find(&target.name).ok_or_else(|| ClientError::Validation {
            message: format!("unknown route name: {}", target.name),
        })?;

        if let Some(redirect) = &record.redirect {
            return Ok(Navigation::Redirect(RouteLocation::path(redirect)));
        }

        if target.name == REGISTER && !self.register_allowed(&target, from) {
            return Ok(Navigation::Redirect(RouteLocation::named(REGISTER_CODE)));
        }

        if let Some(section) = record.section {
            if !section.permits(user) {
                target.view = Some(NO_AUTH_VIEW.to_string());
            }
        }
        Ok(Navigation::Render(target))
    }

    /// 只能從註冊碼頁進入，且 `id` 必須等於註冊碼的雜湊
    fn register_allowed(&self, target: &ResolvedRoute, from: Option<&ResolvedRoute>) -> bool {
        let from_code_page = from.is_some_and(|f| f.name == REGISTER_CODE);
        let expected = self.register_code.as_deref().map(|c| hash_code(c).to_string());
        from_code_page && expected.is_some() && target.query_value("id") == expected.as_deref()
    }
}
