// 側邊選單：依權限裁切並標記目前位置

use crate::router::ResolvedRoute;
use crate::utils::query::decode_uri;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuKind {
    #[serde(rename = "CNavItem")]
    Item,
    #[serde(rename = "CNavTitle")]
    Title,
    #[serde(rename = "CNavGroup")]
    Group,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub component: MenuKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuItem>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub active: bool,
}

impl MenuItem {
    fn item(name: &str, to: &str, icon: &str) -> Self {
        Self {
            component: MenuKind::Item,
            name: name.to_string(),
            to: Some(to.to_string()),
            icon: Some(icon.to_string()),
            badge: None,
            items: Vec::new(),
            active: false,
        }
    }

    fn link(name: &str, to: &str) -> Self {
        Self {
            icon: None,
            ..Self::item(name, to, "")
        }
    }

    fn title(name: &str) -> Self {
        Self {
            component: MenuKind::Title,
            to: None,
            icon: None,
            ..Self::link(name, "")
        }
    }

    fn group(name: &str, to: &str, icon: &str, items: Vec<MenuItem>) -> Self {
        Self {
            component: MenuKind::Group,
            items,
            ..Self::item(name, to, icon)
        }
    }

    fn badged(mut self, badge: &str) -> Self {
        self.badge = Some(badge.to_string());
        self
    }
}

/// 完整選單（裁切前）
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::item("대 시 보 드", "/dashboard", "cil-speedometer"),
        MenuItem::item("일 정 관 리", "/schedule", "cil-calendar"),
        MenuItem::item("관리자 페이지", "/admin/", "cil-settings").badged("admin"),
        MenuItem::title("본사 관리"),
        MenuItem::group(
            "본사 자금 관리",
            "/cash",
            "cil-dollar",
            vec![
                MenuItem::link("본사 자금 현황", "/cash/status"),
                MenuItem::link("본사 출납 내역", "/cash/index"),
            ],
        ),
        MenuItem::group(
            "본사 문서 관리",
            "/docs",
            "cil-folder-open",
            vec![
                MenuItem::link("본사 일반 문서", "/docs/general/docs"),
                MenuItem::link("본사 소송 문서", "/docs/lawsuit/docs"),
                MenuItem::link("본사 소송 사건", "/docs/lawsuit/case"),
            ],
        ),
        MenuItem::group(
            "본사 인사 관리",
            "/hr-manage",
            "cil-people",
            vec![
                MenuItem::link("직원 정보 관리", "/hr-manage/staff"),
                MenuItem::link("부서 정보 관리", "/hr-manage/department"),
                MenuItem::link("직위 정보 관리", "/hr-manage/position"),
                MenuItem::link("직책 정보 관리", "/hr-manage/duty"),
                MenuItem::link("직급 정보 관리", "/hr-manage/grade"),
            ],
        ),
        MenuItem::title("현장 관리"),
        MenuItem::group(
            "분양 계약 관리",
            "/contracts",
            "cil-file",
            vec![
                MenuItem::link("계약 내역 조회", "/contracts/index"),
                MenuItem::link("계약등록 관리", "/contracts/register"),
                MenuItem::link("계약 해지 관리", "/contracts/release"),
                MenuItem::link("권리 의무 승계", "/contracts/succession"),
                MenuItem::link("동호 배치 현황", "/contracts/status"),
            ],
        ),
        MenuItem::group(
            "분양 수납 관리",
            "/payments",
            "cil-credit-card",
            vec![
                MenuItem::link("수납 내역 조회", "/payments/index"),
                MenuItem::link("건별 수납 관리", "/payments/register"),
                MenuItem::link("수납 현황 집계", "/payments/status"),
            ],
        ),
        MenuItem::group(
            "고객 고지 관리",
            "/notices",
            "cil-bullhorn",
            vec![
                MenuItem::link("수납 고지서 출력", "/notices/bill"),
                MenuItem::link("SMS 발송 관리", "/notices/sms"),
                MenuItem::link("발송 기록 관리", "/notices/log"),
            ],
        ),
        MenuItem::group(
            "현장 자금 관리",
            "/project-cash",
            "cil-money",
            vec![
                MenuItem::link("현장 자금 현황", "/project-cash/status"),
                MenuItem::link("현장 출납 내역", "/project-cash/index"),
                MenuItem::link("운영비용(전도금)", "/project-cash/imprest"),
            ],
        ),
        MenuItem::group(
            "현장 문서 관리",
            "/project-docs",
            "cil-library",
            vec![
                MenuItem::link("현장 일반 문서", "/project-docs/general/docs"),
                MenuItem::link("현장 소송 문서", "/project-docs/lawsuit/docs"),
                MenuItem::link("현장 소송 사건", "/project-docs/lawsuit/case"),
            ],
        ),
        MenuItem::group(
            "신규 프로젝트",
            "/project",
            "cil-building",
            vec![
                MenuItem::link("프로젝트 관리", "/project/manage/index"),
                MenuItem::link("타입 정보 등록", "/project/settings/unit"),
                MenuItem::link("사업 부지 관리", "/project/site/index"),
            ],
        ),
        MenuItem::title("환경 설정"),
        MenuItem::group(
            "환경 설정",
            "/settings",
            "cil-cog",
            vec![
                MenuItem::link("회사 정보 관리", "/settings/company"),
                MenuItem::link("권한 설정 관리", "/settings/authorization"),
            ],
        ),
    ]
}

/// 「현장 관리」下的專案選單數
const PROJECT_MENUS: usize = 6;

fn remove_range(menu: &mut Vec<MenuItem>, start: usize, len: usize) {
    let start = start.min(menu.len());
    let end = (start + len).min(menu.len());
    menu.drain(start..end);
}

/// 依使用者身分移除選單區塊（依固定位置與位移）
pub fn filter_menu(mut menu: Vec<MenuItem>, is_super: bool, is_staff: bool, is_cash: bool) -> Vec<MenuItem> {
    if !is_super {
        remove_range(&mut menu, 2, 1);
    }
    let wm = if is_super { 3 } else { 2 };

    if !is_staff {
        remove_range(&mut menu, wm, 4);
        remove_range(&mut menu, wm + PROJECT_MENUS + 1, 2);
    } else if !is_cash {
        remove_range(&mut menu, wm + 1, 1);
    }
    menu
}

/// 解碼後去掉 `#...` 與 `index.html` / `.html` 結尾
pub fn normalize_path(path: &str) -> String {
    let decoded = decode_uri(path);
    let without_hash = decoded.split('#').next().unwrap_or_default();
    without_hash
        .strip_suffix("index.html")
        .or_else(|| without_hash.strip_suffix(".html"))
        .unwrap_or(without_hash)
        .to_string()
}

/// 目前畫面的位置資訊
#[derive(Debug, Clone, Copy)]
pub struct CurrentRoute<'a> {
    pub path: &'a str,
    pub hash: &'a str,
    pub title: Option<&'a str>,
}

impl<'a> From<&'a ResolvedRoute> for CurrentRoute<'a> {
    fn from(route: &'a ResolvedRoute) -> Self {
        Self {
            path: &route.path,
            hash: "",
            title: route.meta.title.as_deref(),
        }
    }
}

pub fn is_active_link(route: &CurrentRoute<'_>, link: &str) -> bool {
    if !route.hash.is_empty() && route.hash == link {
        return true;
    }
    normalize_path(link) == normalize_path(route.path)
}

pub fn is_active_item(route: &CurrentRoute<'_>, item: &MenuItem) -> bool {
    item.to.as_deref().is_some_and(|to| is_active_link(route, to))
        || item.items.iter().any(|child| is_active_item(route, child))
        || route.title == Some(item.name.as_str())
}

/// 遞迴設定 `active`
pub fn mark_active(items: &mut [MenuItem], route: &CurrentRoute<'_>) {
    for item in items.iter_mut() {
        mark_active(&mut item.items, route);
        item.active = is_active_item(route, item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(menu: &[MenuItem]) -> Vec<&str> {
        menu.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_superuser_sees_everything() {
        let menu = filter_menu(default_menu(), true, true, true);
        assert_eq!(menu.len(), 16);
        assert_eq!(menu[2].name, "관리자 페이지");
    }

    #[test]
    fn test_staff_without_cash_loses_company_cash() {
        let menu = filter_menu(default_menu(), false, true, false);
        let names = names(&menu);
        assert_eq!(menu.len(), 14);
        assert!(!names.contains(&"관리자 페이지"));
        assert!(!names.contains(&"본사 자금 관리"));
        assert!(names.contains(&"본사 인사 관리"));
        assert!(names.contains(&"환경 설정"));
    }

    #[test]
    fn test_non_staff_keeps_only_project_menus() {
        let menu = filter_menu(default_menu(), false, false, false);
        assert_eq!(
            names(&menu),
            vec![
                "대 시 보 드",
                "일 정 관 리",
                "현장 관리",
                "분양 계약 관리",
                "분양 수납 관리",
                "고객 고지 관리",
                "현장 자금 관리",
                "현장 문서 관리",
                "신규 프로젝트",
            ]
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/contracts/index.html"), "/contracts/");
        assert_eq!(normalize_path("/docs/page.html#top"), "/docs/page");
        assert_eq!(normalize_path("/%EA%B3%84%EC%95%BD"), "/계약");
    }

    #[test]
    fn test_mark_active_propagates_to_group() {
        let mut menu = default_menu();
        let route = CurrentRoute {
            path: "/contracts/release",
            hash: "",
            title: Some("계약 해지 관리"),
        };
        mark_active(&mut menu, &route);

        let contracts = menu.iter().find(|m| m.name == "분양 계약 관리").unwrap();
        assert!(contracts.active);
        assert!(contracts.items.iter().any(|c| c.active && c.to.as_deref() == Some("/contracts/release")));
        assert!(!menu[0].active);
    }

    #[test]
    fn test_active_by_hash_and_title() {
        let by_hash = CurrentRoute {
            path: "/",
            hash: "/schedule",
            title: None,
        };
        assert!(is_active_link(&by_hash, "/schedule"));

        let by_title = CurrentRoute {
            path: "/dashboard/notices/3",
            hash: "",
            title: Some("대 시 보 드"),
        };
        let dashboard = &default_menu()[0];
        assert!(is_active_item(&by_title, dashboard));
    }
}
