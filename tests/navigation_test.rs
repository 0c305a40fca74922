use rebs_client::domain::model::UserInfo;
use rebs_client::router::{Navigation, RouteLocation, LOGIN, NO_AUTH_VIEW};
use rebs_client::{AppContext, ClientConfig};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn context_from_file() -> AppContext {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[api]
base_url = "http://localhost:8000/api/v1"
timeout_seconds = 5

[pagination]
page_size = 15
"#
    )
    .unwrap();
    let config = ClientConfig::from_file(file.path()).unwrap();
    AppContext::new(config).unwrap()
}

fn user(value: serde_json::Value) -> UserInfo {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_session_lifecycle_drives_guard_and_menu() {
    let mut ctx = context_from_file();
    assert_eq!(ctx.page_size(), 15);

    // 未登入：導向登入頁並保留原路徑
    match ctx.navigate(&RouteLocation::path("/project-cash/index")).unwrap() {
        Navigation::Render(route) => {
            assert_eq!(route.name, LOGIN);
            assert_eq!(route.query_value("redirect"), Some("/project-cash/index"));
        }
        other => panic!("unexpected {:?}", other),
    }

    ctx.sign_in(user(json!({
        "pk": 3,
        "username": "site",
        "staffauth": {"company": 2, "is_staff": false, "contract": "1", "project_cash": "0"}
    })));
    assert_eq!(ctx.com_id(), 2);

    match ctx.navigate(&RouteLocation::path("/project-cash/index")).unwrap() {
        Navigation::Render(route) => assert_eq!(route.view.as_deref(), Some(NO_AUTH_VIEW)),
        other => panic!("unexpected {:?}", other),
    }
    match ctx.navigate(&RouteLocation::path("/contracts/release")).unwrap() {
        Navigation::Render(route) => {
            assert_eq!(route.view.as_deref(), Some("Contracts/Release"))
        }
        other => panic!("unexpected {:?}", other),
    }

    let menu = ctx.menu();
    let names = menu.iter().map(|m| m.name.as_str()).collect::<Vec<_>>();
    assert!(!names.contains(&"본사 관리"));
    assert!(!names.contains(&"환경 설정"));
    assert!(menu
        .iter()
        .find(|m| m.name == "분양 계약 관리")
        .is_some_and(|m| m.active));

    ctx.sign_out();
    assert!(matches!(
        ctx.navigate(&RouteLocation::path("/dashboard")).unwrap(),
        Navigation::Render(ref r) if r.name == LOGIN
    ));
}

#[test]
fn test_superuser_menu_and_catch_all() {
    let mut ctx = context_from_file();
    ctx.sign_in(user(json!({"pk": 1, "username": "admin", "is_superuser": true})));

    assert_eq!(ctx.menu().len(), 16);

    match ctx.navigate(&RouteLocation::path("/")).unwrap() {
        Navigation::Render(route) => assert_eq!(route.path, "/dashboard"),
        other => panic!("unexpected {:?}", other),
    }
    match ctx.navigate(&RouteLocation::path("/no-such-page")).unwrap() {
        Navigation::Render(route) => {
            assert_eq!(route.view.as_deref(), Some("NotFound"));
            assert_eq!(route.params.get("pathMatch").map(String::as_str), Some("no-such-page"));
        }
        other => panic!("unexpected {:?}", other),
    }
}
