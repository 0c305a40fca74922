use httpmock::prelude::*;
use httpmock::Method::PATCH;
use rebs_client::adapters::notify::{MemoryNotifier, ProgressCounter};
use rebs_client::domain::model::ContractRelease;
use rebs_client::domain::ports::{ApiClient, NoticeLevel};
use rebs_client::workflow::StepStatus;
use rebs_client::{AppContext, ClientConfig, HttpApiClient};
use serde_json::json;
use std::sync::Arc;

fn context(server: &MockServer) -> (AppContext, MemoryNotifier) {
    let notifier = MemoryNotifier::new();
    let config = ClientConfig::for_base_url(server.base_url());
    let api: Arc<dyn ApiClient> = Arc::new(HttpApiClient::new(server.base_url()));
    let ctx = AppContext::with_parts(
        config,
        api,
        Arc::new(notifier.clone()),
        Arc::new(ProgressCounter::default()),
    )
    .unwrap();
    (ctx, notifier)
}

/// 契約者 7 / 契約 31 / 契約單位 9 / 房屋單位 15，入金兩筆
fn mock_contract_graph(server: &MockServer, contractor_status: &str) {
    let status = contractor_status.to_string();
    server.mock(move |when, then| {
        when.method(GET).path("/contractor/7/");
        then.status(200).json_body(json!({
            "pk": 7, "contract": 31, "name": "홍길동", "status": status, "is_registed": true
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/contract/31/");
        then.status(200).json_body(json!({
            "pk": 31, "project": 1, "order_group": 5, "unit_type": 2,
            "serial_number": "A101-5", "activation": true, "keyunit": 9
        }));
    });
}

#[tokio::test]
async fn test_release_set_runs_every_task() {
    let server = MockServer::start();
    mock_contract_graph(&server, "2");

    let contractor_status = server.mock(|when, then| {
        when.method(PATCH)
            .path("/contractor/7/")
            .json_body(json!({"is_registed": false, "status": "4"}));
        then.status(200).json_body(json!({"pk": 7, "status": "4"}));
    });
    let terminate = server.mock(|when, then| {
        when.method(PATCH).path("/contract/31/").json_body(json!({
            "serial_number": "A101-5-terminated-2024-03-02", "activation": false
        }));
        then.status(200).json_body(json!({"pk": 31, "activation": false}));
    });
    let key_unit = server.mock(|when, then| {
        when.method(PATCH)
            .path("/key-unit/9/")
            .json_body(json!({"contract": null}));
        then.status(200)
            .json_body(json!({"pk": 9, "contract": null, "houseunit": 15}));
    });
    let house_unit = server.mock(|when, then| {
        when.method(PATCH)
            .path("/house-unit/15/")
            .json_body(json!({"key_unit": null}));
        then.status(200).json_body(json!({"pk": 15, "key_unit": null}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/project-cashbook/")
            .query_param("contract", "31");
        then.status(200).json_body(json!({"count": 2, "results": [
            {"pk": 101, "project": 1, "project_account_d1": 12, "note": "계약금"},
            {"pk": 102, "project": 1, "project_account_d1": 13, "note": ""}
        ]}));
    });
    let refund_first = server.mock(|when, then| {
        when.method(PATCH).path("/project-cashbook/101/").json_body(json!({
            "project_account_d2": 75,
            "refund_contractor": 7,
            "note": "계약금, 2024-03-02 환불건"
        }));
        then.status(200).json_body(json!({"pk": 101}));
    });
    let refund_second = server.mock(|when, then| {
        when.method(PATCH).path("/project-cashbook/102/").json_body(json!({
            "project_account_d2": 76,
            "refund_contractor": 7,
            "note": "2024-03-02 환불건"
        }));
        then.status(200).json_body(json!({"pk": 102}));
    });

    let (mut ctx, notifier) = context(&server);
    let report = ctx
        .release()
        .release_set(7, Some("2024-03-02"))
        .await
        .unwrap();

    contractor_status.assert_hits(1);
    terminate.assert_hits(1);
    key_unit.assert_hits(1);
    house_unit.assert_hits(1);
    refund_first.assert_hits(1);
    refund_second.assert_hits(1);

    assert!(report.is_complete(), "failures: {:?}", report.failures());
    assert!(!report.already_released);
    assert_eq!(report.contract, Some(31));
    assert_eq!(notifier.count(NoticeLevel::Success), 1);
    assert!(ctx.contracts.contractor.is_some());
}

#[tokio::test]
async fn test_release_set_reports_partial_failure() {
    let server = MockServer::start();
    mock_contract_graph(&server, "2");

    server.mock(|when, then| {
        when.method(PATCH).path("/contractor/7/");
        then.status(200).json_body(json!({"pk": 7, "status": "4"}));
    });
    server.mock(|when, then| {
        when.method(PATCH).path("/contract/31/");
        then.status(200).json_body(json!({"pk": 31}));
    });
    server.mock(|when, then| {
        when.method(PATCH).path("/key-unit/9/");
        then.status(500).body("server error");
    });
    let house_unit = server.mock(|when, then| {
        when.method(PATCH).path_contains("/house-unit/");
        then.status(200).json_body(json!({"pk": 15}));
    });
    let payments = server.mock(|when, then| {
        when.method(GET).path("/project-cashbook/");
        then.status(200).json_body(json!([]));
    });

    let (mut ctx, notifier) = context(&server);
    let report = ctx.release().release_set(7, None).await.unwrap();

    house_unit.assert_hits(0);
    // 前一步失敗不影響後續的入金查詢
    payments.assert_hits(1);

    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].name, "unlink_key_unit");
    assert!(report
        .steps
        .iter()
        .any(|s| s.name == "unlink_house_unit" && matches!(s.status, StepStatus::Skipped(_))));

    let warnings = notifier
        .notices()
        .into_iter()
        .filter(|n| n.level == NoticeLevel::Warning)
        .collect::<Vec<_>>();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("unlink_key_unit"));
}

#[tokio::test]
async fn test_already_released_contractor_is_left_alone() {
    let server = MockServer::start();
    mock_contract_graph(&server, "4");
    let writes = server.mock(|when, then| {
        when.method(PATCH);
        then.status(200).json_body(json!({}));
    });

    let (mut ctx, _) = context(&server);
    let report = ctx
        .release()
        .release_set(7, Some("2024-03-02"))
        .await
        .unwrap();

    writes.assert_hits(0);
    assert!(report.already_released);
}

#[tokio::test]
async fn test_update_release_already_completed_does_not_retrigger() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/contractor-release/5/");
        then.status(200).json_body(json!({
            "pk": 5, "project": 1, "contractor": 7, "status": "4",
            "completion_date": "2024-03-02"
        }));
    });
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path("/contractor-release/5/")
            .json_body_partial(r#"{"pk": 5, "status": "5", "note": "환불 완료"}"#);
        then.status(200).json_body(json!({
            "pk": 5, "project": 1, "contractor": 7, "status": "5",
            "completion_date": "2024-03-02", "note": "환불 완료"
        }));
    });
    let contractor = server.mock(|when, then| {
        when.path_contains("/contractor/");
        then.status(200).json_body(json!({"pk": 7}));
    });
    let cash = server.mock(|when, then| {
        when.path_contains("/project-cashbook/");
        then.status(200).json_body(json!([]));
    });

    let (mut ctx, notifier) = context(&server);
    let outcome = ctx
        .release()
        .update_release(
            5,
            &ContractRelease {
                pk: Some(5),
                project: 1,
                contractor: 7,
                status: 5.into(),
                completion_date: Some("2024-03-02".to_string()),
                note: "환불 완료".to_string(),
                ..ContractRelease::default()
            },
            1,
        )
        .await
        .unwrap();

    put.assert_hits(1);
    contractor.assert_hits(0);
    cash.assert_hits(0);
    assert!(outcome.report.is_none());
    assert_eq!(notifier.count(NoticeLevel::Success), 1);
}

#[tokio::test]
async fn test_create_release_at_threshold_triggers_release() {
    let server = MockServer::start();
    mock_contract_graph(&server, "1");
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/contractor-release/")
            .json_body_partial(r#"{"contractor": 7, "status": "4"}"#);
        then.status(201).json_body(json!({
            "pk": 6, "project": 1, "contractor": 7, "status": "4"
        }));
    });
    let contractor_status = server.mock(|when, then| {
        when.method(PATCH)
            .path("/contractor/7/")
            .json_body(json!({"is_registed": false, "status": "3"}));
        then.status(200).json_body(json!({"pk": 7, "status": "3"}));
    });
    let terminate = server.mock(|when, then| {
        when.method(PATCH).path("/contract/31/").json_body(json!({
            "serial_number": "A101-5-terminated", "activation": false
        }));
        then.status(200).json_body(json!({"pk": 31}));
    });
    server.mock(|when, then| {
        when.method(PATCH).path("/key-unit/9/");
        then.status(200).json_body(json!({"pk": 9, "houseunit": null}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/project-cashbook/");
        then.status(200).json_body(json!([]));
    });

    let (mut ctx, _) = context(&server);
    let outcome = ctx
        .release()
        .create_release(&ContractRelease {
            project: 1,
            contractor: 7,
            status: 4.into(),
            ..ContractRelease::default()
        })
        .await
        .unwrap();

    create.assert_hits(1);
    contractor_status.assert_hits(1);
    terminate.assert_hits(1);
    let report = outcome.report.unwrap();
    assert!(report.is_complete(), "failures: {:?}", report.failures());
}
