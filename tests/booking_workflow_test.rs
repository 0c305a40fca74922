use httpmock::prelude::*;
use httpmock::Method::PATCH;
use rebs_client::adapters::notify::{MemoryNotifier, ProgressCounter};
use rebs_client::domain::ports::{ApiClient, NoticeLevel};
use rebs_client::router::RouteLocation;
use rebs_client::workflow::{BookingForm, StepStatus};
use rebs_client::{AppContext, ClientConfig, ClientError, HttpApiClient};
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

fn form(value: serde_json::Value) -> BookingForm {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_create_contract_set_without_house_unit() {
    let server = MockServer::start();

    let contract = server.mock(|when, then| {
        when.method(POST).path("/contract/").json_body_partial(
            r#"{"project": 1, "order_group": 5, "serial_number": "A101-5", "activation": true}"#,
        );
        then.status(201).json_body(json!({
            "pk": 31, "project": 1, "order_group": 5, "unit_type": 2,
            "serial_number": "A101-5", "activation": true
        }));
    });
    let key_unit = server.mock(|when, then| {
        when.method(PATCH)
            .path("/key-unit/9/")
            .json_body(json!({"contract": 31}));
        then.status(200)
            .json_body(json!({"pk": 9, "unit_code": "A101", "contract": 31}));
    });
    let house_unit = server.mock(|when, then| {
        when.method(PATCH).path_contains("/house-unit/");
        then.status(200).json_body(json!({"pk": 1}));
    });
    let contractor = server.mock(|when, then| {
        when.method(POST)
            .path("/contractor/")
            .json_body_partial(r#"{"contract": 31, "name": "홍길동", "status": "2"}"#);
        then.status(201).json_body(json!({
            "pk": 41, "contract": 31, "name": "홍길동", "status": "2"
        }));
    });
    let address = server.mock(|when, then| {
        when.method(POST).path("/contractor-address/");
        then.status(201).json_body(json!({"pk": 61}));
    });
    let contact = server.mock(|when, then| {
        when.method(POST)
            .path("/contractor-contact/")
            .json_body_partial(r#"{"contractor": 41, "cell_phone": "010-1234-5678"}"#);
        then.status(201).json_body(json!({
            "pk": 51, "contractor": 41, "cell_phone": "010-1234-5678"
        }));
    });
    let payment = server.mock(|when, then| {
        when.method(POST).path("/project-cashbook/");
        then.status(201).json_body(json!({"pk": 71}));
    });
    let refresh = server.mock(|when, then| {
        when.method(GET)
            .path("/contract-set/")
            .query_param("project", "1")
            .query_param("contractor__status", "2");
        then.status(200).json_body(json!({"count": 1, "results": [
            {"pk": 31, "project": 1, "order_group": 5, "unit_type": 2, "serial_number": "A101-5"}
        ]}));
    });

    let (mut ctx, notifier) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5,12", "unit_type": 2, "key_unit": "9,A101",
        "name": "홍길동", "status": "2", "cell_phone": "010-1234-5678"
    }));

    let outcome = ctx.booking().create_contract_set(&booking).await.unwrap();

    contract.assert_hits(1);
    key_unit.assert_hits(1);
    house_unit.assert_hits(0);
    contractor.assert_hits(1);
    address.assert_hits(0);
    contact.assert_hits(1);
    payment.assert_hits(0);
    refresh.assert();

    assert_eq!(outcome.contract.pk, Some(31));
    assert_eq!(outcome.contractor.pk, Some(41));
    assert!(outcome.redirect.is_none());
    assert!(outcome
        .steps
        .iter()
        .any(|s| s.name == "link_house_unit" && matches!(s.status, StepStatus::Skipped(_))));
    assert_eq!(ctx.contracts.contract_list.len(), 1);
    assert_eq!(notifier.count(NoticeLevel::Success), 1);
}

#[tokio::test]
async fn test_create_contract_set_posts_payment_with_deal_date() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/contract/");
        then.status(201)
            .json_body(json!({"pk": 32, "project": 1, "order_group": 5, "unit_type": 2}));
    });
    server.mock(|when, then| {
        when.method(PATCH).path("/key-unit/9/");
        then.status(200).json_body(json!({"pk": 9, "contract": 32}));
    });
    let house_unit = server.mock(|when, then| {
        when.method(PATCH)
            .path("/house-unit/15/")
            .json_body(json!({"key_unit": 9}));
        then.status(200).json_body(json!({"pk": 15, "key_unit": 9}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/contractor/");
        then.status(201).json_body(json!({"pk": 42, "contract": 32, "name": "김철수"}));
    });
    let payment = server.mock(|when, then| {
        when.method(POST).path("/project-cashbook/").json_body_partial(
            r#"{
                "project": 1, "sort": 1, "project_account_d1": 12, "project_account_d2": 12,
                "is_contract_payment": true, "contract": 32, "income": 10000000,
                "content": "김철수[A101-5 대금납부]", "deal_date": "2024-01-05"
            }"#,
        );
        then.status(201).json_body(json!({"pk": 72, "project": 1}));
    });

    let (mut ctx, _) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5,12", "unit_type": 2, "key_unit": "9,A101",
        "houseunit": 15, "name": "김철수", "status": "2",
        "deal_date": "2024-01-05", "income": 10000000, "bank_account": 3
    }));

    ctx.booking().create_contract_set(&booking).await.unwrap();

    house_unit.assert_hits(1);
    payment.assert_hits(1);
}

#[tokio::test]
async fn test_failed_step_rolls_back_created_records() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/contract/");
        then.status(201)
            .json_body(json!({"pk": 33, "project": 1, "order_group": 5, "unit_type": 2}));
    });
    server.mock(|when, then| {
        when.method(PATCH)
            .path("/key-unit/9/")
            .json_body(json!({"contract": 33}));
        then.status(200).json_body(json!({"pk": 9, "contract": 33}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/contractor/");
        then.status(201).json_body(json!({"pk": 43, "contract": 33}));
    });
    let contact = server.mock(|when, then| {
        when.method(POST).path("/contractor-contact/");
        then.status(400)
            .json_body(json!({"cell_phone": ["올바른 형식이 아닙니다."]}));
    });
    let undo_contractor = server.mock(|when, then| {
        when.method(DELETE).path("/contractor/43/");
        then.status(204);
    });
    let undo_key_unit = server.mock(|when, then| {
        when.method(PATCH)
            .path("/key-unit/9/")
            .json_body(json!({"contract": null}));
        then.status(200).json_body(json!({"pk": 9, "contract": null}));
    });
    let undo_contract = server.mock(|when, then| {
        when.method(DELETE).path("/contract/33/");
        then.status(204);
    });

    let (mut ctx, notifier) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5,12", "key_unit": "9,A101",
        "name": "이영희", "cell_phone": "010-bad"
    }));

    let err = ctx.booking().create_contract_set(&booking).await.unwrap_err();

    contact.assert_hits(1);
    undo_contractor.assert_hits(1);
    undo_key_unit.assert_hits(1);
    undo_contract.assert_hits(1);
    match err {
        ClientError::WorkflowAborted { step, source, .. } => {
            assert_eq!(step, "create_contact");
            assert_eq!(source.status(), Some(400));
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(notifier.count(NoticeLevel::Danger), 1);
}

#[tokio::test]
async fn test_invalid_reference_sends_nothing() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.path_contains("/");
        then.status(200).json_body(json!({}));
    });

    let (mut ctx, notifier) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5", "key_unit": "9,A101", "name": "박민수"
    }));

    let err = ctx.booking().create_contract_set(&booking).await.unwrap_err();

    assert!(matches!(err, ClientError::InvalidReference { .. }));
    any.assert_hits(0);
    assert_eq!(notifier.count(NoticeLevel::Danger), 1);
}

#[tokio::test]
async fn test_update_without_deal_date_skips_cash_book() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/contract/31/");
        then.status(200)
            .json_body(json!({"pk": 31, "project": 1, "order_group": 5, "unit_type": 2}));
    });
    let key_unit = server.mock(|when, then| {
        when.method(PATCH).path_contains("/key-unit/");
        then.status(200).json_body(json!({"pk": 9}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/contractor/41/");
        then.status(200).json_body(json!({"pk": 41, "contract": 31}));
    });
    let contact = server.mock(|when, then| {
        when.method(PUT)
            .path("/contractor-contact/51/")
            .json_body_partial(r#"{"pk": 51, "contractor": 41, "cell_phone": "010-9999-0000"}"#);
        then.status(200).json_body(json!({"pk": 51, "contractor": 41}));
    });
    let cash_post = server.mock(|when, then| {
        when.method(POST).path("/project-cashbook/");
        then.status(201).json_body(json!({"pk": 1}));
    });
    let cash_put = server.mock(|when, then| {
        when.method(PUT).path_contains("/project-cashbook/");
        then.status(200).json_body(json!({"pk": 1}));
    });

    let (mut ctx, _) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5,12", "unit_type": 2, "key_unit": "9,A101",
        "name": "홍길동", "status": "2", "cell_phone": "010-9999-0000",
        "pk": 31, "cont_keyunit": 9, "contractorPk": 41, "contactPk": 51, "paymentPk": 71
    }));

    let outcome = ctx.booking().update_contract_set(&booking).await.unwrap();

    key_unit.assert_hits(0);
    contact.assert_hits(1);
    cash_post.assert_hits(0);
    cash_put.assert_hits(0);
    assert_eq!(
        outcome.redirect,
        Some(RouteLocation::named("계약등록 관리").with_query("contract", 31))
    );
}

#[tokio::test]
async fn test_update_with_deal_date_and_no_payment_creates_entry() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/contract/31/");
        then.status(200)
            .json_body(json!({"pk": 31, "project": 1, "order_group": 5, "unit_type": 2}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/contractor/41/");
        then.status(200).json_body(json!({"pk": 41, "contract": 31}));
    });
    let cash_post = server.mock(|when, then| {
        when.method(POST)
            .path("/project-cashbook/")
            .json_body_partial(r#"{"contract": 31, "deal_date": "2024-02-01"}"#);
        then.status(201).json_body(json!({"pk": 73}));
    });
    let cash_put = server.mock(|when, then| {
        when.method(PUT).path_contains("/project-cashbook/");
        then.status(200).json_body(json!({"pk": 73}));
    });

    let (mut ctx, _) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5,12", "unit_type": 2, "key_unit": "9,A101",
        "name": "홍길동", "pk": 31, "cont_keyunit": 9, "contractorPk": 41,
        "deal_date": "2024-02-01", "income": 5000000
    }));

    ctx.booking().update_contract_set(&booking).await.unwrap();

    cash_post.assert_hits(1);
    cash_put.assert_hits(0);
}

#[tokio::test]
async fn test_update_keeps_address_and_contact_without_trigger_fields() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/contract/31/");
        then.status(200)
            .json_body(json!({"pk": 31, "project": 1, "order_group": 5, "unit_type": 2}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/contractor/41/");
        then.status(200).json_body(json!({"pk": 41, "contract": 31}));
    });
    let address = server.mock(|when, then| {
        when.path_contains("/contractor-address/");
        then.status(200).json_body(json!({"pk": 61}));
    });
    let contact = server.mock(|when, then| {
        when.path_contains("/contractor-contact/");
        then.status(400)
            .json_body(json!({"cell_phone": ["This field may not be blank."]}));
    });

    let (mut ctx, _) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5,12", "unit_type": 2, "key_unit": "9,A101",
        "name": "홍길동", "pk": 31, "cont_keyunit": 9,
        "contractorPk": 41, "contactPk": 51, "addressPk": 61
    }));

    let outcome = ctx.booking().update_contract_set(&booking).await.unwrap();

    address.assert_hits(0);
    contact.assert_hits(0);
    for step in ["update_address", "update_contact"] {
        assert!(outcome
            .steps
            .iter()
            .any(|s| s.name == step && matches!(s.status, StepStatus::Skipped(_))));
    }
}

#[tokio::test]
async fn test_update_key_unit_change_relinks_units() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/contract/31/");
        then.status(200)
            .json_body(json!({"pk": 31, "project": 1, "order_group": 5, "unit_type": 2}));
    });
    let unlink_house = server.mock(|when, then| {
        when.method(PATCH)
            .path("/house-unit/14/")
            .json_body(json!({"key_unit": null}));
        then.status(200).json_body(json!({"pk": 14}));
    });
    let unlink_key = server.mock(|when, then| {
        when.method(PATCH)
            .path("/key-unit/8/")
            .json_body(json!({"contract": null}));
        then.status(200).json_body(json!({"pk": 8}));
    });
    let link_key = server.mock(|when, then| {
        when.method(PATCH)
            .path("/key-unit/9/")
            .json_body(json!({"contract": 31}));
        then.status(200).json_body(json!({"pk": 9, "contract": 31}));
    });
    let link_house = server.mock(|when, then| {
        when.method(PATCH)
            .path("/house-unit/15/")
            .json_body(json!({"key_unit": 9}));
        then.status(200).json_body(json!({"pk": 15, "key_unit": 9}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/contractor/41/");
        then.status(200).json_body(json!({"pk": 41, "contract": 31}));
    });

    let (mut ctx, _) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5,12", "unit_type": 2, "key_unit": "9,A101",
        "houseunit": 15, "name": "홍길동", "pk": 31, "cont_keyunit": 8,
        "cont_houseunit": 14, "contractorPk": 41
    }));

    ctx.booking().update_contract_set(&booking).await.unwrap();

    unlink_house.assert_hits(1);
    unlink_key.assert_hits(1);
    link_key.assert_hits(1);
    link_house.assert_hits(1);
}

#[tokio::test]
async fn test_update_requires_existing_keys() {
    let server = MockServer::start();
    let (mut ctx, _) = context(&server);
    let booking = form(json!({
        "project": 1, "order_group": "5,12", "key_unit": "9,A101", "pk": 31
    }));

    let err = ctx.booking().update_contract_set(&booking).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));
}
