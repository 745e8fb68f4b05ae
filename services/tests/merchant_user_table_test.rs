mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{MockSqlStorage, TEST_MERCHANT_ID, create_test_app, seeded_storage};
use merchant_admin_services::merchant_users::MockMerchantUserStorage;
use serde_json::Value;

async fn server() -> TestServer {
    let app = create_test_app(MockSqlStorage::new(), seeded_storage()).await;
    TestServer::new(app).unwrap()
}

fn ids(json: &Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_configuration_describes_columns() {
    let server = server().await;

    let response = server
        .get("/merchant-user-gui/index/configuration")
        .add_query_param("merchant-id", TEST_MERCHANT_ID)
        .await;
    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(
        json["headers"],
        serde_json::json!({
            "id": "Merchant User Id",
            "username": "E-mail",
            "first_name": "First Name",
            "last_name": "Last Name",
            "status": "Status",
            "actions": "Actions"
        })
    );
    assert_eq!(
        json["sortable"],
        serde_json::json!(["username", "first_name", "last_name", "status"])
    );
    assert_eq!(json["searchable"], serde_json::json!(["username", "status"]));
    assert_eq!(json["raw_columns"], serde_json::json!(["status", "actions"]));
    assert_eq!(json["base_url"], "/merchant-user-gui/index");
    assert_eq!(json["url"], "table?merchant-id=5");
    assert_eq!(json["page_length"], 10);
}

#[tokio::test]
async fn test_default_request_returns_all_merchant_users_by_id_desc() {
    let server = server().await;

    let json = server
        .get("/merchant-user-gui/index/table?merchant-id=5")
        .await
        .json::<Value>();

    assert_eq!(json["recordsTotal"], 4);
    assert_eq!(json["recordsFiltered"], 4);
    assert_eq!(ids(&json), [5, 4, 2, 1]);
}

#[tokio::test]
async fn test_active_user_row() {
    let server = server().await;

    let json = server
        .get("/merchant-user-gui/index/table?merchant-id=5&search=anna")
        .await
        .json::<Value>();

    let row = &json["data"][0];
    assert_eq!(row["id"], 1);
    assert_eq!(row["username"], "anna@shop.test");
    assert_eq!(row["first_name"], "Anna");
    assert_eq!(row["last_name"], "Berg");
    assert_eq!(
        row["status"],
        r#"<span class="label label-info">Active</span>"#
    );

    let actions = row["actions"].as_str().unwrap();
    let edit = actions.find(">Edit</a>").expect("edit link");
    let toggle = actions.find("Deny Access</a>").expect("toggle button");
    assert!(edit < toggle);
    assert_eq!(actions.matches("<a ").count(), 2);
    assert!(actions.contains(
        "/merchant-user-gui/merchant-user-status?merchant-user-id=1&amp;merchant-id=5&amp;status=blocked"
    ));
}

#[tokio::test]
async fn test_blocked_and_deleted_rows() {
    let server = server().await;

    let json = server
        .get("/merchant-user-gui/index/table?merchant-id=5&sort=status&direction=asc")
        .await
        .json::<Value>();

    assert_eq!(ids(&json), [1, 4, 2, 5]);

    let blocked = &json["data"][2];
    assert_eq!(
        blocked["status"],
        r#"<span class="label label-danger">Blocked</span>"#
    );
    assert!(blocked["actions"].as_str().unwrap().contains("Activate</a>"));
    assert!(blocked["actions"].as_str().unwrap().contains("btn-create"));

    let deleted = &json["data"][3];
    assert_eq!(deleted["status"], "");
    assert!(deleted["actions"].as_str().unwrap().contains("status=active"));
}

#[tokio::test]
async fn test_search_filters_by_status_text() {
    let server = server().await;

    let json = server
        .get("/merchant-user-gui/index/table?merchant-id=5&search=blocked")
        .await
        .json::<Value>();

    assert_eq!(json["recordsTotal"], 4);
    assert_eq!(json["recordsFiltered"], 1);
    assert_eq!(ids(&json), [2]);
}

#[tokio::test]
async fn test_sort_and_paging() {
    let server = server().await;

    let json = server
        .get("/merchant-user-gui/index/table")
        .add_query_param("merchant-id", TEST_MERCHANT_ID)
        .add_query_param("sort", "last_name")
        .add_query_param("direction", "asc")
        .add_query_param("start", 1)
        .add_query_param("length", 2)
        .await
        .json::<Value>();

    // Alt, Berg, Mann, Zorn
    assert_eq!(ids(&json), [1, 5]);
    assert_eq!(json["recordsFiltered"], 4);
}

#[tokio::test]
async fn test_unsortable_column_uses_default_sort() {
    let server = server().await;

    let json = server
        .get("/merchant-user-gui/index/table?merchant-id=5&sort=actions&direction=asc")
        .await
        .json::<Value>();

    assert_eq!(ids(&json), [5, 4, 2, 1]);
}

#[tokio::test]
async fn test_other_merchant_is_isolated() {
    let server = server().await;

    let json = server
        .get("/merchant-user-gui/index/table?merchant-id=7")
        .await
        .json::<Value>();
    assert_eq!(ids(&json), [3]);

    let json = server
        .get("/merchant-user-gui/index/table?merchant-id=404")
        .await
        .json::<Value>();
    assert_eq!(json["recordsTotal"], 0);
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_direction_is_rejected() {
    let server = server().await;

    let response = server
        .get("/merchant-user-gui/index/table?merchant-id=5&direction=sideways")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = create_test_app(
        MockSqlStorage::new(),
        MockMerchantUserStorage::failing("connection refused"),
    )
    .await;
    let server = TestServer::new(app).unwrap();

    let response = server
        .get("/merchant-user-gui/index/table?merchant-id=5")
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let json = response.json::<Value>();
    assert_eq!(json["error"], "storage_error");
    assert_eq!(json["message"], "Storage error: connection refused");
}
