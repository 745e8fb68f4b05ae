//! Shared test utilities for integration tests.
//!
//! Provides a connectivity-only `MockSqlStorage` plus helpers that build the
//! router over the in-memory merchant user storage.

use merchant_admin_services::{
    config::Config,
    database::SqlStorage,
    merchant_users::{MerchantUserRecord, MockMerchantUserStorage},
    routes,
};

/// Merchant whose users the fixtures describe.
#[allow(dead_code)]
pub const TEST_MERCHANT_ID: i32 = 5;

/// Mock SQL storage for the health check.
#[derive(Clone)]
pub struct MockSqlStorage {
    pub is_connected: bool,
}

impl MockSqlStorage {
    pub fn new() -> Self {
        Self { is_connected: true }
    }

    #[allow(dead_code)]
    pub fn disconnected() -> Self {
        Self {
            is_connected: false,
        }
    }
}

impl Default for MockSqlStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlStorage for MockSqlStorage {
    async fn is_connected(&self) -> bool {
        self.is_connected
    }
}

/// Builds a merchant user record with derived name fields.
#[allow(dead_code)]
pub fn merchant_user(
    id: i32,
    merchant_id: i32,
    username: &str,
    first_name: &str,
    last_name: &str,
    status: i16,
) -> MerchantUserRecord {
    MerchantUserRecord {
        id_merchant_user: id,
        fk_merchant: merchant_id,
        fk_user: 1000 + id,
        username: username.to_owned(),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        status,
    }
}

/// Users of merchant 5 plus one user of another merchant.
#[allow(dead_code)]
pub fn seeded_storage() -> MockMerchantUserStorage {
    MockMerchantUserStorage::with_records([
        merchant_user(1, TEST_MERCHANT_ID, "anna@shop.test", "Anna", "Berg", 0),
        merchant_user(2, TEST_MERCHANT_ID, "bruno@shop.test", "Bruno", "Alt", 1),
        merchant_user(3, 7, "other@shop.test", "Olga", "Other", 0),
        merchant_user(4, TEST_MERCHANT_ID, "clara@shop.test", "Clara", "Zorn", 0),
        merchant_user(5, TEST_MERCHANT_ID, "dieter@shop.test", "Dieter", "Mann", 2),
    ])
}

/// Create the test app router with default test configuration.
pub async fn create_test_app(
    sql_storage: MockSqlStorage,
    merchant_user_storage: MockMerchantUserStorage,
) -> axum::Router {
    routes(sql_storage, merchant_user_storage, Config::new_for_test()).await
}
