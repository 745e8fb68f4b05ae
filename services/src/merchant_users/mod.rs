//! Merchant user management.
//!
//! This module backs the "Users" tab of a merchant's admin page:
//! - Status codes and their labels/toggle actions
//! - The table provider (configuration and row formatting)
//! - Storage abstraction over the merchant user / user join
//! - HTTP routes serving the table configuration and data

pub mod routes;
pub mod status;
pub mod storage;
pub mod table;

use sqlx::FromRow;

/// One merchant user joined with its user row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MerchantUserRecord {
    pub id_merchant_user: i32,
    pub fk_merchant: i32,
    pub fk_user: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Raw status code from the `users` table.
    pub status: i16,
}

pub use routes::{ErrorResponse, MerchantIdQuery, merchant_user_routes};
pub use status::{StatusAction, StatusLabel, UnknownStatusCode, UserStatus};
pub use storage::{
    MerchantUserQuery, MerchantUserStorage, MerchantUserStorageError, MockMerchantUserStorage,
    PgMerchantUserStorage,
};
pub use table::{
    Column, MerchantUserTable, MerchantUserTableError, SortDirection, SortOrder, TableConfiguration,
    TableData, TableRequest, TableRow,
};
