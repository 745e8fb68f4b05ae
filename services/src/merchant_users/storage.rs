//! Merchant user storage trait and implementations.
//!
//! The table reads merchant users joined with their user rows. Reads go
//! through the [`MerchantUserStorage`] trait so routes can be exercised
//! against the in-memory [`MockMerchantUserStorage`].
//!
//! # Expected schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id_user    INTEGER PRIMARY KEY,
//!     username   TEXT NOT NULL,
//!     first_name TEXT NOT NULL,
//!     last_name  TEXT NOT NULL,
//!     status     SMALLINT NOT NULL  -- 0 active, 1 blocked, 2 deleted
//! );
//!
//! CREATE TABLE merchant_users (
//!     id_merchant_user INTEGER PRIMARY KEY,
//!     fk_merchant      INTEGER NOT NULL,
//!     fk_user          INTEGER NOT NULL REFERENCES users (id_user)
//! );
//! ```

use std::cmp::Ordering;
use std::future::Future;
use std::sync::{Arc, RwLock};

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::MerchantUserRecord;
use super::status::UserStatus;
use super::table::{Column, SortDirection, SortOrder};
use crate::database::PgStorage;

/// A resolved page request against one merchant's users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantUserQuery {
    pub merchant_id: i32,
    /// Case-insensitive substring matched against username or textual status.
    pub search: Option<String>,
    pub sort: SortOrder,
    pub offset: u64,
    pub limit: u32,
}

/// Error type for merchant user storage operations.
#[derive(Debug, thiserror::Error)]
pub enum MerchantUserStorageError {
    /// A database or storage error occurred.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<sqlx::Error> for MerchantUserStorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

/// Read access to merchant users joined with their users.
pub trait MerchantUserStorage: Clone + Send + Sync + 'static {
    /// Counts the merchant's users, optionally restricted by a search term.
    fn count_merchant_users(
        &self,
        merchant_id: i32,
        search: Option<&str>,
    ) -> impl Future<Output = Result<u64, MerchantUserStorageError>> + Send;

    /// Returns one sorted page of the merchant's users.
    fn find_merchant_users(
        &self,
        query: &MerchantUserQuery,
    ) -> impl Future<Output = Result<Vec<MerchantUserRecord>, MerchantUserStorageError>> + Send;
}

/// In-memory implementation of `MerchantUserStorage` for testing.
///
/// Filtering and paging follow the PostgreSQL implementation. Text columns
/// sort case-insensitively, which approximates a database collation rather
/// than reproducing it.
#[derive(Clone, Default)]
pub struct MockMerchantUserStorage {
    records: Arc<RwLock<Vec<MerchantUserRecord>>>,
    failure: Option<String>,
}

impl MockMerchantUserStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with the given records.
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = MerchantUserRecord>,
    {
        Self {
            records: Arc::new(RwLock::new(records.into_iter().collect())),
            failure: None,
        }
    }

    /// Creates a storage whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            records: Arc::default(),
            failure: Some(message.into()),
        }
    }

    /// Adds a record (builder pattern).
    pub fn with_record(self, record: MerchantUserRecord) -> Self {
        self.records.write().expect("lock poisoned").push(record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), MerchantUserStorageError> {
        match &self.failure {
            Some(message) => Err(MerchantUserStorageError::StorageError(message.clone())),
            None => Ok(()),
        }
    }

    fn matching(&self, merchant_id: i32, search: Option<&str>) -> Vec<MerchantUserRecord> {
        let needle = search.map(str::to_lowercase);
        self.records
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|record| record.fk_merchant == merchant_id)
            .filter(|record| match &needle {
                Some(needle) => {
                    let status = UserStatus::from_code(record.status)
                        .map(UserStatus::as_str)
                        .unwrap_or_default();
                    record.username.to_lowercase().contains(needle.as_str())
                        || status.contains(needle.as_str())
                }
                None => true,
            })
            .cloned()
            .collect()
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare(a: &MerchantUserRecord, b: &MerchantUserRecord, column: Column) -> Ordering {
    match column {
        Column::Username => compare_text(&a.username, &b.username),
        Column::FirstName => compare_text(&a.first_name, &b.first_name),
        Column::LastName => compare_text(&a.last_name, &b.last_name),
        Column::Status => a.status.cmp(&b.status),
        Column::Id | Column::Actions => Ordering::Equal,
    }
    .then_with(|| a.id_merchant_user.cmp(&b.id_merchant_user))
}

impl MerchantUserStorage for MockMerchantUserStorage {
    async fn count_merchant_users(
        &self,
        merchant_id: i32,
        search: Option<&str>,
    ) -> Result<u64, MerchantUserStorageError> {
        self.check_failure()?;
        Ok(self.matching(merchant_id, search).len() as u64)
    }

    async fn find_merchant_users(
        &self,
        query: &MerchantUserQuery,
    ) -> Result<Vec<MerchantUserRecord>, MerchantUserStorageError> {
        self.check_failure()?;

        let mut records = self.matching(query.merchant_id, query.search.as_deref());
        records.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort.column);
            match query.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        Ok(records
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect())
    }
}

/// PostgreSQL implementation of `MerchantUserStorage`.
#[derive(Clone)]
pub struct PgMerchantUserStorage {
    storage: PgStorage,
}

impl PgMerchantUserStorage {
    pub fn new(storage: PgStorage) -> Self {
        Self { storage }
    }

    fn pool(&self) -> &PgPool {
        &self.storage.pool
    }
}

/// SQL expression for a sortable column. Only enum values reach ORDER BY.
fn sort_expression(column: Column) -> &'static str {
    match column {
        Column::Username => "u.username",
        Column::FirstName => "u.first_name",
        Column::LastName => "u.last_name",
        Column::Status => "u.status",
        Column::Id | Column::Actions => "mu.id_merchant_user",
    }
}

/// `CASE` mapping stored status codes to their text, used by search.
fn status_text_expression() -> String {
    let arms: String = UserStatus::ALL
        .iter()
        .map(|status| format!(" WHEN {} THEN '{}'", status.code(), status.as_str()))
        .collect();
    format!("(CASE u.status{arms} ELSE '' END)")
}

/// Escape LIKE wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, merchant_id: i32, search: Option<&str>) {
    builder.push(" WHERE mu.fk_merchant = ");
    builder.push_bind(merchant_id);

    if let Some(search) = search {
        let pattern = like_pattern(search);
        builder.push(" AND (u.username ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR ");
        builder.push(status_text_expression());
        builder.push(" ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

const FROM_JOIN: &str = " FROM merchant_users mu INNER JOIN users u ON u.id_user = mu.fk_user";

impl MerchantUserStorage for PgMerchantUserStorage {
    async fn count_merchant_users(
        &self,
        merchant_id: i32,
        search: Option<&str>,
    ) -> Result<u64, MerchantUserStorageError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        builder.push(FROM_JOIN);
        push_filters(&mut builder, merchant_id, search);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn find_merchant_users(
        &self,
        query: &MerchantUserQuery,
    ) -> Result<Vec<MerchantUserRecord>, MerchantUserStorageError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT mu.id_merchant_user, mu.fk_merchant, mu.fk_user, \
             u.username, u.first_name, u.last_name, u.status",
        );
        builder.push(FROM_JOIN);
        push_filters(&mut builder, query.merchant_id, query.search.as_deref());

        let direction = query.sort.direction.as_sql();
        builder.push(format!(
            " ORDER BY {} {direction}",
            sort_expression(query.sort.column)
        ));
        if !matches!(query.sort.column, Column::Id | Column::Actions) {
            builder.push(format!(", mu.id_merchant_user {direction}"));
        }

        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.offset).unwrap_or(i64::MAX));

        let records = builder
            .build_query_as::<MerchantUserRecord>()
            .fetch_all(self.pool())
            .await?;

        Ok(records)
    }
}
