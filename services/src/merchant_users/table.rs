//! Table provider for the merchant "Users" tab.
//!
//! The host admin table works in two steps: it asks for the table
//! configuration (headers, sortable/searchable/raw columns, default sort and
//! data url) and then fetches rows page by page. [`MerchantUserTable`]
//! implements both for a single merchant.

use std::collections::BTreeSet;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use url::form_urlencoded;

use super::MerchantUserRecord;
use super::status::{UnknownStatusCode, UserStatus};
use super::storage::{MerchantUserQuery, MerchantUserStorage, MerchantUserStorageError};
use crate::config::Config;
use crate::html::{self, ButtonOptions};

/// Base url of the merchant user table; the data url is relative to it.
pub const BASE_URL: &str = "/merchant-user-gui/index";

/// Edit page, handled outside this service.
pub const EDIT_MERCHANT_USER_URL: &str = "/merchant-user-gui/edit-merchant-user";

/// Status change handler, handled outside this service.
pub const MERCHANT_USER_STATUS_URL: &str = "/merchant-user-gui/merchant-user-status";

const PARAM_MERCHANT_ID: &str = "merchant-id";
const PARAM_MERCHANT_USER_ID: &str = "merchant-user-id";
const PARAM_STATUS: &str = "status";

/// Columns of the merchant user table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Username,
    FirstName,
    LastName,
    Status,
    Actions,
}

impl Column {
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::Username,
        Self::FirstName,
        Self::LastName,
        Self::Status,
        Self::Actions,
    ];

    /// Key used in row objects and query parameters.
    pub fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Username => "username",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Status => "status",
            Self::Actions => "actions",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.key() == key)
    }

    /// Header label shown above the column.
    pub fn header(self) -> &'static str {
        match self {
            Self::Id => "Merchant User Id",
            Self::Username => "E-mail",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Status => "Status",
            Self::Actions => "Actions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Column and direction rows are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    pub column: Column,
    pub direction: SortDirection,
}

/// Header labels kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers(Vec<(Column, &'static str)>);

impl Headers {
    pub fn iter(&self) -> impl Iterator<Item = &(Column, &'static str)> {
        self.0.iter()
    }

    pub fn get(&self, column: Column) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(candidate, _)| *candidate == column)
            .map(|(_, label)| *label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, label) in &self.0 {
            map.serialize_entry(column.key(), label)?;
        }
        map.end()
    }
}

/// Everything the generic table needs before it fetches rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableConfiguration {
    pub headers: Headers,
    pub sortable: BTreeSet<Column>,
    pub searchable: BTreeSet<Column>,
    pub raw_columns: BTreeSet<Column>,
    pub default_sort: SortOrder,
    pub base_url: &'static str,
    pub url: String,
    pub page_length: u32,
}

impl TableConfiguration {
    pub fn is_sortable(&self, column: Column) -> bool {
        self.sortable.contains(&column)
    }

    pub fn is_searchable(&self, column: Column) -> bool {
        self.searchable.contains(&column)
    }

    pub fn is_raw(&self, column: Column) -> bool {
        self.raw_columns.contains(&column)
    }
}

/// Query parameters of a table data request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableRequest {
    pub merchant_id: i32,
    /// Echoed back so the client can discard stale responses.
    #[serde(default)]
    pub draw: u64,
    pub start: Option<u64>,
    pub length: Option<u32>,
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
    pub search: Option<String>,
}

/// A formatted row. `status` and `actions` hold markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub status: String,
    pub actions: String,
}

/// One page of rows in the shape the admin data table expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub draw: u64,
    pub records_total: u64,
    pub records_filtered: u64,
    pub data: Vec<TableRow>,
}

#[derive(Debug, thiserror::Error)]
pub enum MerchantUserTableError {
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatusCode),

    #[error(transparent)]
    Storage(#[from] MerchantUserStorageError),

    #[error("Failed to render table cell: {0}")]
    Render(#[from] askama::Error),
}

/// Table provider scoped to one merchant.
#[derive(Debug, Clone)]
pub struct MerchantUserTable {
    merchant_id: i32,
    page_length: u32,
    max_page_length: u32,
}

impl MerchantUserTable {
    pub fn new(merchant_id: i32, config: &Config) -> Self {
        Self {
            merchant_id,
            page_length: config.table_page_length(),
            max_page_length: config.table_max_page_length(),
        }
    }

    pub fn merchant_id(&self) -> i32 {
        self.merchant_id
    }

    /// Configuration step: columns, sorting, search and the data url.
    pub fn configure(&self) -> TableConfiguration {
        let headers = Headers(
            Column::ALL
                .into_iter()
                .map(|column| (column, column.header()))
                .collect(),
        );

        TableConfiguration {
            headers,
            sortable: BTreeSet::from([
                Column::Username,
                Column::FirstName,
                Column::LastName,
                Column::Status,
            ]),
            searchable: BTreeSet::from([Column::Username, Column::Status]),
            raw_columns: BTreeSet::from([Column::Actions, Column::Status]),
            default_sort: SortOrder {
                column: Column::Id,
                direction: SortDirection::Desc,
            },
            base_url: BASE_URL,
            url: format!(
                "table?{}",
                form_urlencoded::Serializer::new(String::new())
                    .append_pair(PARAM_MERCHANT_ID, &self.merchant_id.to_string())
                    .finish()
            ),
            page_length: self.page_length,
        }
    }

    /// Turn request parameters into a storage query, applying the
    /// configured defaults and limits.
    pub fn resolve_query(
        &self,
        config: &TableConfiguration,
        request: &TableRequest,
    ) -> MerchantUserQuery {
        let sort = match request.sort.as_deref().map(|key| (key, Column::from_key(key))) {
            None => config.default_sort,
            Some((_, Some(column))) if config.is_sortable(column) => SortOrder {
                column,
                direction: request.direction.unwrap_or_default(),
            },
            Some((key, _)) => {
                tracing::debug!(sort = key, "Ignoring sort on non-sortable column");
                config.default_sort
            }
        };

        let search = request
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_owned);

        let limit = request
            .length
            .unwrap_or(self.page_length)
            .clamp(1, self.max_page_length);

        MerchantUserQuery {
            merchant_id: self.merchant_id,
            search,
            sort,
            offset: request.start.unwrap_or(0),
            limit,
        }
    }

    /// Data step: fetch one page of merchant users and format each row.
    #[tracing::instrument(skip_all, fields(merchant_id = self.merchant_id))]
    pub async fn fetch_data<M>(
        &self,
        storage: &M,
        request: &TableRequest,
    ) -> Result<TableData, MerchantUserTableError>
    where
        M: MerchantUserStorage,
    {
        let config = self.configure();
        let query = self.resolve_query(&config, request);

        let records_total = storage.count_merchant_users(self.merchant_id, None).await?;
        let records_filtered = match query.search.as_deref() {
            Some(search) => {
                storage
                    .count_merchant_users(self.merchant_id, Some(search))
                    .await?
            }
            None => records_total,
        };

        let records = storage.find_merchant_users(&query).await?;
        let data = records
            .iter()
            .map(|record| self.format_row(record))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            records_total,
            records_filtered,
            returned = data.len(),
            "Fetched merchant user rows"
        );

        Ok(TableData {
            draw: request.draw,
            records_total,
            records_filtered,
            data,
        })
    }

    /// Format a joined record into a display row.
    pub fn format_row(
        &self,
        record: &MerchantUserRecord,
    ) -> Result<TableRow, MerchantUserTableError> {
        let status = UserStatus::from_code(record.status)?;

        Ok(TableRow {
            id: record.id_merchant_user,
            username: record.username.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            status: status_label(status)?,
            actions: self
                .action_buttons(record.id_merchant_user, status)?
                .join(" "),
        })
    }

    /// Edit link followed by the status toggle button.
    pub fn action_buttons(
        &self,
        id_merchant_user: i32,
        status: UserStatus,
    ) -> askama::Result<[String; 2]> {
        let edit = html::edit_button(&self.edit_url(id_merchant_user), "Edit")?;

        let target = status.toggle_target();
        let action = target.action();
        let toggle = html::button(
            &self.status_url(id_merchant_user, target),
            action.title,
            ButtonOptions {
                icon: Some(action.icon),
                class: Some(action.class),
            },
        )?;

        Ok([edit, toggle])
    }

    pub fn edit_url(&self, id_merchant_user: i32) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(PARAM_MERCHANT_USER_ID, &id_merchant_user.to_string())
            .append_pair(PARAM_MERCHANT_ID, &self.merchant_id.to_string())
            .finish();
        format!("{EDIT_MERCHANT_USER_URL}?{query}")
    }

    pub fn status_url(&self, id_merchant_user: i32, target: UserStatus) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(PARAM_MERCHANT_USER_ID, &id_merchant_user.to_string())
            .append_pair(PARAM_MERCHANT_ID, &self.merchant_id.to_string())
            .append_pair(PARAM_STATUS, target.as_str())
            .finish();
        format!("{MERCHANT_USER_STATUS_URL}?{query}")
    }
}

/// Status cell markup; statuses without a label render empty.
pub fn status_label(status: UserStatus) -> askama::Result<String> {
    match status.label() {
        Some(label) => html::label(label.title, label.class),
        None => Ok(String::new()),
    }
}
