//! User status codes and their presentation in the merchant user table.
//!
//! Statuses are stored as small integers on the `users` table and shown as
//! text. The decoding is a total `match`, so a code outside the value set is
//! reported as [`UnknownStatusCode`] instead of being looked up blindly.

use serde::Serialize;
use std::fmt::Display;

/// Stored status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
    Deleted,
}

/// A status code that is not part of the user status value set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown user status code: {0}")]
pub struct UnknownStatusCode(pub i16);

/// Text and CSS class of the status label shown in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLabel {
    pub title: &'static str,
    pub class: &'static str,
}

/// Button that moves a user into a target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    pub title: &'static str,
    pub class: &'static str,
    pub icon: &'static str,
}

impl UserStatus {
    /// Every status in value-set order.
    pub const ALL: [Self; 3] = [Self::Active, Self::Blocked, Self::Deleted];

    /// Decode the stored integer code.
    pub fn from_code(code: i16) -> Result<Self, UnknownStatusCode> {
        match code {
            0 => Ok(Self::Active),
            1 => Ok(Self::Blocked),
            2 => Ok(Self::Deleted),
            other => Err(UnknownStatusCode(other)),
        }
    }

    /// The stored integer code.
    pub fn code(self) -> i16 {
        match self {
            Self::Active => 0,
            Self::Blocked => 1,
            Self::Deleted => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Deleted => "deleted",
        }
    }

    /// Label for the status column. `None` renders as an empty cell.
    pub fn label(self) -> Option<StatusLabel> {
        match self {
            Self::Active => Some(StatusLabel {
                title: "Active",
                class: "label-info",
            }),
            Self::Blocked => Some(StatusLabel {
                title: "Blocked",
                class: "label-danger",
            }),
            Self::Deleted => None,
        }
    }

    /// Status the toggle button switches to.
    pub fn toggle_target(self) -> Self {
        match self {
            Self::Active => Self::Blocked,
            Self::Blocked | Self::Deleted => Self::Active,
        }
    }

    /// Button shown for moving a user into this status.
    ///
    /// Only active and blocked are ever toggle targets; deleted users are
    /// offered the activate button.
    pub fn action(self) -> StatusAction {
        match self {
            Self::Blocked => StatusAction {
                title: "Deny Access",
                class: "btn-remove",
                icon: "fa fa-key",
            },
            Self::Active | Self::Deleted => StatusAction {
                title: "Activate",
                class: "btn-create",
                icon: "fa fa-key",
            },
        }
    }
}

impl TryFrom<i16> for UserStatus {
    type Error = UnknownStatusCode;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
