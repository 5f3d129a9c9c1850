//! The hydrated user profile.
//!
//! A profile only ever exists *after* a credential does: the client signs
//! in (or restores a persisted token), then fetches "who am I" from the
//! server. Role decisions are made from this record, never from the token
//! itself — the token is opaque.

use serde::{Deserialize, Serialize};

/// The `user_type` value the server uses for administrators.
///
/// Everything else is a regular account. Privilege checks compare against
/// this constant rather than interpreting the number locally.
pub const ADMIN_USER_TYPE: u8 = 1;

/// The authenticated user's record, as returned by the profile endpoint.
///
/// `#[serde(default)]` on the optional fields keeps deserialization
/// tolerant — the server is free to add fields without breaking older
/// clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Server-assigned user id.
    pub id: u64,

    /// Display / login name.
    pub username: String,

    /// Contact address, when the server supplies one.
    #[serde(default)]
    pub email: Option<String>,

    /// Role flag. [`ADMIN_USER_TYPE`] marks an elevated account.
    #[serde(rename = "userType")]
    pub user_type: u8,
}

impl Profile {
    /// Returns `true` if this profile carries the elevated role.
    pub fn is_privileged(&self) -> bool {
        self.user_type == ADMIN_USER_TYPE
    }
}
