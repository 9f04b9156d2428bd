//! User document
//!
//! Staff accounts and roles. Roles are data only; nothing in this service
//! enforces them as access control.

use serde::{Deserialize, Serialize};

use crate::store::{TenantDocument, Timestamps};

pub const USER_COLLECTION: &str = "users";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Accountant,
    Teller,
    CreditOfficer,
    /// Read-only external auditor
    Auditor,
    /// Member self-service app account
    Member,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Locked,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub user_id: String,
    pub username: String,
    pub password_hash: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub role: UserRole,
    #[serde(default)]
    pub permissions: Vec<String>,

    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for User {
    const COLLECTION: &'static str = USER_COLLECTION;

    fn coop_id(&self) -> &str {
        &self.coop_id
    }

    fn doc_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_doc_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }
}
