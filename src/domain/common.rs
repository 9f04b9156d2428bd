//! Shared domain value types

use serde::{Deserialize, Serialize};

/// Thai postal address, shared by cooperatives and members.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub sub_district: String,
    pub district: String,
    pub province: String,
    pub postal_code: String,
}

/// An uploaded document reference (bylaws, collateral papers, ...).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachedDocument {
    pub name: String,
    pub url: String,
    pub uploaded_at: String,
    pub version: String,
}
