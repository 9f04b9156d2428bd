//! Share capital documents

use serde::{Deserialize, Serialize};

use crate::store::{TenantDocument, Timestamps};

pub const SHARE_ACCOUNT_COLLECTION: &str = "share_accounts";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ShareTransactionType {
    /// Lump-sum share purchase
    Buy,
    /// Monthly share contribution
    Monthly,
    Withdrawal,
    /// Dividend paid into shares
    Dividend,
    /// Offset against a debt
    Offset,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ShareAccountStatus {
    Active,
    Locked,
    Withdrawn,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareTransaction {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub transaction_type: ShareTransactionType,
    pub shares: f64,
    pub amount: f64,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// One member's share capital position, with its transaction history
/// embedded (history volumes are small enough per member).
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShareAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub member_id: String,

    pub total_shares: f64,
    pub total_amount: f64,

    #[serde(default)]
    pub transactions: Vec<ShareTransaction>,

    pub status: ShareAccountStatus,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for ShareAccount {
    const COLLECTION: &'static str = SHARE_ACCOUNT_COLLECTION;

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
