//! Cooperative (tenant) document
//!
//! A cooperative is both a domain record and the tenant boundary: its
//! `coopId` is the value every other collection partitions on. For this
//! collection the tenant id is the cooperative's own id.

use serde::{Deserialize, Serialize};

use crate::domain::common::{Address, AttachedDocument};
use crate::store::{TenantDocument, Timestamps};

pub const COOPERATIVE_COLLECTION: &str = "cooperatives";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CoopType {
    Agriculture,
    Savings,
    Consumer,
    Service,
    CreditUnion,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CoopStatus {
    Active,
    Inactive,
    Suspended,
}

/// Interest rate for a fixed-deposit term.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedDepositRate {
    pub months: u32,
    pub interest_rate: f64,
}

/// Cooperative bylaws and operating parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bylaws {
    /// Share-holding ceiling per member, in currency
    pub max_share_per_member: f64,
    /// Ceiling as a percentage of total share capital
    pub max_share_percentage: f64,
    pub share_value: f64,
    pub min_monthly_share: f64,
    pub max_monthly_share: f64,
    pub dividend_rate: f64,
    pub patronage_refund_rate: f64,
    pub reserve_fund_rate: f64,

    // Loan policy
    pub max_guarantee_contracts: u32,
    pub max_dsr: f64,

    // Deposit policy
    pub savings_interest_rate: f64,
    pub special_savings_interest_rate: f64,
    pub fixed_deposit_rates: Vec<FixedDepositRate>,

    #[serde(default)]
    pub bylaw_documents: Vec<AttachedDocument>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Cooperative {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unique cooperative code; the tenant key for every collection
    pub coop_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    pub registration_no: String,
    #[serde(rename = "type")]
    pub coop_type: CoopType,
    pub address: Address,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    pub established_date: String,
    pub bylaws: Bylaws,
    pub status: CoopStatus,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for Cooperative {
    const COLLECTION: &'static str = COOPERATIVE_COLLECTION;

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
