//! Deposit documents: accounts and their transactions

use serde::{Deserialize, Serialize};

use crate::store::{TenantDocument, Timestamps};

pub const DEPOSIT_ACCOUNT_COLLECTION: &str = "deposit_accounts";
pub const DEPOSIT_TRANSACTION_COLLECTION: &str = "deposit_transactions";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DepositAccountType {
    Savings,
    SpecialSavings,
    Fixed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DepositAccountStatus {
    Active,
    Closed,
    Dormant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedDepositInfo {
    pub principal_amount: f64,
    pub term_months: u32,
    pub maturity_date: String,
    pub auto_renew: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRestriction {
    pub max_withdrawals_per_month: u32,
    pub min_balance: f64,
    /// Fee rate for withdrawals beyond the allowance, percent
    pub penalty_rate: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DepositAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub member_id: String,
    pub account_no: String,

    pub account_type: DepositAccountType,
    pub account_name: String,

    pub balance: f64,
    pub interest_rate: f64,
    pub accrued_interest: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_deposit_info: Option<FixedDepositInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawal_restriction: Option<WithdrawalRestriction>,

    pub status: DepositAccountStatus,
    pub opened_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_interest_date: Option<String>,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for DepositAccount {
    const COLLECTION: &'static str = DEPOSIT_ACCOUNT_COLLECTION;

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

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DepositTransactionType {
    Deposit,
    Withdrawal,
    Interest,
    Transfer,
    Fee,
}

/// Immutable transaction record against a deposit account.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DepositTransaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub account_no: String,
    pub member_id: String,

    pub transaction_id: String,
    #[serde(rename = "type")]
    pub transaction_type: DepositTransactionType,
    pub amount: f64,
    pub balance_after: f64,

    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Staff member who entered the transaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teller: Option<String>,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for DepositTransaction {
    const COLLECTION: &'static str = DEPOSIT_TRANSACTION_COLLECTION;

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
