//! Loan documents: products, contracts, and payments

use serde::{Deserialize, Serialize};

use crate::store::{TenantDocument, Timestamps};

pub const LOAN_PRODUCT_COLLECTION: &str = "loan_products";
pub const LOAN_CONTRACT_COLLECTION: &str = "loan_contracts";
pub const LOAN_PAYMENT_COLLECTION: &str = "loan_payments";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Emergency,
    Ordinary,
    Special,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum InterestMethod {
    Flat,
    Effective,
    ReducingBalance,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CollateralPolicy {
    Guarantor,
    Share,
    Property,
    Mixed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    Staff,
    Committee,
    Board,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
}

/// A loan product: the terms a cooperative offers.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoanProduct {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub product_id: String,
    pub product_name: String,

    pub loan_type: LoanType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub min_amount: f64,
    pub max_amount: f64,
    pub min_term_months: u32,
    pub max_term_months: u32,
    /// Percent per year
    pub interest_rate: f64,
    pub interest_method: InterestMethod,

    pub collateral_required: CollateralPolicy,
    pub min_guarantors: u32,

    pub requires_approval: bool,
    pub approval_level: ApprovalLevel,

    pub status: ProductStatus,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for LoanProduct {
    const COLLECTION: &'static str = LOAN_PRODUCT_COLLECTION;

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
pub enum LoanContractStatus {
    Active,
    Closed,
    Default,
    Restructured,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Partial,
    Overdue,
}

/// One scheduled installment on a contract.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSchedule {
    pub installment_no: u32,
    pub due_date: String,
    pub principal_due: f64,
    pub interest_due: f64,
    pub total_due: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_paid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_paid: Option<f64>,

    pub status: InstallmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoanContract {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub contract_no: String,
    pub application_id: String,
    pub member_id: String,

    pub principal_amount: f64,
    pub interest_rate: f64,
    pub term_months: u32,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,

    pub disbursement_date: String,
    pub first_payment_date: String,
    pub last_payment_date: String,

    pub principal_balance: f64,
    pub interest_accrued: f64,
    pub total_balance: f64,

    pub status: LoanContractStatus,

    #[serde(default)]
    pub payment_schedule: Vec<PaymentSchedule>,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for LoanContract {
    const COLLECTION: &'static str = LOAN_CONTRACT_COLLECTION;

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
pub enum PaymentMethod {
    Cash,
    Transfer,
    DeductSavings,
    DeductProduce,
}

/// Immutable payment record against a loan contract.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub payment_id: String,
    pub contract_no: String,
    pub member_id: String,

    pub payment_date: String,
    pub amount: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_paid: Option<f64>,

    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    pub balance_after: f64,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for LoanPayment {
    const COLLECTION: &'static str = LOAN_PAYMENT_COLLECTION;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interest_method_wire_values() {
        let value = serde_json::to_value(InterestMethod::ReducingBalance).unwrap();
        assert_eq!(value, serde_json::json!("reducing_balance"));
    }
}
