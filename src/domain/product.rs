//! Inventory and sales documents

use serde::{Deserialize, Serialize};

use crate::store::{TenantDocument, Timestamps};

pub const PRODUCT_COLLECTION: &str = "products";
pub const STOCK_MOVEMENT_COLLECTION: &str = "stock_movements";
pub const SALE_COLLECTION: &str = "sales";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Fertilizer,
    Pesticide,
    Seed,
    Equipment,
    Other,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    Active,
    Inactive,
    Discontinued,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub product_id: String,

    pub name: String,
    pub category: ProductCategory,
    pub unit: String,

    pub cost_price: f64,
    pub selling_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_price: Option<f64>,

    pub current_stock: f64,
    /// Reorder point
    pub min_stock: f64,

    pub has_expiry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_months: Option<u32>,

    pub status: InventoryStatus,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Product {
    pub fn is_below_min_stock(&self) -> bool {
        self.current_stock < self.min_stock
    }
}

impl TenantDocument for Product {
    const COLLECTION: &'static str = PRODUCT_COLLECTION;

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
pub enum MovementType {
    In,
    Out,
    Adjust,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MovementReason {
    Purchase,
    Sale,
    Return,
    Damage,
    Adjustment,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub movement_id: String,
    pub product_id: String,

    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub reason: MovementReason,

    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
    pub total_value: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    pub stock_before: f64,
    pub stock_after: f64,

    pub date: String,
    pub created_by: String,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for StockMovement {
    const COLLECTION: &'static str = STOCK_MOVEMENT_COLLECTION;

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
pub enum SalePaymentType {
    Cash,
    Credit,
    Transfer,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Completed,
    Pending,
    Cancelled,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreditInfo {
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_contract_no: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub coop_id: String,
    pub sale_id: String,

    /// Member sale when set, walk-in customer otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    pub items: Vec<SaleItem>,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,

    pub payment_type: SalePaymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_info: Option<CreditInfo>,

    pub status: SaleStatus,
    pub sale_date: String,
    pub created_by: String,

    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl TenantDocument for Sale {
    const COLLECTION: &'static str = SALE_COLLECTION;

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
