//! Domain document types
//!
//! Explicit per-collection record types at the accessor boundary. The
//! remote store is schemaless; these types are what "validate on read"
//! means — a stored document that does not decode into its record type is
//! quarantined by the accessor instead of being passed along.

mod common;
mod cooperative;
mod deposit;
mod loan;
mod member;
mod product;
mod share;
mod user;

pub use common::{Address, AttachedDocument};
pub use cooperative::{
    Bylaws, CoopStatus, CoopType, Cooperative, FixedDepositRate, COOPERATIVE_COLLECTION,
};
pub use deposit::{
    DepositAccount, DepositAccountStatus, DepositAccountType, DepositTransaction,
    DepositTransactionType, FixedDepositInfo, WithdrawalRestriction,
    DEPOSIT_ACCOUNT_COLLECTION, DEPOSIT_TRANSACTION_COLLECTION,
};
pub use loan::{
    ApprovalLevel, CollateralPolicy, InstallmentStatus, InterestMethod, LoanContract,
    LoanContractStatus, LoanPayment, LoanProduct, LoanType, PaymentMethod, PaymentSchedule,
    ProductStatus, LOAN_CONTRACT_COLLECTION, LOAN_PAYMENT_COLLECTION, LOAN_PRODUCT_COLLECTION,
};
pub use member::{
    Beneficiary, CropInfo, FarmingInfo, Gender, LandOwnership, Member, MemberStatus, MemberType,
    PdpaConsent, MEMBER_COLLECTION,
};
pub use product::{
    CreditInfo, InventoryStatus, MovementReason, MovementType, Product, ProductCategory, Sale,
    SaleItem, SalePaymentType, SaleStatus, StockMovement, PRODUCT_COLLECTION, SALE_COLLECTION,
    STOCK_MOVEMENT_COLLECTION,
};
pub use share::{
    ShareAccount, ShareAccountStatus, ShareTransaction, ShareTransactionType,
    SHARE_ACCOUNT_COLLECTION,
};
pub use user::{User, UserRole, UserStatus, USER_COLLECTION};
