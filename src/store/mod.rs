//! Document store access
//!
//! Layered as: [`client`] (the remote HTTP store behind the
//! [`DocumentStore`] trait), [`filter`] (query construction and tenant
//! scoping), [`collection`] (typed tenant-scoped accessors), and
//! [`memory`] (in-process store for tests and dev mode).

pub mod client;
pub mod collection;
pub mod filter;
pub mod memory;

pub use client::{
    DeleteOptions, DeleteResult, DocumentStore, FetchResult, StoreClient, UpsertOptions,
    UpsertResult,
};
pub use collection::{generate_id, Collection, Page, TenantDocument, Timestamps};
pub use filter::{scope_to_tenant, FetchOptions, Filter, TENANT_KEY};
pub use memory::MemoryStore;
