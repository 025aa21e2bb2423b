// src/lib.rs

//! QSAT core: the domain of a kits & courses storefront.
//!
//! The crate holds everything that does not speak HTTP:
//!  - Domain models mirroring the relational schema ([`models`]).
//!  - Filtered, sorted and paginated catalog reads over kits and courses ([`catalog`]).
//!  - Order pricing and placement ([`pricing`], [`orders`]).
//!  - Registration, login, bearer tokens and role checks ([`identity`]).
//!  - Course enrollment with progress tracking ([`enrollments`]).
//!  - The per-user dashboard aggregate ([`dashboard`]).
//!  - Persistence traits with a PostgreSQL and an in-process implementation ([`store`]).
//!
//! Every operation receives its store explicitly:
//!
//! ```ignore
//! let store = PgStore::connect(&database_url).await?;
//! let page = catalog::list_kits(&store, &CatalogQuery::default()).await?;
//! ```

pub mod catalog;
pub mod dashboard;
pub mod enrollments;
pub mod error;
pub mod identity;
pub mod models;
pub mod orders;
pub mod pricing;
pub mod store;

pub use crate::catalog::{CatalogParams, CatalogQuery, PageInfo, Paged};
pub use crate::error::{CoreError, CoreResult, FieldError};
pub use crate::identity::TokenIssuer;
pub use crate::store::{PgStore, Store};
#[cfg(any(test, feature = "test-util"))]
pub use crate::store::MemoryStore;
