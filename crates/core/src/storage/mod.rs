//! Object store abstraction.
//!
//! An `ObjectStore` is external key-addressed blob storage with
//! upload, list, delete and link-issuance capability. The S3 backend
//! is the production implementation; `StoreHandle` carries the
//! explicit disabled state for deployments where the store could not
//! be reached at startup.

mod handle;
mod s3;
mod types;

pub use handle::StoreHandle;
pub use s3::S3Store;
pub use types::*;
