//! Session authentication for the download surface.

mod session;
mod types;

pub use session::SessionSigner;
pub use types::{AuthError, Identity};
