// Application layer - the session that owns a ledger and the summaries
// computed over it.

pub mod error;
pub mod reporting;
pub mod service;
pub mod summary;

pub use error::*;
pub use reporting::*;
pub use service::*;
