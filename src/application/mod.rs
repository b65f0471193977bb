// Application layer - the load -> operate -> save round trip around the
// inventory ledger, plus read-only reporting.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
