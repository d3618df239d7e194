//! HTTP request handlers organized by area
//!
//! - `ledger` - read-only JSON views of the ledger
//! - `sessions` - JSON session API (advice and questions)
//! - `ui` - the interactive HTML page

pub mod ledger;
pub mod sessions;
pub mod ui;

// Re-export all handlers for use in router
pub use ledger::*;
pub use sessions::*;
pub use ui::*;
