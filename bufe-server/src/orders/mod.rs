//! Order lifecycle
//!
//! ```text
//! leadva ──┬── visszavonva   (owner cancel, only from leadva)
//!          ├── torolve        (admin)
//!          └── visszaigasolva ── atadva   (admin)
//! ```
//!
//! Admins may set any status from any status; `archived` is a separate
//! one-way flag.

mod error;
pub mod schedule;
mod service;


pub use error::OrderError;
pub use service::OrderService;
