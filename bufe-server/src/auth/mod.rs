//! Sessions, the access gate and login throttling

pub mod gate;
pub mod rate_limit;
pub mod session;
pub mod verification;

pub use gate::{Capability, GateContext, check_access};
pub use session::{AdminUser, BuffetUser, MaybeUser};
