pub mod claims;
pub mod error;
pub mod factory;
pub mod guard;
pub mod keys;

pub use claims::Claims;
pub use error::AuthError;
pub use factory::build_access_guard;
pub use guard::{AccessGuard, GuardPolicy};

#[cfg(test)]
pub mod testing;
