//! # Utility Modules
//!
//! - `jwt`: Access-token claim decoding
//! - `validation`: Registration input validation

pub mod jwt;
pub mod validation;

pub use jwt::{decode_claims, AccessClaims};
pub use validation::{validate_registration, ValidationResult};
