//! Core record types, quantity reconciliation and the fuel catalog.
//!
//! Everything here is pure: no I/O, and malformed input turns into default
//! values instead of errors.

mod error;
pub mod fuel;
mod quantity;
mod types;

pub use error::*;
pub use fuel::{FuelCategory, fuel_category};
pub use quantity::*;
pub use types::*;
