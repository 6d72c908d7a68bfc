//! Gestational calendar engine with Ethiopian and Gregorian calendar support.
//!
//! Features:
//! - Stateless Gregorian/Ethiopian conversion over Rata Die day numbers
//! - Estimated date of delivery by Naegele's rule and gestational age
//! - Table-driven antenatal and postnatal visit windows
//! - Report formatting with Tigrinya, Amharic or transliterated month names

pub mod args;
pub mod calendar;
pub mod error;
pub mod formatter;
pub mod types;

pub use error::{GestcalError, Result};
