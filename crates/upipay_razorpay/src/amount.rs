// --- File: crates/upipay_razorpay/src/amount.rs ---
//! Major-to-minor currency unit conversion (rupees to paise).

use thiserror::Error;

/// Minor units per major unit for a two-decimal currency such as INR.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// The amount string was not a non-negative whole number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid amount {input:?}: expected a non-negative whole number")]
pub struct InvalidAmount {
    pub input: String,
}

/// Converts a whole-number amount in major units into minor units.
///
/// `"500"` becomes `50000`. Decimal points, currency symbols, negative
/// numbers and values whose minor-unit form overflows `i64` are rejected.
/// There is no upper bound beyond that; the gateway enforces its own limits.
pub fn normalize(amount_major_units: &str) -> Result<i64, InvalidAmount> {
    let invalid = || InvalidAmount {
        input: amount_major_units.to_string(),
    };

    let major: i64 = amount_major_units.parse().map_err(|_| invalid())?;
    if major < 0 {
        return Err(invalid());
    }
    major.checked_mul(MINOR_UNITS_PER_MAJOR).ok_or_else(invalid)
}
