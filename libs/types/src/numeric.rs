//! Fixed-point mantissa types
//!
//! Three scales are in play and each gets its own type so they can never be
//! mixed by accident:
//!
//! | Type | Scale | Used for |
//! |------|-------|----------|
//! | [`Exp`] | 1e18 | factors, exchange rates, account value totals |
//! | [`InternalPrice`] | 1e6 | oracle-internal normalized price |
//! | [`UnderlyingPrice`] | `1e30 / baseUnit` | price handed to the risk engine |
//!
//! All mantissas are `u128`. Every multiply-then-divide is widened through
//! `BigUint` and narrowed back with an explicit overflow check, so
//! intermediate products never wrap or lose precision.
//! `rust_decimal` is only the human-facing form (configuration, logs).

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::MathError;

/// 1e18, the scale of [`Exp`] mantissas
pub const EXP_SCALE: u128 = 1_000_000_000_000_000_000;

/// Decimal places of [`InternalPrice`]
pub const INTERNAL_PRICE_DECIMALS: i32 = 6;

/// 1e6, the scale of [`InternalPrice`] values
pub const INTERNAL_PRICE_SCALE: u128 = 1_000_000;

/// 1e30. `UnderlyingPrice = internal × 1e30 / baseUnit`
pub const EXTERNAL_PRICE_SCALE: u128 = 1_000_000_000_000_000_000_000_000_000_000;

/// Basis points denominator (100% = 10_000)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Largest magnitude representable by a `Decimal` (96-bit mantissa)
const DECIMAL_MAX_MANTISSA: u128 = (1u128 << 96) - 1;

/// Compute `a × b / c` with a widened intermediate.
///
/// Truncates toward zero.
pub fn mul_div(a: u128, b: u128, c: u128) -> Result<u128, MathError> {
    if c == 0 {
        return Err(MathError::DivisionByZero);
    }
    let wide = BigUint::from(a) * BigUint::from(b) / BigUint::from(c);
    wide.to_u128().ok_or(MathError::Overflow)
}

fn pow10(exp: u32) -> Result<u128, MathError> {
    10u128.checked_pow(exp).ok_or(MathError::Overflow)
}

// ── Exp ──────────────────────────────────────────────────────────────────

/// Unsigned fixed-point number with 18 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exp(u128);

impl Exp {
    pub const ZERO: Exp = Exp(0);
    pub const ONE: Exp = Exp(EXP_SCALE);

    pub const fn from_mantissa(mantissa: u128) -> Self {
        Self(mantissa)
    }

    pub const fn mantissa(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `num / den` as an `Exp`
    pub fn from_ratio(num: u128, den: u128) -> Result<Self, MathError> {
        mul_div(num, EXP_SCALE, den).map(Self)
    }

    /// `a × b / 1e18`
    pub fn mul(self, other: Exp) -> Result<Exp, MathError> {
        mul_div(self.0, other.0, EXP_SCALE).map(Exp)
    }

    /// `a × 1e18 / b`
    pub fn div(self, other: Exp) -> Result<Exp, MathError> {
        mul_div(self.0, EXP_SCALE, other.0).map(Exp)
    }

    pub fn add(self, other: Exp) -> Result<Exp, MathError> {
        self.0.checked_add(other.0).map(Exp).ok_or(MathError::Overflow)
    }

    pub fn sub(self, other: Exp) -> Result<Exp, MathError> {
        self.0.checked_sub(other.0).map(Exp).ok_or(MathError::Underflow)
    }

    /// Multiply by an integer and truncate back to an integer: `a × s / 1e18`
    pub fn mul_scalar_truncate(self, scalar: u128) -> Result<u128, MathError> {
        mul_div(self.0, scalar, EXP_SCALE)
    }

    /// `truncate(a × s) + addend`, the accumulation step of every sum
    pub fn mul_scalar_truncate_add(self, scalar: u128, addend: u128) -> Result<u128, MathError> {
        self.mul_scalar_truncate(scalar)?
            .checked_add(addend)
            .ok_or(MathError::Overflow)
    }

    /// Integer part
    pub fn truncate(self) -> u128 {
        self.0 / EXP_SCALE
    }

    /// Convert a decimal such as `0.75` into a mantissa.
    ///
    /// Digits beyond the 18th decimal place are truncated.
    pub fn from_decimal(value: Decimal) -> Result<Exp, MathError> {
        let raw = value.mantissa();
        if raw < 0 {
            return Err(MathError::Underflow);
        }
        let raw = raw as u128;
        let scale = value.scale();
        let mantissa = if scale <= 18 {
            raw.checked_mul(pow10(18 - scale)?).ok_or(MathError::Overflow)?
        } else {
            raw / pow10(scale - 18)?
        };
        Ok(Exp(mantissa))
    }

    /// Lossy decimal view, for logs and display.
    ///
    /// Mantissas too wide for a `Decimal` drop low-order digits.
    pub fn to_decimal(self) -> Decimal {
        let mut mantissa = self.0;
        let mut scale = 18u32;
        while mantissa > DECIMAL_MAX_MANTISSA && scale > 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Decimal::try_from_i128_with_scale(mantissa as i128, scale).unwrap_or(Decimal::MAX)
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal().normalize())
    }
}

// ── InternalPrice ────────────────────────────────────────────────────────

/// Oracle-internal price with six decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternalPrice(u128);

impl InternalPrice {
    pub const ZERO: InternalPrice = InternalPrice(0);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Rescale `value × 10^expo` to six decimals, truncating.
    pub fn rescale(value: u128, expo: i32) -> Result<Self, MathError> {
        let shift = expo
            .checked_add(INTERNAL_PRICE_DECIMALS)
            .ok_or(MathError::Overflow)?;
        if shift >= 0 {
            value
                .checked_mul(pow10(shift as u32)?)
                .map(Self)
                .ok_or(MathError::Overflow)
        } else {
            let down = shift.unsigned_abs();
            // 10^39 exceeds u128, anything shifted that far is zero
            if down > 38 {
                return Ok(Self::ZERO);
            }
            Ok(Self(value / pow10(down)?))
        }
    }

    /// Rescale a value reported with `decimals` fractional digits.
    pub fn from_decimals(value: u128, decimals: u8) -> Result<Self, MathError> {
        Self::rescale(value, -(decimals as i32))
    }

    pub fn checked_add(self, other: InternalPrice) -> Result<Self, MathError> {
        self.0.checked_add(other.0).map(Self).ok_or(MathError::Overflow)
    }

    pub fn checked_sub(self, other: InternalPrice) -> Result<Self, MathError> {
        self.0.checked_sub(other.0).map(Self).ok_or(MathError::Underflow)
    }

    /// External price: `internal × 1e30 / baseUnit`.
    pub fn to_underlying(self, base_unit: u128) -> Result<UnderlyingPrice, MathError> {
        mul_div(self.0, EXTERNAL_PRICE_SCALE, base_unit).map(UnderlyingPrice)
    }
}

impl fmt::Display for InternalPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = Decimal::try_from_i128_with_scale(self.0 as i128, INTERNAL_PRICE_DECIMALS as u32)
            .unwrap_or(Decimal::MAX);
        write!(f, "{}", value)
    }
}

// ── UnderlyingPrice ──────────────────────────────────────────────────────

/// Price of one base unit of an underlying asset, as consumed by the engine.
///
/// Interpreted as an [`Exp`]: `price × amount / 1e18` yields a value total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnderlyingPrice(u128);

impl UnderlyingPrice {
    pub const ZERO: UnderlyingPrice = UnderlyingPrice(0);

    pub const fn from_mantissa(mantissa: u128) -> Self {
        Self(mantissa)
    }

    pub const fn mantissa(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn as_exp(self) -> Exp {
        Exp::from_mantissa(self.0)
    }
}

impl fmt::Display for UnderlyingPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
