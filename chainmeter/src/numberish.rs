//! Normalization of recorded numbers into metric values.

use alloy_primitives::{I256, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Any number a handler may record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numberish {
    /// Signed machine integer.
    Signed(i128),
    /// Unsigned machine integer.
    Unsigned(u128),
    /// Floating point value.
    Float(f64),
    /// 256-bit unsigned integer (token amounts, balances).
    U256(U256),
    /// 256-bit signed integer.
    I256(I256),
    /// Exact decimal.
    Decimal(Decimal),
}

macro_rules! numberish_from {
    ($variant:ident as $wide:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Numberish {
                fn from(value: $t) -> Self {
                    Self::$variant(<$wide>::from(value))
                }
            }
        )+
    };
}

numberish_from!(Signed as i128: i8, i16, i32, i64, i128);
numberish_from!(Unsigned as u128: u8, u16, u32, u64, u128);
numberish_from!(Float as f64: f32, f64);

impl From<U256> for Numberish {
    fn from(value: U256) -> Self {
        Self::U256(value)
    }
}

impl From<I256> for Numberish {
    fn from(value: I256) -> Self {
        Self::I256(value)
    }
}

impl From<Decimal> for Numberish {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

/// A metric value in the form the aggregation backend ingests.
///
/// Integers travel as decimal strings so no precision is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricValue {
    /// Arbitrary precision integer as a base-10 string.
    BigInteger(String),
    /// Arbitrary precision decimal as a string.
    BigDecimal(String),
    /// Double precision float.
    DoubleValue(f64),
}

impl From<Numberish> for MetricValue {
    fn from(value: Numberish) -> Self {
        match value {
            Numberish::Signed(v) => Self::BigInteger(v.to_string()),
            Numberish::Unsigned(v) => Self::BigInteger(v.to_string()),
            Numberish::U256(v) => Self::BigInteger(v.to_string()),
            Numberish::I256(v) => Self::BigInteger(v.to_string()),
            Numberish::Float(v) => Self::DoubleValue(v),
            Numberish::Decimal(v) => Self::BigDecimal(v.normalize().to_string()),
        }
    }
}

/// Normalizes a recorded number.
pub fn to_metric_value(value: impl Into<Numberish>) -> MetricValue {
    MetricValue::from(value.into())
}
