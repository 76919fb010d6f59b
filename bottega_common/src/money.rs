use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const MARKET_CURRENCY_CODE: &str = "EUR";
pub const MARKET_CURRENCY_CODE_LOWER: &str = "eur";

//--------------------------------------     Money       ---------------------------------------------------------
/// A monetary amount, stored as an integer number of euro cents.
///
/// Keeping amounts in cents makes "rounded to two decimals" structural and makes equality checks exact, so a
/// payment that is off by even one cent never compares equal to an order total. On the wire the amount travels as a
/// two-decimal string (`"44.99"`); deserialization accepts either a JSON number or a string.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, AddAssign, add_assign);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in cents: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl TryFrom<u64> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(MoneyConversionError(format!("Value {} is too large to convert to Money", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "€{}", self.to_decimal_string())
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Creates an amount from a whole number of euros.
    pub fn from_eur(eur: i64) -> Self {
        Self(eur * 100)
    }

    /// Creates an amount from a decimal euro value, rounding to the nearest cent.
    pub fn from_decimal(value: f64) -> Result<Self, MoneyConversionError> {
        if !value.is_finite() {
            return Err(MoneyConversionError(format!("{value} is not a finite amount")));
        }
        let cents = (value * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return Err(MoneyConversionError(format!("Value {value} is too large to convert to Money")));
        }
        Ok(Self(cents as i64))
    }

    /// The amount as a plain two-decimal string, e.g. `44.99`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{}.{:02}", self.0.abs() / 100, self.0.abs() % 100)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        struct MoneyVisitor;

        impl de::Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a decimal amount as a number or string")
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where E: de::Error {
                Money::from_decimal(v).map_err(E::custom)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where E: de::Error {
                Money::from_decimal(v as f64).map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where E: de::Error {
                Money::from_decimal(v as f64).map_err(E::custom)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where E: de::Error {
                let value = v.trim().parse::<f64>().map_err(E::custom)?;
                Money::from_decimal(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}
