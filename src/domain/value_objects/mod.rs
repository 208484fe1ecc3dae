//! Value Objects for the storefront

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-rupee amount. Prices and totals never carry minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(amount: i64) -> Self { Self(amount) }
    pub fn amount(&self) -> i64 { self.0 }
    pub fn add(&self, other: Money) -> Money { Money(self.0.saturating_add(other.0)) }
    pub fn multiply(&self, qty: u32) -> Money { Money(self.0.saturating_mul(i64::from(qty))) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "₹{}", self.0) }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self { iter.fold(Money::ZERO, |acc, m| acc.add(m)) }
}

/// Ten-digit mobile number, stored without separators.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl TryFrom<String> for Phone {
    type Error = PhoneError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self { phone.0 }
}

impl Phone {
    pub const DIGITS: usize = 10;

    pub fn parse(value: &str) -> Result<Self, PhoneError> {
        let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.is_empty() { return Err(PhoneError::Empty); }
        if !digits.chars().all(|c| c.is_ascii_digit()) { return Err(PhoneError::NotNumeric); }
        if digits.len() != Self::DIGITS { return Err(PhoneError::WrongLength(digits.len())); }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str { &self.0 }

    /// Last four digits, as shown in the "code sent to" notice.
    pub fn masked(&self) -> String { format!("******{}", &self.0[Self::DIGITS - 4..]) }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum PhoneError { Empty, NotNumeric, WrongLength(usize) }
impl std::error::Error for PhoneError {}
impl fmt::Display for PhoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "phone number missing"),
            Self::NotNumeric => write!(f, "phone number must contain only digits"),
            Self::WrongLength(n) => write!(f, "phone number must have {} digits, got {}", Phone::DIGITS, n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_money_sum() {
        let total: Money = [Money::new(60).multiply(2), Money::new(25)].into_iter().sum();
        assert_eq!(total.amount(), 145);
        assert_eq!(total.to_string(), "₹145");
    }
    #[test]
    fn test_phone_strips_spaces() {
        let phone = Phone::parse("98765 43210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
        assert_eq!(phone.masked(), "******3210");
    }
    #[test]
    fn test_phone_rejects_short_and_letters() {
        assert_eq!(Phone::parse("12345"), Err(PhoneError::WrongLength(5)));
        assert_eq!(Phone::parse("98765abcde"), Err(PhoneError::NotNumeric));
        assert_eq!(Phone::parse("   "), Err(PhoneError::Empty));
    }
    #[test]
    fn test_phone_deserialize_validates() {
        let phone: Phone = serde_json::from_str("\"98765 43210\"").unwrap();
        assert_eq!(phone.masked(), "******3210");
        assert_eq!(serde_json::to_string(&phone).unwrap(), "\"9876543210\"");
        assert!(serde_json::from_str::<Phone>("\"123\"").is_err());
    }
}
