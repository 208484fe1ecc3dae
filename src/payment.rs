//! UPI payment link shown at checkout. Display only; nothing is charged.

use crate::domain::value_objects::Money;

pub fn upi_payment_uri(payee: &str, payee_name: &str, total: Money) -> String {
    format!("upi://pay?pa={}&pn={}&am={}&cu=INR", encode(payee), encode(payee_name), total.amount())
}

fn encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'@' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
