//! Phone + one-time-code sign-in and the admin PIN gate.

use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::value_objects::Phone;
use crate::{Result, StorefrontError};

pub const OTP_LENGTH: usize = 4;
pub const MIN_NAME_LEN: usize = 2;

fn validate_name(name: &str) -> std::result::Result<(), ValidationError> {
    if name.trim().chars().count() < MIN_NAME_LEN { return Err(ValidationError::new("name_too_short")); }
    Ok(())
}

fn validate_phone(phone: &str) -> std::result::Result<(), ValidationError> {
    Phone::parse(phone).map(|_| ()).map_err(|_| ValidationError::new("phone_invalid"))
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(custom = "validate_name")]
    pub name: String,
    #[validate(custom = "validate_phone")]
    pub phone: String,
}

impl LoginForm {
    /// Checks the form and returns the normalized phone number.
    pub fn check(&self) -> Result<Phone> {
        if let Err(errors) = self.validate() {
            if errors.field_errors().contains_key("name") { return Err(StorefrontError::NameTooShort); }
        }
        Ok(Phone::parse(&self.phone)?)
    }
}

/// A code that was sent and is waiting to be typed back.
#[derive(Clone, Debug)]
pub struct OtpChallenge {
    name: String,
    phone: Phone,
    code: String,
}

impl OtpChallenge {
    pub fn issue(name: &str, phone: Phone) -> Self {
        Self { name: name.trim().to_string(), phone, code: generate_code() }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn phone(&self) -> &Phone { &self.phone }
    pub fn code(&self) -> &str { &self.code }

    pub fn verify(&self, entered: &str) -> Result<()> {
        let entered = entered.trim();
        if entered.len() != OTP_LENGTH || !entered.chars().all(|c| c.is_ascii_digit()) {
            return Err(StorefrontError::OtpIncomplete);
        }
        if entered != self.code { return Err(StorefrontError::OtpMismatch); }
        Ok(())
    }
}

pub fn generate_code() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

/// Seconds left before another code may be requested. Ticked once a second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResendCooldown {
    remaining: u32,
}

impl ResendCooldown {
    pub fn start(seconds: u32) -> Self { Self { remaining: seconds } }
    pub fn remaining(&self) -> u32 { self.remaining }
    pub fn is_active(&self) -> bool { self.remaining > 0 }

    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }
}

pub fn check_admin_pin(expected: &str, entered: &str) -> Result<()> {
    if expected.is_empty() || entered.trim() != expected { return Err(StorefrontError::WrongAdminPin); }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_errors() {
        let form = LoginForm { name: " A ".into(), phone: "9876543210".into() };
        assert!(matches!(form.check(), Err(StorefrontError::NameTooShort)));
        let form = LoginForm { name: "Asha".into(), phone: "98765".into() };
        assert!(matches!(form.check(), Err(StorefrontError::InvalidPhone(_))));
        let form = LoginForm { name: "Asha".into(), phone: "98765 43210".into() };
        assert_eq!(form.check().unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_otp_verification() {
        let challenge = OtpChallenge::issue("Asha", Phone::parse("9876543210").unwrap());
        assert_eq!(challenge.code().len(), OTP_LENGTH);
        assert!(matches!(challenge.verify("12"), Err(StorefrontError::OtpIncomplete)));
        assert!(matches!(challenge.verify("12a4"), Err(StorefrontError::OtpIncomplete)));
        let wrong = if challenge.code() == "1000" { "1001" } else { "1000" };
        assert!(matches!(challenge.verify(wrong), Err(StorefrontError::OtpMismatch)));
        assert!(challenge.verify(challenge.code()).is_ok());
    }

    #[test]
    fn test_cooldown_ticks_to_zero() {
        let mut cooldown = ResendCooldown::start(2);
        assert!(cooldown.is_active());
        assert_eq!(cooldown.tick(), 1);
        assert_eq!(cooldown.tick(), 0);
        assert_eq!(cooldown.tick(), 0);
        assert!(!cooldown.is_active());
    }

    #[test]
    fn test_admin_pin() {
        assert!(check_admin_pin("1234", "1234").is_ok());
        assert!(check_admin_pin("1234", "0000").is_err());
        assert!(check_admin_pin("", "").is_err());
    }
}
