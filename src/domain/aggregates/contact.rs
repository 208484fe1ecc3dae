//! Contact messages sent from the public contact form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use crate::domain::aggregates::order::ORDER_DATE_FORMAT;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub date: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email address is invalid"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

impl ContactMessage {
    pub fn receive(form: ContactForm, on: NaiveDate) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            message: form.message,
            date: on.format(ORDER_DATE_FORMAT).to_string(),
        }
    }
}
