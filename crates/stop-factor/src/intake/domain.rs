use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::matching::NameFields;

/// Identifier carried by every loan-request payload as `loanRequestID`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanRequestId(pub String);

impl LoanRequestId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoanRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw payload as received, stored once per loan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContent {
    pub loan_request_id: LoanRequestId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Applicant identity as typed into the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegPerson {
    pub loan_request_id: LoanRequestId,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
}

impl NameFields for RegPerson {
    fn name_fields(&self) -> [Option<&str>; 3] {
        [
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ]
    }
}

/// Identity confirmed by the credit bureau.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedName {
    pub loan_request_id: LoanRequestId,
    pub first_name: Option<String>,
    pub other_name: Option<String>,
    pub surname: Option<String>,
}

impl NameFields for VerifiedName {
    fn name_fields(&self) -> [Option<&str>; 3] {
        [
            self.first_name.as_deref(),
            self.other_name.as_deref(),
            self.surname.as_deref(),
        ]
    }
}

/// Credit-bureau account line attached to a loan request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub loan_request_id: LoanRequestId,
    pub account_number: Option<String>,
    pub account_status: Option<String>,
    pub current_balance: Option<Decimal>,
    pub date_opened: Option<NaiveDate>,
    pub days_in_arrears: Option<i32>,
    pub delinquency_code: Option<String>,
    pub highest_days_in_arrears: Option<i32>,
    pub is_your_account: Option<bool>,
    pub last_payment_amount: Option<Decimal>,
    pub last_payment_date: Option<NaiveDate>,
    pub loaded_at: Option<NaiveDate>,
    pub original_amount: Option<Decimal>,
    pub overdue_balance: Option<Decimal>,
    pub overdue_date: Option<NaiveDate>,
    pub product_type_id: Option<i32>,
}

/// Entities extracted from one payload, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRequestPayload {
    pub loan_request_id: LoanRequestId,
    pub content: String,
    pub reg_person: Option<RegPerson>,
    pub verified_name: Option<VerifiedName>,
    pub accounts: Option<Vec<AccountInfo>>,
}
