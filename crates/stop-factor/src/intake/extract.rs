use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::domain::{AccountInfo, LoanRequestId, LoanRequestPayload, RegPerson, VerifiedName};
use super::service::IntakeError;

const LOAN_REQUEST_ID: &str = "loanRequestID";

/// Parse a loan-request payload and pull out the entities worth persisting.
pub(crate) fn parse_payload(raw: &str) -> Result<LoanRequestPayload, IntakeError> {
    let root: Value = serde_json::from_str(raw)?;

    let loan_request_id = root
        .get(LOAN_REQUEST_ID)
        .and_then(scalar_text)
        .filter(|id| !id.trim().is_empty())
        .map(LoanRequestId::new)
        .ok_or(IntakeError::MissingField(LOAN_REQUEST_ID))?;

    let content = serde_json::to_string(&root)?;

    let reg_person = root
        .get("regPerson")
        .filter(|node| node.is_object())
        .map(|node| RegPerson {
            loan_request_id: loan_request_id.clone(),
            first_name: text(node, "firstName"),
            middle_name: text(node, "middleName"),
            last_name: text(node, "lastName"),
        });

    let verified_name = verified_name_node(&root)
        .filter(|node| node.is_object())
        .map(|node| VerifiedName {
            loan_request_id: loan_request_id.clone(),
            first_name: text(node, "first_name"),
            other_name: text(node, "other_name"),
            surname: text(node, "surname"),
        });

    let accounts = root
        .get("creditBureau")
        .and_then(|bureau| bureau.get("account_info"))
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .map(|node| account_info(&loan_request_id, node))
                .collect()
        });

    Ok(LoanRequestPayload {
        loan_request_id,
        content,
        reg_person,
        verified_name,
        accounts,
    })
}

/// Bureau name sits at the root in newer payloads and under `creditBureau` in older ones.
fn verified_name_node(root: &Value) -> Option<&Value> {
    root.get("verified_name").or_else(|| {
        root.get("creditBureau")
            .and_then(|bureau| bureau.get("verified_name"))
    })
}

fn account_info(loan_request_id: &LoanRequestId, node: &Value) -> AccountInfo {
    AccountInfo {
        loan_request_id: loan_request_id.clone(),
        account_number: text(node, "account_number"),
        account_status: text(node, "account_status"),
        current_balance: decimal(node, "current_balance"),
        date_opened: date(node, "date_opened"),
        days_in_arrears: integer(node, "days_in_arrears"),
        delinquency_code: text(node, "delinquency_code"),
        highest_days_in_arrears: integer(node, "highest_days_in_arrears"),
        is_your_account: boolean(node, "is_your_account"),
        last_payment_amount: decimal(node, "last_payment_amount"),
        last_payment_date: date(node, "last_payment_date"),
        loaded_at: date(node, "loaded_at"),
        original_amount: decimal(node, "original_amount"),
        overdue_balance: decimal(node, "overdue_balance"),
        overdue_date: date(node, "overdue_date"),
        product_type_id: integer(node, "product_type_id"),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn text(node: &Value, field: &str) -> Option<String> {
    node.get(field).and_then(scalar_text)
}

fn decimal(node: &Value, field: &str) -> Option<Decimal> {
    let raw = text(node, field)?;
    let cleaned = raw.replace('"', "");
    let cleaned = cleaned.trim();
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

fn integer(node: &Value, field: &str) -> Option<i32> {
    let value = match node.get(field)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(|value| value.trunc() as i64))
        }
        _ => None,
    }?;
    i32::try_from(value).ok()
}

fn boolean(node: &Value, field: &str) -> Option<bool> {
    match node.get(field)? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|value| value != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn date(node: &Value, field: &str) -> Option<NaiveDate> {
    let raw = text(node, field)?;
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("null") {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
