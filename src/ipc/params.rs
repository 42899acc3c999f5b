use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::Config;
use crate::dataset::{validate_transactions, Dataset};
use crate::ipc::error::HandlerErr;
use crate::model::{ClassRef, Role, Transaction};

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Absent and `null` are both "not supplied"; any other non-string is a shape error.
pub fn get_opt_str<'a>(
    params: &'a serde_json::Value,
    key: &str,
) -> Result<Option<&'a str>, HandlerErr> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("{} must be a string", key))),
    }
}

/// Unknown or missing roles never fail the request; they evaluate as `None`.
pub fn role_param(params: &serde_json::Value) -> Option<Role> {
    params.get("role").and_then(|v| v.as_str()).and_then(Role::parse)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp. A timestamp is placed on
/// the evaluator's calendar, not the one of the offset it was written with.
pub fn parse_calendar_date(raw: &str, config: &Config) -> Option<NaiveDate> {
    let t = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(t)
        .ok()
        .map(|dt| config.local_date(&dt))
}

/// Reads a clock override (`today`, `now`) or falls back to the configured clock.
pub fn clock_param(
    params: &serde_json::Value,
    key: &str,
    config: &Config,
) -> Result<NaiveDate, HandlerErr> {
    match get_opt_str(params, key)? {
        Some(raw) => parse_calendar_date(raw, config)
            .ok_or_else(|| HandlerErr::bad_params(format!("{} must be an ISO date", key))),
        None => Ok(config.today()),
    }
}

fn parse_list<T: DeserializeOwned>(
    value: &serde_json::Value,
    key: &str,
) -> Result<Vec<T>, HandlerErr> {
    serde_json::from_value(value.clone()).map_err(|e| HandlerErr {
        code: "bad_params",
        message: format!("invalid {}: {}", key, e),
        details: Some(json!({ "param": key })),
    })
}

/// Inline `classes` win over the loaded snapshot.
pub fn classes_param(
    params: &serde_json::Value,
    key: &str,
    dataset: Option<&Dataset>,
) -> Result<Vec<ClassRef>, HandlerErr> {
    if let Some(v) = params.get(key).filter(|v| !v.is_null()) {
        return parse_list(v, key);
    }
    dataset.map(|d| d.classes.clone()).ok_or_else(no_dataset)
}

pub fn transactions_param(
    params: &serde_json::Value,
    dataset: Option<&Dataset>,
) -> Result<Vec<Transaction>, HandlerErr> {
    if let Some(v) = params.get("transactions").filter(|v| !v.is_null()) {
        let txs: Vec<Transaction> = parse_list(v, "transactions")?;
        validate_transactions(&txs).map_err(|e| HandlerErr {
            code: "bad_params",
            message: e.to_string(),
            details: Some(json!({ "reason": e.code() })),
        })?;
        return Ok(txs);
    }
    dataset.map(|d| d.transactions.clone()).ok_or_else(no_dataset)
}

fn no_dataset() -> HandlerErr {
    HandlerErr {
        code: "no_dataset",
        message: "no dataset loaded and no inline data supplied".to_string(),
        details: None,
    }
}
