use crate::finance::{
    current_month_transactions, filter_payments, finance_summary, pending_fees_by_payer,
};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::params::{clock_param, get_opt_str, transactions_param};
use crate::ipc::types::{AppState, Request};
use crate::model::TypeFilter;
use serde::Serialize;
use serde_json::json;

fn to_json<T: Serialize>(value: T) -> Result<serde_json::Value, HandlerErr> {
    serde_json::to_value(value).map_err(|e| HandlerErr {
        code: "internal",
        message: e.to_string(),
        details: None,
    })
}

fn finance_summary_open(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let txs = transactions_param(params, state.dataset.as_ref())?;
    let now = clock_param(params, "now", &state.config)?;
    to_json(finance_summary(&txs, now))
}

fn finance_current_month(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let txs = transactions_param(params, state.dataset.as_ref())?;
    let now = clock_param(params, "now", &state.config)?;
    let month = current_month_transactions(&txs, now);
    Ok(json!({ "transactions": month }))
}

fn finance_filter_payments(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let txs = transactions_param(params, state.dataset.as_ref())?;
    let type_filter = get_opt_str(params, "type")?
        .map(TypeFilter::parse)
        .unwrap_or(TypeFilter::All);
    let search = get_opt_str(params, "search")?.unwrap_or("");
    let rows = filter_payments(&txs, type_filter, search);
    Ok(json!({ "transactions": rows }))
}

fn finance_pending_by_payer(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let txs = transactions_param(params, state.dataset.as_ref())?;
    Ok(json!({ "payers": pending_fees_by_payer(&txs) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "finance.summary" => finance_summary_open(state, &req.params),
        "finance.currentMonth" => finance_current_month(state, &req.params),
        "finance.filterPayments" => finance_filter_payments(state, &req.params),
        "finance.pendingByPayer" => finance_pending_by_payer(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
