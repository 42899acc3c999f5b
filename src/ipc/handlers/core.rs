use crate::dataset::Dataset;
use crate::ipc::error::{ok, respond, HandlerErr};
use crate::ipc::params::get_required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn dataset_counts(state: &AppState) -> (usize, usize) {
    state
        .dataset
        .as_ref()
        .map(|d| (d.classes.len(), d.transactions.len()))
        .unwrap_or((0, 0))
}

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (class_count, transaction_count) = dataset_counts(state);
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "datasetPath": state.dataset_path.as_ref().map(|p| p.to_string_lossy().to_string()),
            "classCount": class_count,
            "transactionCount": transaction_count,
        }),
    )
}

/// Replaces the snapshot only when the new file loads cleanly; a failed load
/// leaves the previous snapshot in place.
pub fn load_dataset(state: &mut AppState, path: &Path) -> Result<serde_json::Value, HandlerErr> {
    match Dataset::load(path) {
        Ok(ds) => {
            info!(
                path = %path.display(),
                classes = ds.classes.len(),
                transactions = ds.transactions.len(),
                "dataset loaded"
            );
            state.dataset = Some(ds);
            state.dataset_path = Some(path.to_path_buf());
            let (class_count, transaction_count) = dataset_counts(state);
            Ok(json!({
                "datasetPath": path.to_string_lossy(),
                "classCount": class_count,
                "transactionCount": transaction_count,
            }))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "dataset load failed");
            Err(HandlerErr {
                code: "dataset_load_failed",
                message: e.to_string(),
                details: Some(json!({ "reason": e.code() })),
            })
        }
    }
}

fn handle_dataset_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let result = get_required_str(&req.params, "path")
        .map(PathBuf::from)
        .and_then(|path| load_dataset(state, &path));
    respond(&req.id, result)
}

fn handle_dataset_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    let cleared = state.dataset.take().is_some();
    state.dataset_path = None;
    ok(&req.id, json!({ "cleared": cleared }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "dataset.load" => Some(handle_dataset_load(state, req)),
        "dataset.clear" => Some(handle_dataset_clear(state, req)),
        _ => None,
    }
}
