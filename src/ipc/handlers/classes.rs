use crate::attendance::filter_classes_by_teacher;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::params::{classes_param, get_opt_str, role_param};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn classes_for_actor(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let classes = classes_param(params, "classes", state.dataset.as_ref())?;
    let actor_id = get_opt_str(params, "actorId")?;
    let visible = filter_classes_by_teacher(&classes, actor_id, role_param(params));
    Ok(json!({ "classes": visible }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.forActor" => Some(respond(&req.id, classes_for_actor(state, &req.params))),
        _ => None,
    }
}
