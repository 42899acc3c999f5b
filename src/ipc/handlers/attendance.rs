use crate::attendance::{
    attendance_permissions, can_access_attendance, can_edit_attendance,
    can_take_attendance_for_date, owned_classes,
};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::params::{
    classes_param, clock_param, get_opt_str, get_required_str, parse_calendar_date, role_param,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{Actor, ClassRef};
use serde_json::json;

fn attendance_can_edit(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({ "canEdit": can_edit_attendance(role_param(params)) }))
}

fn attendance_can_take_for_date(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let raw_date = get_required_str(params, "date")?;
    let today = clock_param(params, "today", &state.config)?;
    // A date we cannot read is not today, and nobody gets to take attendance for it.
    let can_take = parse_calendar_date(&raw_date, &state.config)
        .map(|d| can_take_attendance_for_date(d, today, role_param(params)))
        .unwrap_or(false);
    Ok(json!({ "canTake": can_take, "today": today }))
}

fn attendance_can_access(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let class_id = get_required_str(params, "classId")?;
    let role = role_param(params);
    let supplied = params.get("teacherClasses").is_some_and(|v| !v.is_null());
    let teacher_classes: Vec<ClassRef> = if supplied {
        classes_param(params, "teacherClasses", None)?
    } else {
        let all = state
            .dataset
            .as_ref()
            .map(|d| d.classes.as_slice())
            .unwrap_or(&[]);
        owned_classes(all, get_opt_str(params, "actorId")?, role)
            .into_iter()
            .cloned()
            .collect()
    };
    Ok(json!({ "canAccess": can_access_attendance(&class_id, &teacher_classes, role) }))
}

fn attendance_permissions_for(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let actor = Actor {
        id: get_opt_str(params, "actorId")?.map(|s| s.to_string()),
        role: role_param(params),
    };
    let class_id = get_opt_str(params, "classId")?;
    let date = get_opt_str(params, "date")?.and_then(|raw| parse_calendar_date(raw, &state.config));
    let today = clock_param(params, "today", &state.config)?;
    let inline = params.get("classes").is_some_and(|v| !v.is_null());
    let classes = if inline || state.dataset.is_some() {
        classes_param(params, "classes", state.dataset.as_ref())?
    } else {
        Vec::new()
    };
    let perms = attendance_permissions(&actor, class_id, date, today, &classes);
    serde_json::to_value(perms).map_err(|e| HandlerErr {
        code: "internal",
        message: e.to_string(),
        details: None,
    })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.canEdit" => attendance_can_edit(&req.params),
        "attendance.canTakeForDate" => attendance_can_take_for_date(state, &req.params),
        "attendance.canAccess" => attendance_can_access(state, &req.params),
        "attendance.permissions" => attendance_permissions_for(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
