use crate::model::{Actor, ClassRef, Role};
use chrono::NaiveDate;
use serde::Serialize;

/// Only office staff may change attendance that has already been submitted.
pub fn can_edit_attendance(role: Option<Role>) -> bool {
    matches!(role, Some(r) if r.is_office_staff())
}

/// Teachers (and everyone else outside the office) may only take attendance
/// for `today`; office staff may pick any date.
pub fn can_take_attendance_for_date(
    date: NaiveDate,
    today: NaiveDate,
    role: Option<Role>,
) -> bool {
    date == today || can_edit_attendance(role)
}

pub fn filter_classes_by_teacher<'a>(
    classes: &'a [ClassRef],
    actor_id: Option<&str>,
    role: Option<Role>,
) -> Vec<&'a ClassRef> {
    match (role, actor_id) {
        (Some(Role::Teacher), Some(id)) => {
            classes.iter().filter(|c| c.teacher_id == id).collect()
        }
        _ => classes.iter().collect(),
    }
}

/// Classes a teacher owns, for gating access. Unlike the visibility filter,
/// a teacher without an id owns nothing.
pub fn owned_classes<'a>(
    classes: &'a [ClassRef],
    actor_id: Option<&str>,
    role: Option<Role>,
) -> Vec<&'a ClassRef> {
    match (role, actor_id) {
        (Some(Role::Teacher), None) => Vec::new(),
        _ => filter_classes_by_teacher(classes, actor_id, role),
    }
}

pub fn can_access_attendance<C>(
    class_id: &str,
    teacher_classes: &[C],
    role: Option<Role>,
) -> bool
where
    C: std::borrow::Borrow<ClassRef>,
{
    match role {
        Some(Role::Admin) | Some(Role::Accounts) => true,
        Some(Role::Teacher) => teacher_classes.iter().any(|c| c.borrow().id == class_id),
        Some(Role::Student) | Some(Role::Parent) | None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePermissions {
    pub can_edit: bool,
    pub can_take_for_date: bool,
    pub can_access: bool,
    pub visible_class_ids: Vec<String>,
}

/// Evaluates every attendance gate for one screen. Each answer comes from its
/// own check; a missing `class_id` or `date` answers `false` for that gate.
pub fn attendance_permissions(
    actor: &Actor,
    class_id: Option<&str>,
    date: Option<NaiveDate>,
    today: NaiveDate,
    classes: &[ClassRef],
) -> AttendancePermissions {
    let visible = filter_classes_by_teacher(classes, actor.id.as_deref(), actor.role);
    let owned = owned_classes(classes, actor.id.as_deref(), actor.role);
    AttendancePermissions {
        can_edit: can_edit_attendance(actor.role),
        can_take_for_date: date
            .map(|d| can_take_attendance_for_date(d, today, actor.role))
            .unwrap_or(false),
        can_access: class_id
            .map(|id| can_access_attendance(id, &owned, actor.role))
            .unwrap_or(false),
        visible_class_ids: visible.iter().map(|c| c.id.clone()).collect(),
    }
}
