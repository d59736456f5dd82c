use crate::group::{Classroom, Course, CourseGroup};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn group_json(group: CourseGroup) -> serde_json::Value {
    json!({
        "course": group.course,
        "classroom": group.classroom,
        "label": group.to_string(),
    })
}

fn optional_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<Option<&'a str>, HandlerErr> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("{key} must be a string"))),
    }
}

fn handle_options(req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "courses": Course::ALL.iter().map(Course::as_str).collect::<Vec<_>>(),
            "classrooms": Classroom::ALL.iter().map(Classroom::as_str).collect::<Vec<_>>(),
        }),
    )
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, group_json(state.groups.selected()))
}

fn handle_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (course, classroom) = match (
        optional_str(&req.params, "course"),
        optional_str(&req.params, "classroom"),
    ) {
        (Ok(c), Ok(r)) => (c, r),
        (Err(e), _) | (_, Err(e)) => return e.response(&req.id),
    };
    if course.is_none() && classroom.is_none() {
        return HandlerErr::bad_params("missing course and classroom").response(&req.id);
    }

    match state.groups.select(course, classroom) {
        Ok(group) => ok(&req.id, group_json(group)),
        Err(e) => HandlerErr {
            code: "bad_params",
            message: e.to_string(),
            details: Some(json!({
                "course": course,
                "classroom": classroom,
            })),
        }
        .response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "groups.options" => Some(handle_options(req)),
        "groups.get" => Some(handle_get(state, req)),
        "groups.select" => Some(handle_select(state, req)),
        _ => None,
    }
}
