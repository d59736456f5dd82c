use crate::calc::{Student, StudentField};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::handlers::calc::{input_text, score_text};
use crate::ipc::types::{AppState, Request};
use crate::ledger::{Ledger, LedgerError};
use serde_json::json;

impl From<LedgerError> for HandlerErr {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::StudentNotFound(id) => HandlerErr {
                code: "not_found",
                message: e.to_string(),
                details: Some(json!({ "studentId": id })),
            },
            LedgerError::DuplicateDni {
                student_id,
                ref dni,
                conflicts_with,
                ref message,
            } => HandlerErr {
                code: "duplicate_dni",
                message: message.clone(),
                details: Some(json!({
                    "studentId": student_id,
                    "dni": dni,
                    "conflictsWith": conflicts_with,
                })),
            },
        }
    }
}

/// One table row: stored columns, derived columns, verdict, two-decimal
/// display strings and the row's DNI error, if any.
fn student_row(ledger: &Ledger, student: &Student) -> serde_json::Value {
    let mut row = json!(student);
    row["status"] = json!(student.status(ledger.scheme()));
    row["display"] = student.grades.display();
    row["dniError"] = json!(ledger.dni_error(student.id));
    row
}

fn student_id_param(req: &Request) -> Result<u64, HandlerErr> {
    req.params
        .get("studentId")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::bad_params("missing/invalid studentId"))
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ledger = &state.ledger;
    let rows: Vec<serde_json::Value> = ledger
        .roster()
        .iter()
        .map(|s| student_row(ledger, s))
        .collect();
    ok(&req.id, json!({ "students": rows }))
}

fn handle_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = student_id_param(req)?;
    let ledger = &state.ledger;
    let student = ledger
        .get(id)
        .ok_or(LedgerError::StudentNotFound(id))?;
    Ok(json!({ "student": student_row(ledger, student) }))
}

fn handle_create(state: &mut AppState) -> serde_json::Value {
    let id = state.ledger.add_student().id;
    let ledger = &state.ledger;
    let row = ledger
        .get(id)
        .map(|s| student_row(ledger, s))
        .unwrap_or(serde_json::Value::Null);
    json!({ "studentId": id, "student": row })
}

fn handle_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = student_id_param(req)?;
    let field: StudentField = req
        .params
        .get("field")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params("missing field"))?
        .parse()
        .map_err(HandlerErr::bad_params)?;
    let value = if field.is_numeric() {
        score_text(req.params.get("value"))
    } else {
        input_text(req.params.get("value"), "value")?
    };

    state.ledger.set_field(id, field, &value)?;
    let ledger = &state.ledger;
    let student = ledger
        .get(id)
        .ok_or(LedgerError::StudentNotFound(id))?;
    Ok(json!({ "student": student_row(ledger, student) }))
}

fn handle_check_dni(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = student_id_param(req)?;
    let dni = req
        .params
        .get("dni")
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params("missing dni"))?;
    Ok(json!({ "available": state.ledger.is_dni_available(id, dni) }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let id = student_id_param(req)?;
    state.ledger.remove_student(id)?;
    Ok(json!({ "studentId": id }))
}

fn respond(req: &Request, res: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match res {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.get" => Some(respond(req, handle_get(state, req))),
        "students.create" => Some(ok(&req.id, handle_create(state))),
        "students.update" => Some(respond(req, handle_update(state, req))),
        "students.delete" => Some(respond(req, handle_delete(state, req))),
        "students.checkDni" => Some(respond(req, handle_check_dni(state, req))),
        _ => None,
    }
}
