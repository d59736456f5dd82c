use crate::calc::{clamp_score, coerce_score, GradeBreakdown};
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

/// Accepts the same loose inputs as a grid cell: strings are kept, numbers
/// are taken as-is, null or missing is empty.
pub fn input_text(v: Option<&serde_json::Value>, key: &str) -> Result<String, HandlerErr> {
    match v {
        None | Some(serde_json::Value::Null) => Ok(String::new()),
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(HandlerErr::bad_params(format!(
            "{key} must be a string, number or null"
        ))),
    }
}

/// Score cells never reject input: anything that is not a string or number
/// (booleans, arrays, objects) reads as empty and scores 0.
pub fn score_text(v: Option<&serde_json::Value>) -> String {
    match v {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn handle_preview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let scheme = *state.ledger.scheme();
    let mut scores = [0.0_f64; 4];
    for (slot, key) in scores
        .iter_mut()
        .zip(["firstExam", "secondExam", "bookGrade", "behavior"])
    {
        *slot = clamp_score(coerce_score(&score_text(req.params.get(key))), &scheme);
    }
    let [first_exam, second_exam, book_grade, behavior] = scores;
    let grades = GradeBreakdown::compute(first_exam, second_exam, book_grade, behavior, &scheme);

    ok(
        &req.id,
        json!({
            "firstExam": first_exam,
            "secondExam": second_exam,
            "bookGrade": book_grade,
            "behavior": behavior,
            "grades": grades,
            "status": grades.status(&scheme),
            "display": grades.display(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "calc.preview" => Some(handle_preview(state, req)),
        _ => None,
    }
}
