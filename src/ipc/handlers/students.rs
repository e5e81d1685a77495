use crate::aggregate::{history, summarize_history};
use crate::ipc::error::ok;
use crate::ipc::helpers::{loaded, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

/// An unknown id is not an error: `found` is false and the lists are empty.
fn handle_student_history(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let wb = match loaded(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let entries = history(&student_id, &wb.tests);
    let points: Vec<serde_json::Value> = entries
        .iter()
        .map(|e| {
            json!({
                "testName": e.test_name,
                "score": e.record.score,
                "rank": e.record.rank,
                "classAvg": e.class_avg,
            })
        })
        .collect();
    let name = entries.iter().rev().find_map(|e| e.record.name.clone());
    ok(
        &req.id,
        json!({
            "studentId": student_id,
            "found": !entries.is_empty(),
            "name": name,
            "summary": summarize_history(&entries),
            "points": points,
            "history": entries,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "student.history" => Some(handle_student_history(state, req)),
        _ => None,
    }
}
