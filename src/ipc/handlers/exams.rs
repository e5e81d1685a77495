use crate::aggregate::display_test_name;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{loaded, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_tests_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let wb = match loaded(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let tests: Vec<serde_json::Value> = wb
        .tests
        .iter()
        .map(|t| {
            json!({
                "name": t.name,
                "displayName": display_test_name(&t.name),
                "stats": t.stats,
            })
        })
        .collect();
    ok(&req.id, json!({ "loadId": wb.load_id, "tests": tests }))
}

fn handle_tests_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let wb = match loaded(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match wb.test(&name) {
        Some(t) => ok(&req.id, json!(t)),
        None => err(
            &req.id,
            "not_found",
            format!("no test named {name}"),
            Some(json!({ "name": name })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "tests.list" => Some(handle_tests_list(state, req)),
        "tests.open" => Some(handle_tests_open(state, req)),
        _ => None,
    }
}
