use crate::aggregate::{display_test_name, leaderboard};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{loaded, optional_limit, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_leaderboard_overall(state: &mut AppState, req: &Request) -> serde_json::Value {
    let limit = match optional_limit(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let wb = match loaded(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mut rows = leaderboard(&wb.tests);
    let total = rows.len();
    if let Some(n) = limit {
        rows.truncate(n);
    }
    let tests: Vec<&str> = wb.tests.iter().map(|t| display_test_name(&t.name)).collect();
    ok(
        &req.id,
        json!({ "tests": tests, "total": total, "rows": rows }),
    )
}

fn handle_leaderboard_test(state: &mut AppState, req: &Request) -> serde_json::Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let limit = match optional_limit(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let wb = match loaded(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(test) = wb.test(&name) else {
        return err(
            &req.id,
            "not_found",
            format!("no test named {name}"),
            Some(json!({ "name": name })),
        );
    };
    let take = limit.unwrap_or(test.students.len());
    let rows: Vec<_> = test.students.iter().take(take).collect();
    ok(
        &req.id,
        json!({
            "name": test.name,
            "stats": test.stats,
            "total": test.students.len(),
            "rows": rows,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "leaderboard.overall" => Some(handle_leaderboard_overall(state, req)),
        "leaderboard.test" => Some(handle_leaderboard_test(state, req)),
        _ => None,
    }
}
