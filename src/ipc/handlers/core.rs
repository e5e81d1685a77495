use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "loaded": state.workbook.is_some(),
            "testCount": state.workbook.as_ref().map(|w| w.tests.len()).unwrap_or(0),
            "loadId": state.workbook.as_ref().map(|w| w.load_id.clone()),
            "percentileTable": state.config.percentile_table.as_str(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
