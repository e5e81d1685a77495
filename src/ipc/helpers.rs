use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::workbook::LoadedWorkbook;
use serde_json::json;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `limit` must be a positive integer when present.
pub fn optional_limit(req: &Request) -> Result<Option<usize>, serde_json::Value> {
    match req.params.get("limit") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .filter(|n| *n > 0)
            .map(|n| Some(n as usize))
            .ok_or_else(|| {
                err(
                    &req.id,
                    "bad_params",
                    "limit must be a positive integer",
                    Some(json!({ "limit": v })),
                )
            }),
    }
}

pub fn loaded<'a>(state: &'a AppState, req: &Request) -> Result<&'a LoadedWorkbook, serde_json::Value> {
    state
        .workbook
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workbook", "load a workbook first", None))
}
