use crate::colleges::predict_colleges;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::percentile::{predict_percentile_lenient, PercentileTable};
use crate::sheet::parse_lenient_number;
use serde_json::json;

fn score_param<'a>(req: &'a Request) -> Result<&'a serde_json::Value, serde_json::Value> {
    req.params
        .get("score")
        .ok_or_else(|| err(&req.id, "bad_params", "missing score", None))
}

fn handle_percentile_predict(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match score_param(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let table = req
        .params
        .get("table")
        .and_then(|v| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .map(|y| PercentileTable::from_year(&y))
        .unwrap_or(state.config.percentile_table);
    let percentile = predict_percentile_lenient(raw, table);
    ok(
        &req.id,
        json!({ "score": raw, "percentile": percentile, "table": table.as_str() }),
    )
}

fn handle_colleges_predict(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match score_param(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let score = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_lenient_number(s),
        _ => None,
    };
    let Some(score) = score.filter(|s| s.is_finite()) else {
        return err(
            &req.id,
            "bad_params",
            "score must be a number",
            Some(json!({ "score": raw })),
        );
    };
    ok(&req.id, json!(predict_colleges(score)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "percentile.predict" => Some(handle_percentile_predict(state, req)),
        "colleges.predict" => Some(handle_colleges_predict(state, req)),
        _ => None,
    }
}
