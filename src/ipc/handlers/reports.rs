use crate::fetch::{report_url, scrape_report};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::report::{analyze, transform_report};
use serde_json::json;
use tracing::warn;

fn analysis_result(raw: &serde_json::Value) -> serde_json::Value {
    let report = transform_report(raw);
    let analysis = analyze(&report);
    json!({ "report": report, "analysis": analysis })
}

fn handle_report_analyze(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(raw) = req.params.get("report").filter(|v| v.is_object()) else {
        return err(&req.id, "bad_params", "missing report object", None);
    };
    ok(&req.id, analysis_result(raw))
}

fn handle_report_fetch(state: &mut AppState, req: &Request) -> serde_json::Value {
    let url = match optional_str(req, "reportUrl") {
        Some(u) => u,
        None => {
            let base = match required_str(req, "reportBaseUrl") {
                Ok(v) => v,
                Err(_) => {
                    return err(
                        &req.id,
                        "bad_params",
                        "missing reportUrl or reportBaseUrl",
                        None,
                    )
                }
            };
            let student_id = match required_str(req, "studentId") {
                Ok(v) => v,
                Err(e) => return e,
            };
            report_url(&base, &student_id)
        }
    };
    let raw = match scrape_report(
        &state.config.scrape_endpoint,
        &url,
        state.config.http_timeout(),
    ) {
        Ok(v) => v,
        Err(e) => {
            warn!(report_url = %url, error = %e, "report scrape failed");
            return err(
                &req.id,
                "scrape_failed",
                format!("{e:#}"),
                Some(json!({ "reportUrl": url })),
            );
        }
    };
    let mut result = analysis_result(&raw);
    result["reportUrl"] = json!(url);
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "report.analyze" => Some(handle_report_analyze(state, req)),
        "report.fetch" => Some(handle_report_fetch(state, req)),
        _ => None,
    }
}
