use crate::aggregate::display_test_name;
use crate::calc::CalcError;
use crate::fetch;
use crate::ipc::error::{calc_err, err, ok};
use crate::ipc::helpers::{optional_str, required_str};
use crate::ipc::types::{AppState, Request};
use crate::sheet::RawSheet;
use crate::workbook::{assemble, sha256_hex, LoadedWorkbook};
use crate::xlsx;
use serde_json::json;
use std::path::PathBuf;
use tracing::warn;

fn load_summary(wb: &LoadedWorkbook) -> serde_json::Value {
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
    json!({
        "loadId": wb.load_id,
        "source": wb.source,
        "sourceSha256": wb.source_sha256,
        "loadedAt": wb.loaded_at,
        "tests": tests,
        "skippedSheets": wb.skipped_sheets,
    })
}

fn decode_xlsx(state: &AppState, source: String, bytes: &[u8]) -> Result<LoadedWorkbook, CalcError> {
    let sheets = xlsx::read_workbook(bytes).map_err(|e| {
        warn!(%source, error = %e, "workbook decode failed");
        CalcError::new("decode_failed", format!("{e:#}")).with_details(json!({ "source": source }))
    })?;
    let sheets = sheets.into_iter().map(|s| (s.name, s.sheet)).collect();
    Ok(assemble(
        source,
        Some(sha256_hex(bytes)),
        sheets,
        state.config.percentile_table,
    ))
}

fn install(state: &mut AppState, req: &Request, wb: LoadedWorkbook) -> serde_json::Value {
    let summary = load_summary(&wb);
    state.workbook = Some(wb);
    ok(&req.id, summary)
}

fn handle_workbook_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match required_str(req, "path") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e,
    };
    let bytes = match std::fs::read(&path) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "io_failed",
                format!("failed to read {}: {e}", path.to_string_lossy()),
                None,
            )
        }
    };
    match decode_xlsx(state, path.to_string_lossy().to_string(), &bytes) {
        Ok(wb) => install(state, req, wb),
        Err(e) => calc_err(&req.id, e),
    }
}

fn handle_workbook_fetch(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(url) = optional_str(req, "url").or_else(|| state.config.sheet_url.clone()) else {
        return err(
            &req.id,
            "bad_params",
            "missing url (and no sheet_url configured)",
            None,
        );
    };
    let bytes = match fetch::fetch_workbook(&url, state.config.http_timeout()) {
        Ok(v) => v,
        Err(e) => {
            warn!(%url, error = %e, "workbook fetch failed");
            return err(
                &req.id,
                "fetch_failed",
                format!("{e:#}"),
                Some(json!({ "url": url })),
            );
        }
    };
    match decode_xlsx(state, url, &bytes) {
        Ok(wb) => install(state, req, wb),
        Err(e) => calc_err(&req.id, e),
    }
}

fn parse_row_sheets(req: &Request) -> Result<Vec<(String, RawSheet)>, serde_json::Value> {
    let Some(raw) = req.params.get("sheets").and_then(|v| v.as_array()) else {
        return Err(err(&req.id, "bad_params", "missing sheets", None));
    };
    let mut out = Vec::with_capacity(raw.len());
    for (i, s) in raw.iter().enumerate() {
        let Some(name) = s.get("name").and_then(|v| v.as_str()) else {
            return Err(err(
                &req.id,
                "bad_params",
                "each sheet needs a name",
                Some(json!({ "index": i })),
            ));
        };
        let rows = s
            .get("rows")
            .and_then(|v| v.as_array())
            .map(|rows| RawSheet::from_json_rows(rows))
            .unwrap_or_default();
        out.push((name.to_string(), rows));
    }
    Ok(out)
}

fn handle_workbook_load_rows(state: &mut AppState, req: &Request) -> serde_json::Value {
    let sheets = match parse_row_sheets(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let wb = assemble("rows", None, sheets, state.config.percentile_table);
    install(state, req, wb)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "workbook.load" => Some(handle_workbook_load(state, req)),
        "workbook.fetch" => Some(handle_workbook_fetch(state, req)),
        "workbook.loadRows" => Some(handle_workbook_load_rows(state, req)),
        _ => None,
    }
}
