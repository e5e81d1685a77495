mod test_support;

use serde_json::json;
use std::io::{BufRead, Write};
use test_support::{request, request_err, request_ok, spawn_sidecar};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health["loaded"], json!(false));
    assert_eq!(health["testCount"], json!(0));
    assert_eq!(health["percentileTable"], json!("2025"));

    // Every family answers, none falls through to not_implemented.
    let calls = [
        ("tests.list", json!({})),
        ("tests.open", json!({ "name": "Mock 1" })),
        ("student.history", json!({ "studentId": "S1" })),
        ("leaderboard.overall", json!({})),
        ("leaderboard.test", json!({ "name": "Mock 1" })),
        ("percentile.predict", json!({ "score": 120 })),
        ("colleges.predict", json!({ "score": 200 })),
        ("report.analyze", json!({ "report": {} })),
        ("workbook.loadRows", json!({ "sheets": [] })),
        ("workbook.load", json!({})),
    ];
    for (i, (method, params)) in calls.into_iter().enumerate() {
        let resp = request(&mut stdin, &mut reader, &format!("c{i}"), method, params);
        let code = resp
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str());
        assert_ne!(code, Some("not_implemented"), "{method} not routed");
    }

    let code = request_err(&mut stdin, &mut reader, "2", "grades.explode", json!({}));
    assert_eq!(code, "not_implemented");

    writeln!(stdin, "{{not json").expect("write garbage");
    stdin.flush().expect("flush");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read bad_json reply");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("json reply");
    assert_eq!(value["ok"], json!(false));
    assert_eq!(value["error"]["code"], json!("bad_json"));

    // The loop keeps serving after a bad line.
    let _ = request_ok(&mut stdin, &mut reader, "3", "health", json!({}));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn queries_before_any_load_report_no_workbook() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    for (i, (method, params)) in [
        ("tests.list", json!({})),
        ("student.history", json!({ "studentId": "S1" })),
        ("leaderboard.overall", json!({})),
    ]
    .into_iter()
    .enumerate()
    {
        let code = request_err(&mut stdin, &mut reader, &i.to_string(), method, params);
        assert_eq!(code, "no_workbook", "{method}");
    }
    drop(stdin);
    let _ = child.wait();
}
