mod test_support;

use serde_json::json;
use test_support::{request_ok, spawn_sidecar};

fn load(stdin: &mut std::process::ChildStdin, reader: &mut std::io::BufReader<std::process::ChildStdout>) {
    let _ = request_ok(
        stdin,
        reader,
        "load",
        "workbook.loadRows",
        json!({ "sheets": [
            {
                "name": "Mock 10.xlsx",
                "rows": [
                    ["Roll No", "Student Name", "Correct", "Wrong"],
                    ["S1", "Asha", 60, 10],
                    ["S2", "Bilal", 50, 0],
                    ["S4", "Dev", 20, 30]
                ]
            },
            {
                "name": "Mock 2",
                "rows": [
                    ["Roll No", "Student Name", "Correct", "Wrong"],
                    ["S1", "Asha", 40, 5],
                    ["S2", "Bilal", 45, 0]
                ]
            }
        ]}),
    );
}

#[test]
fn history_follows_natural_test_order_with_trend_summary() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    load(&mut stdin, &mut reader);

    let h = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "student.history",
        json!({ "studentId": "S1" }),
    );
    assert_eq!(h["found"], json!(true));
    assert_eq!(h["name"], json!("Asha"));
    let points: Vec<(&str, i64, i64)> = h["points"]
        .as_array()
        .expect("points")
        .iter()
        .map(|p| {
            (
                p["testName"].as_str().unwrap_or(""),
                p["score"].as_i64().unwrap_or(0),
                p["rank"].as_i64().unwrap_or(0),
            )
        })
        .collect();
    // Extension is dropped from the display name.
    assert_eq!(points, vec![("Mock 2", 155, 2), ("Mock 10", 230, 1)]);
    assert_eq!(h["summary"]["latestScore"], json!(230));
    assert_eq!(h["summary"]["previousScore"], json!(155));
    assert_eq!(h["summary"]["scoreDelta"], json!(75));
    assert_eq!(h["summary"]["bestRank"], json!(1));
    assert_eq!(h["history"][1]["topperScore"], json!(230));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn history_omits_tests_the_student_missed() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    load(&mut stdin, &mut reader);

    let h = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "student.history",
        json!({ "studentId": "S4" }),
    );
    assert_eq!(h["history"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(h["history"][0]["testName"], json!("Mock 10"));
    assert_eq!(h["summary"]["testsTaken"], json!(1));
    assert_eq!(h["summary"]["previousScore"], json!(null));
    assert_eq!(h["summary"]["scoreDelta"], json!(0));

    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "student.history",
        json!({ "studentId": "ZZ" }),
    );
    assert_eq!(missing["found"], json!(false));
    assert_eq!(missing["history"], json!([]));
    assert_eq!(missing["points"], json!([]));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn overall_leaderboard_sums_scores_with_positional_ranks() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    load(&mut stdin, &mut reader);

    let board = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "leaderboard.overall",
        json!({ "limit": 2 }),
    );
    assert_eq!(board["total"], json!(3));
    assert_eq!(board["tests"], json!(["Mock 2", "Mock 10"]));
    let rows: Vec<(i64, &str, i64, i64)> = board["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|r| {
            (
                r["rank"].as_i64().unwrap_or(0),
                r["id"].as_str().unwrap_or(""),
                r["totalScore"].as_i64().unwrap_or(0),
                r["testsTaken"].as_i64().unwrap_or(0),
            )
        })
        .collect();
    assert_eq!(rows, vec![(1, "S1", 385, 2), (2, "S2", 380, 2)]);

    drop(stdin);
    let _ = child.wait();
}
