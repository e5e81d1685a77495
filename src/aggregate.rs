use crate::calc::{natural_cmp, TestDataset};
use crate::normalize::StudentRecord;
use serde::Serialize;
use std::collections::HashMap;

const WORKBOOK_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv"];

/// Test name with a trailing spreadsheet extension removed.
pub fn display_test_name(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for ext in WORKBOOK_EXTENSIONS {
        if lower.ends_with(ext) {
            return &name[..name.len() - ext.len()];
        }
    }
    name
}

pub fn sort_tests_natural(tests: &mut [TestDataset]) {
    tests.sort_by(|a, b| natural_cmp(&a.name, &b.name));
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub test_name: String,
    #[serde(flatten)]
    pub record: StudentRecord,
    pub class_avg: f64,
    pub topper_score: i64,
}

/// One student's results across tests, in the order the tests are given.
/// Tests the student did not sit are left out.
pub fn history(student_id: &str, tests: &[TestDataset]) -> Vec<HistoryEntry> {
    tests
        .iter()
        .filter_map(|t| {
            let record = t.find_student(student_id)?;
            Some(HistoryEntry {
                test_name: display_test_name(&t.name).to_string(),
                record: record.clone(),
                class_avg: t.stats.avg_score,
                topper_score: t.stats.max_score,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub tests_taken: usize,
    pub latest_score: Option<i64>,
    pub previous_score: Option<i64>,
    pub score_delta: i64,
    pub best_score: Option<i64>,
    pub worst_score: Option<i64>,
    pub best_rank: Option<usize>,
}

pub fn summarize_history(entries: &[HistoryEntry]) -> HistorySummary {
    let latest = entries.last().map(|e| e.record.score);
    let previous = entries
        .len()
        .checked_sub(2)
        .and_then(|i| entries.get(i))
        .map(|e| e.record.score);
    let score_delta = match (latest, previous) {
        (Some(l), Some(p)) => l.saturating_sub(p),
        _ => 0,
    };
    HistorySummary {
        tests_taken: entries.len(),
        latest_score: latest,
        previous_score: previous,
        score_delta,
        best_score: entries.iter().map(|e| e.record.score).max(),
        worst_score: entries.iter().map(|e| e.record.score).min(),
        best_rank: entries.iter().map(|e| e.record.rank).min(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub total_score: i64,
    pub tests_taken: usize,
    pub scores: Vec<i64>,
}

/// Totals per student across every test, ranked by position. Unlike
/// per-test ranking, equal totals get distinct ranks.
pub fn leaderboard(tests: &[TestDataset]) -> Vec<LeaderboardEntry> {
    let mut order: Vec<LeaderboardEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for t in tests {
        for s in &t.students {
            if s.id.is_empty() {
                continue;
            }
            let slot = *index.entry(s.id.clone()).or_insert_with(|| {
                order.push(LeaderboardEntry {
                    rank: 0,
                    id: s.id.clone(),
                    name: s.name.clone(),
                    total_score: 0,
                    tests_taken: 0,
                    scores: Vec::new(),
                });
                order.len() - 1
            });
            let entry = &mut order[slot];
            entry.total_score = entry.total_score.saturating_add(s.score);
            entry.tests_taken += 1;
            entry.scores.push(s.score);
        }
    }

    order.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    for (i, e) in order.iter_mut().enumerate() {
        e.rank = i + 1;
    }
    order
}
