use crate::normalize::StudentRecord;
use crate::percentile::{predict_percentile, PercentileTable};
use serde::Serialize;
use std::cmp::Ordering;

/// Half-away-from-zero rounding to 2 decimals, as displayed in class stats.
pub fn round_off_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// A domain failure, rendered by `ipc::error::calc_err` as an `err` envelope.
#[derive(Debug, Clone)]
pub struct CalcError {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl CalcError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStats {
    pub total_students: usize,
    pub max_score: i64,
    pub min_score: i64,
    pub avg_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDataset {
    pub name: String,
    pub students: Vec<StudentRecord>,
    pub stats: TestStats,
}

impl TestDataset {
    pub fn find_student(&self, student_id: &str) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.id == student_id)
    }
}

pub fn compute_stats(sorted: &[StudentRecord]) -> TestStats {
    if sorted.is_empty() {
        return TestStats::default();
    }
    let total = sorted.len();
    let sum = sorted.iter().fold(0i64, |acc, s| acc.saturating_add(s.score));
    TestStats {
        total_students: total,
        max_score: sorted.iter().map(|s| s.score).max().unwrap_or(0),
        min_score: sorted.iter().map(|s| s.score).min().unwrap_or(0),
        avg_score: round_off_2_decimals(sum as f64 / total as f64),
    }
}

/// Standard competition ranking: equal scores share the rank of the first of
/// the tie, the next lower score takes its 1-based position.
pub fn assign_competition_ranks(sorted: &mut [StudentRecord]) {
    let total = sorted.len();
    let mut rank = 1;
    let mut greater = 0;
    for i in 0..total {
        if i > 0 && sorted[i].score < sorted[i - 1].score {
            rank = i + 1;
            greater = i;
        }
        let at_or_below = total - greater;
        let s = &mut sorted[i];
        s.rank = rank;
        s.percentile = round_off_2_decimals(at_or_below as f64 / total as f64 * 100.0);
    }
}

/// Sorts one test's records by score, ranks them, and fills class and
/// national percentiles.
pub fn rank_students(
    name: impl Into<String>,
    records: Vec<StudentRecord>,
    table: PercentileTable,
) -> TestDataset {
    let mut students = records;
    // Vec::sort_by is stable, ties keep sheet order.
    students.sort_by(|a, b| b.score.cmp(&a.score));
    assign_competition_ranks(&mut students);
    for s in students.iter_mut() {
        s.predicted_percentile = predict_percentile(s.score as f64, table);
    }
    let stats = compute_stats(&students);
    TestDataset {
        name: name.into(),
        students,
        stats,
    }
}

fn natural_chunks(s: &str) -> Vec<(bool, String)> {
    let mut out: Vec<(bool, String)> = Vec::new();
    for c in s.chars() {
        let digit = c.is_ascii_digit();
        match out.last_mut() {
            Some((d, buf)) if *d == digit => buf.push(c),
            _ => out.push((digit, c.to_string())),
        }
    }
    out
}

/// Case-insensitive compare where digit runs compare by value, so
/// "Test 2" sorts before "Test 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let ca = natural_chunks(&a.to_lowercase());
    let cb = natural_chunks(&b.to_lowercase());
    for (x, y) in ca.iter().zip(cb.iter()) {
        let ord = match (x, y) {
            ((true, xs), (true, ys)) => {
                let xt = xs.trim_start_matches('0');
                let yt = ys.trim_start_matches('0');
                xt.len().cmp(&yt.len()).then_with(|| xt.cmp(yt))
            }
            ((_, xs), (_, ys)) => xs.cmp(ys),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ca.len().cmp(&cb.len())
}
