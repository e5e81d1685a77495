use crate::sheet::{row_is_empty, Cell, RawSheet};
use serde::Serialize;

/// Rows scanned when looking for the header.
pub const HEADER_SCAN_ROWS: usize = 25;

const ID_TOKENS: &[&str] = &["studentid", "id", "regno", "rollno"];
const CORRECT_TOKENS: &[&str] = &["correct", "right"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    Name,
    Correct,
    Wrong,
    Score,
}

/// A header-cell matcher: the cell slug must contain one of `any_of` and none
/// of `none_of`.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    pub field: Field,
    pub any_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
}

impl HeaderRule {
    pub fn matches(&self, slug: &str) -> bool {
        self.any_of.iter().any(|k| slug.contains(k))
            && !self.none_of.iter().any(|k| slug.contains(k))
    }
}

/// Evaluated in order per header cell; the first matching rule claims the cell.
pub const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        field: Field::Id,
        any_of: &["studentid", "id", "regno", "rollno", "admissionno"],
        none_of: &["email", "name"],
    },
    HeaderRule {
        field: Field::Name,
        any_of: &["studentname", "name", "candidate"],
        none_of: &["id"],
    },
    HeaderRule {
        field: Field::Correct,
        any_of: &["correct", "right"],
        none_of: &["incorrect"],
    },
    HeaderRule {
        field: Field::Wrong,
        any_of: &["wrong", "incorrect", "negative"],
        none_of: &[],
    },
    HeaderRule {
        field: Field::Score,
        any_of: &["totalmarks", "score"],
        none_of: &[],
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMap {
    pub id: Option<usize>,
    pub name: Option<usize>,
    pub correct: Option<usize>,
    pub wrong: Option<usize>,
    pub score: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<usize>,
}

impl ColumnMap {
    /// Fixed layout assumed when no header row can be found.
    pub const FALLBACK: ColumnMap = ColumnMap {
        id: Some(0),
        series: Some(1),
        name: Some(2),
        correct: Some(3),
        wrong: Some(4),
        score: Some(5),
    };

    fn slot(&mut self, field: Field) -> &mut Option<usize> {
        match field {
            Field::Id => &mut self.id,
            Field::Name => &mut self.name,
            Field::Correct => &mut self.correct,
            Field::Wrong => &mut self.wrong,
            Field::Score => &mut self.score,
        }
    }

    pub fn from_header(row: &[Cell]) -> ColumnMap {
        let mut map = ColumnMap::default();
        for (idx, cell) in row.iter().enumerate() {
            let slug = cell.slug();
            let Some(rule) = HEADER_RULES.iter().find(|r| r.matches(&slug)) else {
                continue;
            };
            let slot = map.slot(rule.field);
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        map
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDetection {
    pub row: usize,
    pub columns: ColumnMap,
    pub fallback: bool,
}

fn is_header_row(row: &[Cell]) -> bool {
    row.iter().map(Cell::slug).any(|slug| {
        ID_TOKENS.iter().any(|k| slug.contains(k)) || CORRECT_TOKENS.iter().any(|k| slug.contains(k))
    })
}

pub fn detect_header(sheet: &RawSheet) -> HeaderDetection {
    for (i, row) in sheet.rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        if row.is_empty() {
            continue;
        }
        if is_header_row(row) {
            return HeaderDetection {
                row: i,
                columns: ColumnMap::from_header(row),
                fallback: false,
            };
        }
    }
    HeaderDetection {
        row: 0,
        columns: ColumnMap::FALLBACK,
        fallback: true,
    }
}

/// One student's result in one test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub correct: i64,
    pub wrong: i64,
    pub score: i64,
    pub rank: usize,
    pub percentile: f64,
    pub predicted_percentile: f64,
}

impl StudentRecord {
    pub fn new(id: impl Into<String>, name: Option<String>, correct: i64, wrong: i64) -> Self {
        Self {
            id: id.into(),
            name,
            correct,
            wrong,
            score: derive_score(correct, wrong),
            rank: 0,
            percentile: 0.0,
            predicted_percentile: 0.0,
        }
    }
}

/// +4 per correct answer, -1 per wrong answer. Any score column in the sheet
/// is ignored.
pub fn derive_score(correct: i64, wrong: i64) -> i64 {
    correct.saturating_mul(4).saturating_sub(wrong)
}

/// Upper bound for a correct/wrong count read from a sheet.
pub const MAX_COUNT: f64 = u32::MAX as f64;

fn count_cell(row: &[Cell], col: Option<usize>) -> i64 {
    let v = col
        .and_then(|c| row.get(c))
        .and_then(Cell::as_number)
        .unwrap_or(0.0);
    if v.is_finite() && v > 0.0 {
        v.min(MAX_COUNT).trunc() as i64
    } else {
        0
    }
}

pub fn extract_records(sheet: &RawSheet, header: &HeaderDetection) -> Vec<StudentRecord> {
    let cols = header.columns;
    let Some(id_col) = cols.id else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for row in sheet.rows.iter().skip(header.row + 1) {
        if row_is_empty(row) {
            continue;
        }
        let id = row
            .get(id_col)
            .map(Cell::as_key_text)
            .unwrap_or_default()
            .trim()
            .to_string();
        if id.is_empty() {
            continue;
        }
        let name = cols
            .name
            .and_then(|c| row.get(c))
            .filter(|c| !c.is_blank())
            .map(|c| c.as_text().trim().to_string());
        let correct = count_cell(row, cols.correct);
        let wrong = count_cell(row, cols.wrong);
        out.push(StudentRecord::new(id, name, correct, wrong));
    }
    out
}

pub fn normalize(sheet: &RawSheet) -> Vec<StudentRecord> {
    let header = detect_header(sheet);
    extract_records(sheet, &header)
}
