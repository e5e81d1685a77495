use serde::{Deserialize, Serialize};

/// One decoded spreadsheet cell. Decoders never produce formulas, only the
/// cached value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn from_json(v: &serde_json::Value) -> Cell {
        match v {
            serde_json::Value::Null => Cell::Empty,
            serde_json::Value::Bool(b) => Cell::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            serde_json::Value::String(s) if s.is_empty() => Cell::Empty,
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display text of the cell. Numbers print without a trailing `.0`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
        }
    }

    /// Text used as a record key. Falsy cells (`0`, `false`, empty) give an
    /// empty key, which the normalizer treats as "no id".
    pub fn as_key_text(&self) -> String {
        match self {
            Cell::Number(n) if *n == 0.0 || n.is_nan() => String::new(),
            Cell::Bool(false) => String::new(),
            other => other.as_text(),
        }
    }

    /// Lenient numeric coercion: blank text is zero, unparseable is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_lenient_number(s),
        }
    }

    /// Lower-cased text with every non `[a-z0-9]` character removed.
    pub fn slug(&self) -> String {
        slugify(&self.as_text())
    }
}

pub fn slugify(s: &str) -> String {
    s.chars()
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

pub fn parse_lenient_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return Some(0.0);
    }
    t.parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Header-less grid of cells exactly as read from one worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn from_json_rows(rows: &[serde_json::Value]) -> Self {
        let rows = rows
            .iter()
            .map(|r| {
                r.as_array()
                    .map(|cells| cells.iter().map(Cell::from_json).collect())
                    .unwrap_or_default()
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

pub fn row_is_empty(row: &[Cell]) -> bool {
    row.is_empty() || row.iter().all(|c| matches!(c, Cell::Empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slug_strips_punctuation_and_case() {
        assert_eq!(slugify("Student ID"), "studentid");
        assert_eq!(slugify("Reg. No."), "regno");
        assert_eq!(slugify("Total_Marks (300)"), "totalmarks300");
        assert_eq!(Cell::Number(42.0).slug(), "42");
    }

    #[test]
    fn numeric_coercion_is_lenient() {
        assert_eq!(Cell::Text(" 12 ".into()).as_number(), Some(12.0));
        assert_eq!(Cell::Text("".into()).as_number(), Some(0.0));
        assert_eq!(Cell::Text("abc".into()).as_number(), None);
        assert_eq!(Cell::Bool(true).as_number(), Some(1.0));
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn key_text_treats_falsy_cells_as_missing() {
        assert_eq!(Cell::Number(101.0).as_key_text(), "101");
        assert_eq!(Cell::Number(0.0).as_key_text(), "");
        assert_eq!(Cell::Bool(false).as_key_text(), "");
        assert_eq!(Cell::Text(" S1 ".into()).as_key_text(), " S1 ");
    }

    #[test]
    fn json_rows_keep_gaps() {
        let sheet = RawSheet::from_json_rows(&[
            json!(["ID", null, "Name"]),
            json!([]),
            json!([7, true, ""]),
        ]);
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.cell(0, 1), Some(&Cell::Empty));
        assert!(row_is_empty(&sheet.rows[1]));
        assert_eq!(sheet.cell(2, 0), Some(&Cell::Number(7.0)));
        assert_eq!(sheet.cell(2, 2), Some(&Cell::Empty));
    }
}
