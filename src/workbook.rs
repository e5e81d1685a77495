use crate::aggregate::sort_tests_natural;
use crate::calc::{rank_students, TestDataset};
use crate::normalize::normalize;
use crate::percentile::PercentileTable;
use crate::sheet::RawSheet;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    TooFewRows,
    NoRecords,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSheet {
    pub name: String,
    pub reason: SkipReason,
}

/// The active set of tests plus where it came from. Replaced wholesale on
/// every load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedWorkbook {
    pub load_id: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sha256: Option<String>,
    pub loaded_at: String,
    pub tests: Vec<TestDataset>,
    pub skipped_sheets: Vec<SkippedSheet>,
}

impl LoadedWorkbook {
    pub fn test(&self, name: &str) -> Option<&TestDataset> {
        self.tests.iter().find(|t| t.name == name)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Normalizes and ranks every sheet. A sheet with fewer than two rows or no
/// usable records is skipped, not an error.
pub fn assemble(
    source: impl Into<String>,
    source_sha256: Option<String>,
    sheets: Vec<(String, RawSheet)>,
    table: PercentileTable,
) -> LoadedWorkbook {
    let mut tests = Vec::new();
    let mut skipped_sheets = Vec::new();
    for (name, sheet) in sheets {
        if sheet.len() < 2 {
            debug!(sheet = %name, rows = sheet.len(), "skipping sheet with too few rows");
            skipped_sheets.push(SkippedSheet {
                name,
                reason: SkipReason::TooFewRows,
            });
            continue;
        }
        let records = normalize(&sheet);
        if records.is_empty() {
            debug!(sheet = %name, "skipping sheet with no student records");
            skipped_sheets.push(SkippedSheet {
                name,
                reason: SkipReason::NoRecords,
            });
            continue;
        }
        tests.push(rank_students(name, records, table));
    }
    sort_tests_natural(&mut tests);

    let wb = LoadedWorkbook {
        load_id: uuid::Uuid::new_v4().to_string(),
        source: source.into(),
        source_sha256,
        loaded_at: chrono::Utc::now().to_rfc3339(),
        tests,
        skipped_sheets,
    };
    info!(
        load_id = %wb.load_id,
        source = %wb.source,
        tests = wb.tests.len(),
        skipped = wb.skipped_sheets.len(),
        "workbook loaded"
    );
    wb
}
