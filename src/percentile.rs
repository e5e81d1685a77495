use serde::{Deserialize, Serialize};

/// A contiguous score band out of 300 and the national percentile range it
/// maps onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
    pub p_min: f64,
    pub p_max: f64,
}

const fn band(min: f64, max: f64, p_min: f64, p_max: f64) -> Band {
    Band {
        min,
        max,
        p_min,
        p_max,
    }
}

pub const JEE_MAIN_2024: &[Band] = &[
    band(281.0, 300.0, 99.99989145, 100.00000000),
    band(271.0, 280.0, 99.99468100, 99.99739400),
    band(263.0, 270.0, 99.99099000, 99.99402900),
    band(250.0, 262.0, 99.97720500, 99.98881900),
    band(241.0, 250.0, 99.96016300, 99.97503400),
    band(231.0, 240.0, 99.93498000, 99.95636400),
    band(221.0, 230.0, 99.90111300, 99.92890100),
    band(211.0, 220.0, 99.85161600, 99.89373200),
    band(201.0, 210.0, 99.79506300, 99.84521200),
    band(191.0, 200.0, 99.71083100, 99.78247200),
    band(181.0, 190.0, 99.68857900, 99.73999000),
    band(171.0, 180.0, 99.45693900, 99.57319300),
    band(161.0, 170.0, 99.27208400, 99.43121400),
    band(151.0, 160.0, 99.02861400, 99.23973700),
    band(141.0, 150.0, 98.73238900, 98.99029600),
    band(131.0, 140.0, 98.31741400, 98.66693500),
    band(121.0, 130.0, 97.81126000, 98.25413200),
    band(111.0, 120.0, 97.14293700, 97.68567200),
    band(101.0, 110.0, 96.20455000, 96.97827200),
    band(91.0, 100.0, 94.99859400, 96.06485000),
    band(81.0, 90.0, 93.47123100, 94.74947900),
    band(71.0, 80.0, 91.07212800, 93.15297100),
    band(61.0, 70.0, 87.51222500, 90.70220000),
    band(51.0, 60.0, 82.01606200, 86.90794400),
    band(41.0, 50.0, 73.28780800, 80.98215300),
    band(31.0, 40.0, 58.15149000, 71.30205200),
    band(21.0, 30.0, 37.39452900, 56.56931000),
    band(11.0, 20.0, 13.49584900, 33.22912800),
    band(0.0, 10.0, 0.84351770, 9.69540660),
];

pub const JEE_MAIN_2025: &[Band] = &[
    band(281.0, 300.0, 99.99989145, 100.00000000),
    band(271.0, 280.0, 99.99468100, 99.99739400),
    band(263.0, 270.0, 99.99099000, 99.99402900),
    band(250.0, 262.0, 99.97720500, 99.98881900),
    band(241.0, 250.0, 99.96016300, 99.97503400),
    band(231.0, 240.0, 99.93498000, 99.95636400),
    band(221.0, 230.0, 99.90111300, 99.92890100),
    band(211.0, 220.0, 99.85161600, 99.89373200),
    band(201.0, 210.0, 99.79506300, 99.84521200),
    band(191.0, 200.0, 99.71083100, 99.78247200),
    band(181.0, 190.0, 99.59739900, 99.68857900),
    band(171.0, 180.0, 99.45693900, 99.57319300),
    band(161.0, 170.0, 99.27208400, 99.43121400),
    band(151.0, 160.0, 99.02861400, 99.23973700),
    band(141.0, 150.0, 98.73238900, 98.99029600),
    band(131.0, 140.0, 98.31741400, 98.66693500),
    band(121.0, 130.0, 97.81126000, 98.25413200),
    band(111.0, 120.0, 97.14293700, 97.68567200),
    band(101.0, 110.0, 96.20455000, 96.97827200),
    band(91.0, 100.0, 94.99859400, 96.06485000),
    band(81.0, 90.0, 93.47123100, 94.74947900),
    band(71.0, 80.0, 91.07212800, 93.15297100),
    band(61.0, 70.0, 87.51222500, 90.70220000),
    band(51.0, 60.0, 82.01606200, 86.90794400),
    band(41.0, 50.0, 73.28780800, 80.98215300),
    band(31.0, 40.0, 58.15149000, 71.30205200),
    band(21.0, 30.0, 37.69452900, 56.56931000),
    band(11.0, 20.0, 13.49584900, 33.22912800),
    band(0.0, 10.0, 0.84351770, 9.69540660),
];

pub const MAX_SCORE: f64 = 300.0;

// Saturating-exponential fit of past marks-vs-percentile data.
const MODEL_B: f64 = 0.0315;
const MODEL_C: f64 = 50.0;
const MODEL_N: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PercentileTable {
    #[serde(rename = "2024")]
    Jee2024,
    #[default]
    #[serde(rename = "2025")]
    Jee2025,
}

impl PercentileTable {
    /// Anything other than "2024" selects the current table.
    pub fn from_year(year: &str) -> Self {
        if year.trim() == "2024" {
            PercentileTable::Jee2024
        } else {
            PercentileTable::Jee2025
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PercentileTable::Jee2024 => "2024",
            PercentileTable::Jee2025 => "2025",
        }
    }

    pub fn bands(self) -> &'static [Band] {
        match self {
            PercentileTable::Jee2024 => JEE_MAIN_2024,
            PercentileTable::Jee2025 => JEE_MAIN_2025,
        }
    }
}

pub fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}

fn model_raw(x: f64) -> f64 {
    (1.0 - (-MODEL_B * (x + MODEL_C)).exp()).powi(MODEL_N)
}

/// Closed-form estimate used where the table has no band.
pub fn model_percentile(score: f64) -> f64 {
    let p = 100.0 * model_raw(score) / model_raw(MAX_SCORE);
    p.clamp(0.0, 100.0)
}

/// Linear interpolation inside the first band containing `score`.
pub fn interpolate(score: f64, bands: &[Band]) -> Option<f64> {
    let b = bands.iter().find(|b| score >= b.min && score <= b.max)?;
    if b.max == b.min {
        return Some(b.p_max);
    }
    let ratio = (score - b.min) / (b.max - b.min);
    Some(b.p_min + ratio * (b.p_max - b.p_min))
}

pub fn predict_percentile(score: f64, table: PercentileTable) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    if let Some(p) = interpolate(score, table.bands()) {
        return round_to(p, 7);
    }
    if score > MAX_SCORE {
        return 100.0;
    }
    if score < 0.0 {
        return 0.0;
    }
    // Fractional scores that fall between two integer bands.
    round_to(model_percentile(score), 7)
}

/// Accepts a JSON number or numeric string; anything else predicts 0.
pub fn predict_percentile_lenient(raw: &serde_json::Value, table: PercentileTable) -> f64 {
    let score = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => crate::sheet::parse_lenient_number(s),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        serde_json::Value::Null => Some(0.0),
        _ => None,
    };
    match score {
        Some(s) => predict_percentile(s, table),
        None => 0.0,
    }
}
