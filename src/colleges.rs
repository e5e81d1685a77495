use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub rank: u32,
    pub name: &'static str,
    /// Approximate safe score out of 300 for CSE, General category.
    pub score: i64,
    pub location: &'static str,
}

const fn college(rank: u32, name: &'static str, score: i64, location: &'static str) -> College {
    College {
        rank,
        name,
        score,
        location,
    }
}

pub const NIT_CSE_GENERAL: &[College] = &[
    college(1, "NIT Trichy", 275, "Tamil Nadu"),
    college(2, "NIT Warangal", 265, "Telangana"),
    college(3, "NIT Surathkal", 260, "Karnataka"),
    college(4, "MNNIT Allahabad", 250, "Uttar Pradesh"),
    college(5, "NIT Rourkela", 245, "Odisha"),
    college(6, "NIT Calicut", 240, "Kerala"),
    college(7, "MNIT Jaipur", 235, "Rajasthan"),
    college(8, "VNIT Nagpur", 230, "Maharashtra"),
    college(9, "NIT Kurukshetra", 225, "Haryana"),
    college(10, "NIT Durgapur", 220, "West Bengal"),
    college(11, "SVNIT Surat", 215, "Gujarat"),
    college(12, "MANIT Bhopal", 210, "Madhya Pradesh"),
    college(13, "NIT Delhi", 208, "Delhi"),
    college(14, "NIT Raipur", 205, "Chhattisgarh"),
    college(15, "NIT Jalandhar", 200, "Punjab"),
    college(16, "NIT Hamirpur", 195, "Himachal Pradesh"),
    college(17, "NIT Goa", 190, "Goa"),
    college(18, "NIT Silchar", 185, "Assam"),
    college(19, "NIT Puducherry", 180, "Puducherry"),
    college(20, "NIT Patna", 175, "Bihar"),
];

/// Within this many marks below the cutoff a college counts as reachable.
pub const REACHABLE_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Admission {
    Secure,
    Reachable,
    Dream,
}

/// Fractional scores compare as-is; a score never overflows the difference.
pub fn classify(score: f64, cutoff: i64) -> Admission {
    let diff = score - cutoff as f64;
    if diff >= 0.0 {
        Admission::Secure
    } else if diff >= -REACHABLE_MARGIN {
        Admission::Reachable
    } else {
        Admission::Dream
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeOutlook {
    #[serde(flatten)]
    pub college: College,
    pub status: Admission,
    pub diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegePrediction {
    pub score: f64,
    pub colleges: Vec<CollegeOutlook>,
    pub secure_count: usize,
    pub total: usize,
    /// The lowest-cutoff college not yet secured.
    pub next_target: Option<CollegeOutlook>,
}

pub fn predict_colleges(score: f64) -> CollegePrediction {
    let colleges: Vec<CollegeOutlook> = NIT_CSE_GENERAL
        .iter()
        .map(|c| CollegeOutlook {
            college: *c,
            status: classify(score, c.score),
            diff: score - c.score as f64,
        })
        .collect();
    let secure_count = colleges
        .iter()
        .filter(|c| c.status == Admission::Secure)
        .count();
    let next_target = colleges
        .iter()
        .filter(|c| c.status != Admission::Secure)
        .last()
        .cloned();
    CollegePrediction {
        score,
        total: colleges.len(),
        colleges,
        secure_count,
        next_target,
    }
}
