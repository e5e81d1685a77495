//! Per-student report analysis over the scrape service's JSON.
//!
//! The scrape payload is loosely typed (numbers often arrive as strings such as
//! `"57"` or `"82.5%"`), so every numeric read goes through [`lenient_f64`] and a
//! missing section becomes an empty one.

use serde::Serialize;
use serde_json::{Map, Value};

/// Marks gained per correct answer, used for "potential" estimates.
pub const MARKS_PER_QUESTION: f64 = 4.0;
const HIGH_PERFORMER_PERCENTILE: f64 = 97.0;

/// Leading-number parse: `"82.5%"` is 82.5, `"abc"` is `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in t.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    t[..end].parse::<f64>().ok()
}

pub fn lenient_f64(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

fn text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub name: String,
    pub score: Option<f64>,
    pub accuracy: Option<f64>,
    pub attempt: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    pub stats: Map<String, Value>,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub overall: Map<String, Value>,
    pub subjects: Vec<Subject>,
}

impl Report {
    fn overall_f64(&self, key: &str) -> Option<f64> {
        lenient_f64(self.overall.get(key))
    }

    fn is_high_performer(&self) -> bool {
        self.overall_f64("Percentile")
            .map(|p| p >= HIGH_PERFORMER_PERCENTILE)
            .unwrap_or(false)
    }
}

/// Maps the scrape service payload onto [`Report`]. Missing sections are
/// empty, never an error.
pub fn transform_report(api: &Value) -> Report {
    let overall = api
        .get("overallPerformance")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let subjects = api
        .get("subjectPerformance")
        .and_then(Value::as_array)
        .map(|subs| {
            subs.iter()
                .map(|sub| Subject {
                    name: text(sub.get("subject")),
                    stats: sub
                        .get("stats")
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default(),
                    chapters: sub
                        .get("chapters")
                        .and_then(Value::as_array)
                        .map(|chs| {
                            chs.iter()
                                .map(|c| Chapter {
                                    name: text(c.get("chapter")),
                                    score: lenient_f64(c.get("score")),
                                    accuracy: lenient_f64(c.get("accuracy")),
                                    attempt: lenient_f64(c.get("attemptRate")),
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();
    Report { overall, subjects }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthTag {
    Excellent,
    #[serde(rename = "Good / Stable")]
    GoodStable,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectHealth {
    pub score: f64,
    pub tag: HealthTag,
    pub attempt_rate: f64,
}

/// Subject Health Index: 40% accuracy, 40% attempt rate, 20% marks relative
/// to the topper (capped at 1).
pub fn subject_health(stats: &Map<String, Value>) -> SubjectHealth {
    let get = |k: &str| lenient_f64(stats.get(k));
    let accuracy = get("Accuracy").unwrap_or(0.0);

    let counts = (
        get("Correct Answers"),
        get("Wrong Answers"),
        get("Questions Skipped"),
    );
    let attempt_rate = match counts {
        (Some(c), Some(w), Some(s)) if c.trunc() + w.trunc() + s.trunc() > 0.0 => {
            (c.trunc() + w.trunc()) / (c.trunc() + w.trunc() + s.trunc()) * 100.0
        }
        _ => 0.0,
    };

    let topper = get("Topper Marks").filter(|t| *t != 0.0).unwrap_or(100.0);
    let marks = get("Marks").unwrap_or(0.0);
    let performance = (marks / topper).clamp(0.0, 1.0) * 100.0;

    let shi = accuracy * 0.4 + attempt_rate * 0.4 + performance * 0.2;
    let tag = if shi >= 80.0 {
        HealthTag::Excellent
    } else if shi >= 60.0 {
        HealthTag::GoodStable
    } else if shi >= 40.0 {
        HealthTag::MediumRisk
    } else {
        HealthTag::Critical
    };
    SubjectHealth {
        score: round1(shi),
        tag,
        attempt_rate: round1(attempt_rate),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChapterStatus {
    Trap,
    Strong,
    Unattempted,
    Partial,
    Weak,
}

impl ChapterStatus {
    pub fn message(self) -> &'static str {
        match self {
            ChapterStatus::Trap => "High negative marks! Concept revision needed.",
            ChapterStatus::Strong => "Bankable chapter. Maintain revision.",
            ChapterStatus::Unattempted => "Potential scoring opportunity if easy.",
            ChapterStatus::Partial => "Accuracy needs improvement.",
            ChapterStatus::Weak => "Re-learn basics.",
        }
    }
}

pub fn classify_chapter(chapter: &Chapter) -> ChapterStatus {
    let acc = chapter.accuracy.unwrap_or(0.0);
    let score = chapter.score.unwrap_or(0.0);
    let attempt = chapter.attempt.unwrap_or(0.0);
    if attempt > 80.0 && acc < 30.0 {
        ChapterStatus::Trap
    } else if acc >= 90.0 && score >= 4.0 {
        ChapterStatus::Strong
    } else if attempt == 0.0 {
        ChapterStatus::Unattempted
    } else if (50.0..90.0).contains(&acc) {
        ChapterStatus::Partial
    } else {
        ChapterStatus::Weak
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quadrants {
    pub strength: Vec<String>,
    pub underutilized: Vec<String>,
    pub risk: Vec<String>,
    pub weak: Vec<String>,
}

pub fn quadrants(chapters: &[Chapter]) -> Quadrants {
    let mut q = Quadrants::default();
    for c in chapters {
        // Missing accuracy or attempt counts as weak.
        let bucket = match (c.accuracy, c.attempt) {
            (Some(acc), Some(att)) => match (acc >= 70.0, att >= 70.0) {
                (true, true) => &mut q.strength,
                (true, false) => &mut q.underutilized,
                (false, true) => &mut q.risk,
                (false, false) => &mut q.weak,
            },
            _ => &mut q.weak,
        };
        bucket.push(c.name.clone());
    }
    q
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub title: String,
    pub text: String,
}

pub fn insights(report: &Report) -> Vec<Insight> {
    let mut tips = Vec::new();
    let accuracy = report.overall_f64("Accuracy");
    let percentage = report.overall_f64("Percentage");

    match (accuracy, percentage) {
        (Some(a), Some(p)) if a > 85.0 && p < 60.0 => tips.push(Insight {
            title: "Strategy Alert: Play Bolder".to_string(),
            text: "Your accuracy is elite (>85%), but you aren't attempting enough. Safe to increase attempts by 10-15% next mock.".to_string(),
        }),
        (Some(a), _) if a < 75.0 => tips.push(Insight {
            title: "Negative Marking Alert".to_string(),
            text: "You are losing rank to guesses. Prioritize eliminating 'High Risk' chapters.".to_string(),
        }),
        _ => {}
    }

    let strong: Vec<&str> = report
        .subjects
        .iter()
        .filter(|s| subject_health(&s.stats).score > 75.0)
        .map(|s| s.name.as_str())
        .collect();
    if !strong.is_empty() {
        let names = strong.join(" & ");
        tips.push(Insight {
            title: format!("Dominating {names}"),
            text: format!(
                "Your foundation in {names} is rock solid. Focus mainly on maintaining speed here."
            ),
        });
    }

    let critical = report
        .subjects
        .iter()
        .find(|s| subject_health(&s.stats).score < 40.0);
    match critical {
        Some(sub) => tips.push(Insight {
            title: format!("Critical: {}", sub.name),
            text: format!(
                "{} is dragging down your total rank. Immediate intervention needed.",
                sub.name
            ),
        }),
        None => {
            let traps: Vec<&str> = report
                .subjects
                .iter()
                .flat_map(|s| s.chapters.iter())
                .filter(|c| {
                    c.attempt.map(|a| a > 80.0).unwrap_or(false)
                        && c.accuracy.map(|a| a < 40.0).unwrap_or(false)
                })
                .map(|c| c.name.as_str())
                .collect();
            if !traps.is_empty() {
                tips.push(Insight {
                    title: "Trap Detection".to_string(),
                    text: format!(
                        "Stop blind attempts in: {}.",
                        traps.iter().take(3).copied().collect::<Vec<_>>().join(", ")
                    ),
                });
            }
        }
    }

    let cap = if report.is_high_performer() { 4 } else { 5 };
    tips.truncate(cap);
    tips
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanReason {
    Trap,
    Weak,
    Missed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanCategory {
    Immediate,
    Strategic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub subject: String,
    pub name: String,
    pub reason: PlanReason,
    pub potential: f64,
    pub category: PlanCategory,
}

/// Trap and Weak chapters first, then low-attempt chapters not already listed,
/// ordered by marks that could be recovered.
pub fn action_plan(report: &Report) -> Vec<ActionItem> {
    let mut plan = Vec::new();
    for sub in &report.subjects {
        for chap in &sub.chapters {
            let (reason, potential, category) = match classify_chapter(chap) {
                ChapterStatus::Trap => (
                    PlanReason::Trap,
                    chap.score.unwrap_or(0.0).abs() + MARKS_PER_QUESTION,
                    PlanCategory::Immediate,
                ),
                ChapterStatus::Weak => {
                    (PlanReason::Weak, MARKS_PER_QUESTION, PlanCategory::Strategic)
                }
                _ => continue,
            };
            plan.push(ActionItem {
                subject: sub.name.clone(),
                name: chap.name.clone(),
                reason,
                potential,
                category,
            });
        }
    }

    for sub in &report.subjects {
        for chap in &sub.chapters {
            let low_attempt = chap.attempt.map(|a| a < 50.0).unwrap_or(false);
            if !low_attempt || plan.iter().any(|p| p.name == chap.name) {
                continue;
            }
            plan.push(ActionItem {
                subject: sub.name.clone(),
                name: chap.name.clone(),
                reason: PlanReason::Missed,
                potential: MARKS_PER_QUESTION,
                category: PlanCategory::Strategic,
            });
        }
    }

    plan.sort_by(|a, b| {
        b.potential
            .partial_cmp(&a.potential)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    plan.truncate(if report.is_high_performer() { 6 } else { 10 });
    plan
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRef {
    pub subject: String,
    pub name: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedStats {
    pub total_negative: f64,
    pub negative_chapters: Vec<ChapterRef>,
    pub missed_opportunity: f64,
    pub missed_chapters: Vec<ChapterRef>,
}

pub fn advanced_stats(report: &Report) -> AdvancedStats {
    let mut out = AdvancedStats::default();
    for sub in &report.subjects {
        for chap in &sub.chapters {
            let r = || ChapterRef {
                subject: sub.name.clone(),
                name: chap.name.clone(),
                score: chap.score,
            };
            if let Some(score) = chap.score.filter(|s| *s < 0.0) {
                out.total_negative += score.abs();
                out.negative_chapters.push(r());
            }
            if chap.attempt == Some(0.0) {
                out.missed_opportunity += MARKS_PER_QUESTION;
                out.missed_chapters.push(r());
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterAnalysis {
    #[serde(flatten)]
    pub chapter: Chapter,
    pub status: ChapterStatus,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAnalysis {
    pub name: String,
    pub stats: Map<String, Value>,
    pub health: SubjectHealth,
    pub quadrants: Quadrants,
    pub chapters: Vec<ChapterAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnalysis {
    pub overall: Map<String, Value>,
    pub subjects: Vec<SubjectAnalysis>,
    pub insights: Vec<Insight>,
    pub action_plan: Vec<ActionItem>,
    pub advanced: AdvancedStats,
}

pub fn analyze(report: &Report) -> ReportAnalysis {
    let subjects = report
        .subjects
        .iter()
        .map(|s| SubjectAnalysis {
            name: s.name.clone(),
            stats: s.stats.clone(),
            health: subject_health(&s.stats),
            quadrants: quadrants(&s.chapters),
            chapters: s
                .chapters
                .iter()
                .map(|c| {
                    let status = classify_chapter(c);
                    ChapterAnalysis {
                        chapter: c.clone(),
                        status,
                        message: status.message(),
                    }
                })
                .collect(),
        })
        .collect();
    ReportAnalysis {
        overall: report.overall.clone(),
        subjects,
        insights: insights(report),
        action_plan: action_plan(report),
        advanced: advanced_stats(report),
    }
}
