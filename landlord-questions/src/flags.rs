//! Issue records from the upstream analyzers and their tagged `Flag` form.
//!
//! Every flag gets a request-unique id (`text_flag_0`, `missing_info_2`, ...)
//! and the set of those ids is the only vocabulary the generator may cite.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Only the first few negative comments become flags.
pub const MAX_STUDENT_CONCERNS: usize = 3;
const CONCERN_REASON_CHARS: usize = 100;

/// Severity / priority level. Unknown strings normalize to `Medium`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "high" => Severity::High,
            _ => Severity::Medium,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source a flag was raised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    RedFlag,
    MissingInfo,
    PhotoIssue,
    StudentConcern,
}

impl FlagType {
    /// Prefix of ids minted for this source.
    pub fn id_prefix(self) -> &'static str {
        match self {
            FlagType::RedFlag => "text_flag",
            FlagType::MissingInfo => "missing_info",
            FlagType::PhotoIssue => "photo_issue",
            FlagType::StudentConcern => "student_concern",
        }
    }

    pub fn id(self, index: usize) -> String {
        format!("{}_{index}", self.id_prefix())
    }
}

/// Red flag from the listing-text analyzer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RedFlagRecord {
    pub flag: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub reason: String,
}

/// Piece of information the listing does not state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MissingInfoRecord {
    pub item: String,
    #[serde(default)]
    pub importance: Severity,
    #[serde(default)]
    pub why: String,
}

/// Problem spotted in the listing photos.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhotoIssueRecord {
    pub issue: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub explanation: String,
}

/// Classified student comment offered as a possible concern.
///
/// Only comments whose `sentiment` is `"negative"` are turned into flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcernSource {
    pub text: String,
    pub sentiment: String,
    #[serde(default = "general")]
    pub category: String,
}

fn general() -> String {
    "general".to_string()
}

impl ConcernSource {
    pub fn is_negative(&self) -> bool {
        self.sentiment.eq_ignore_ascii_case("negative")
    }
}

/// Any upstream issue, before tagging.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueRecord {
    RedFlag(RedFlagRecord),
    MissingInfo(MissingInfoRecord),
    PhotoIssue(PhotoIssueRecord),
    StudentConcern(ConcernSource),
}

impl IssueRecord {
    pub fn flag_type(&self) -> FlagType {
        match self {
            IssueRecord::RedFlag(_) => FlagType::RedFlag,
            IssueRecord::MissingInfo(_) => FlagType::MissingInfo,
            IssueRecord::PhotoIssue(_) => FlagType::PhotoIssue,
            IssueRecord::StudentConcern(_) => FlagType::StudentConcern,
        }
    }

    /// Converts into a flag carrying the id `<prefix>_<index>`.
    pub fn into_flag(self, index: usize) -> Flag {
        let flag_type = self.flag_type();
        let (description, severity, reason) = match self {
            IssueRecord::RedFlag(r) => (r.flag, r.severity, r.reason),
            IssueRecord::MissingInfo(m) => (format!("Missing: {}", m.item), m.importance, m.why),
            IssueRecord::PhotoIssue(p) => (p.issue, p.severity, p.explanation),
            IssueRecord::StudentConcern(c) => (
                format!("Student feedback: {} concerns", c.category),
                Severity::Medium,
                c.text.chars().take(CONCERN_REASON_CHARS).collect(),
            ),
        };
        Flag {
            id: flag_type.id(index),
            flag_type,
            description,
            severity,
            reason,
        }
    }
}

/// Tagged issue. The id is unique within one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub id: String,
    #[serde(rename = "type")]
    pub flag_type: FlagType,
    pub description: String,
    pub severity: Severity,
    pub reason: String,
}

/// Flags in tag order plus the set of ids the generator may cite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedFlags {
    pub flags: Vec<Flag>,
    pub valid_ids: BTreeSet<String>,
}

impl TaggedFlags {
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.valid_ids.contains(id)
    }

    /// Every id, in tag order.
    pub fn ids(&self) -> Vec<String> {
        self.flags.iter().map(|f| f.id.clone()).collect()
    }
}

/// Tags every issue with a stable id.
///
/// Order: red flags, missing info, photo issues, then the first
/// [`MAX_STUDENT_CONCERNS`] negative comments. Each source has its own index
/// sequence starting at 0. Nothing is deduplicated.
pub fn tag(
    red_flags: &[RedFlagRecord],
    missing_info: &[MissingInfoRecord],
    photo_issues: &[PhotoIssueRecord],
    comments: &[ConcernSource],
) -> TaggedFlags {
    let concerns = comments
        .iter()
        .filter(|c| c.is_negative())
        .take(MAX_STUDENT_CONCERNS);

    let sources: [Vec<IssueRecord>; 4] = [
        red_flags.iter().cloned().map(IssueRecord::RedFlag).collect(),
        missing_info.iter().cloned().map(IssueRecord::MissingInfo).collect(),
        photo_issues.iter().cloned().map(IssueRecord::PhotoIssue).collect(),
        concerns.cloned().map(IssueRecord::StudentConcern).collect(),
    ];

    let mut tagged = TaggedFlags::default();
    for records in sources {
        for (i, record) in records.into_iter().enumerate() {
            let flag = record.into_flag(i);
            tagged.valid_ids.insert(flag.id.clone());
            tagged.flags.push(flag);
        }
    }
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red(flag: &str, severity: &str) -> RedFlagRecord {
        RedFlagRecord {
            flag: flag.into(),
            severity: severity.to_string().into(),
            reason: "r".into(),
        }
    }

    fn concern(text: &str, sentiment: &str) -> ConcernSource {
        ConcernSource {
            text: text.into(),
            sentiment: sentiment.into(),
            category: "noise".into(),
        }
    }

    #[test]
    fn ids_use_independent_indices() {
        let t = tag(
            &[red("Vague pricing", "high"), red("Cash only", "HIGH")],
            &[MissingInfoRecord {
                item: "lease length".into(),
                importance: Severity::Medium,
                why: "w".into(),
            }],
            &[PhotoIssueRecord {
                issue: "Only exterior shots".into(),
                severity: Severity::Low,
                explanation: "e".into(),
            }],
            &[],
        );
        assert_eq!(
            t.ids(),
            vec!["text_flag_0", "text_flag_1", "missing_info_0", "photo_issue_0"]
        );
        assert_eq!(t.flags[1].severity, Severity::High);
        assert_eq!(t.flags[2].description, "Missing: lease length");
        assert_eq!(t.valid_ids.len(), 4);
    }

    #[test]
    fn only_first_three_negative_comments() {
        let comments = vec![
            concern("walls are thin", "negative"),
            concern("great spot", "positive"),
            concern("loud parties", "negative"),
            concern("roaches", "negative"),
            concern("mold", "negative"),
        ];
        let t = tag(&[], &[], &[], &comments);
        assert_eq!(
            t.ids(),
            vec!["student_concern_0", "student_concern_1", "student_concern_2"]
        );
        assert_eq!(t.flags[0].description, "Student feedback: noise concerns");
        assert_eq!(t.flags[0].severity, Severity::Medium);
        assert_eq!(t.flags[2].reason, "roaches");
    }

    #[test]
    fn concern_reason_truncated() {
        let long = "z".repeat(140);
        let t = tag(&[], &[], &[], &[concern(&long, "negative")]);
        assert_eq!(t.flags[0].reason.chars().count(), 100);
    }

    #[test]
    fn unknown_severity_is_medium() {
        let r: RedFlagRecord =
            serde_json::from_str(r#"{"flag":"x","severity":"urgent-ish"}"#).unwrap();
        assert_eq!(r.severity, Severity::Medium);
        assert_eq!(r.reason, "");
    }

    #[test]
    fn tagging_is_idempotent() {
        let reds = [red("a", "low"), red("b", "high")];
        let comments = [concern("bad", "negative")];
        assert_eq!(
            tag(&reds, &[], &[], &comments),
            tag(&reds, &[], &[], &comments)
        );
    }

    #[test]
    fn flag_serializes_type_field() {
        let t = tag(&[red("a", "low")], &[], &[], &[]);
        let v = serde_json::to_value(&t.flags[0]).unwrap();
        assert_eq!(v["type"], "red_flag");
        assert_eq!(v["severity"], "low");
    }
}
