//! Deterministic composite question listing every flag.

use crate::flags::{Severity, TaggedFlags};
use crate::validate::{Question, QuestionCategory};

const SECTIONS: [(Severity, &str); 3] = [
    (Severity::High, "High Priority Issues:"),
    (Severity::Medium, "Additional Concerns:"),
    (Severity::Low, "Other Items:"),
];

/// One question enumerating every flag description, grouped by severity.
///
/// Cites every flag id in tag order. Returns `None` for an empty flag set.
pub fn compose_fallback(tagged: &TaggedFlags) -> Option<Question> {
    if tagged.is_empty() {
        return None;
    }

    let mut blocks: Vec<String> = Vec::with_capacity(SECTIONS.len());
    for (severity, heading) in SECTIONS {
        let bullets: Vec<String> = tagged
            .flags
            .iter()
            .filter(|f| f.severity == severity)
            .map(|f| format!("  • {}", f.description))
            .collect();
        if !bullets.is_empty() {
            blocks.push(format!("{heading}\n{}", bullets.join("\n")));
        }
    }

    let text = format!(
        "I reviewed the listing and noticed the following points I'd like to address:\n\n\
{}\n\n\
Could you please provide clarification on each of these items?",
        blocks.join("\n\n")
    );

    let any_high = tagged.flags.iter().any(|f| f.severity == Severity::High);
    Some(Question {
        text,
        flag_ids: tagged.ids(),
        priority: if any_high {
            Severity::High
        } else {
            Severity::Medium
        },
        category: QuestionCategory::ComprehensiveReview,
        reasoning: Some(format!(
            "{} concerns identified during listing analysis",
            tagged.len()
        )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{PhotoIssueRecord, RedFlagRecord, tag};
    use pretty_assertions::assert_eq;

    #[test]
    fn groups_by_severity_with_blank_lines() {
        let tagged = tag(
            &[
                RedFlagRecord {
                    flag: "Cash-only deposit".into(),
                    severity: Severity::Low,
                    reason: String::new(),
                },
                RedFlagRecord {
                    flag: "Vague pricing".into(),
                    severity: Severity::High,
                    reason: String::new(),
                },
            ],
            &[],
            &[PhotoIssueRecord {
                issue: "Blurry kitchen photo".into(),
                severity: Severity::Medium,
                explanation: String::new(),
            }],
            &[],
        );

        let q = compose_fallback(&tagged).unwrap();
        let expected = "I reviewed the listing and noticed the following points I'd like to address:\n\
\n\
High Priority Issues:\n  • Vague pricing\n\
\n\
Additional Concerns:\n  • Blurry kitchen photo\n\
\n\
Other Items:\n  • Cash-only deposit\n\
\n\
Could you please provide clarification on each of these items?";
        assert_eq!(q.text, expected);
        assert_eq!(q.priority, Severity::High);
        assert_eq!(q.category, QuestionCategory::ComprehensiveReview);
        assert_eq!(q.flag_ids, vec!["text_flag_0", "text_flag_1", "photo_issue_0"]);
        assert_eq!(
            q.reasoning.as_deref(),
            Some("3 concerns identified during listing analysis")
        );
    }

    #[test]
    fn medium_priority_without_high_flags() {
        let tagged = tag(
            &[RedFlagRecord {
                flag: "No lease term".into(),
                severity: Severity::Low,
                reason: String::new(),
            }],
            &[],
            &[],
            &[],
        );
        let q = compose_fallback(&tagged).unwrap();
        assert_eq!(q.priority, Severity::Medium);
        assert!(q.text.contains("Other Items:\n  • No lease term\n\nCould you"));
        assert!(!q.text.contains("High Priority"));
    }

    #[test]
    fn empty_set_has_no_fallback() {
        assert!(compose_fallback(&TaggedFlags::default()).is_none());
    }
}
