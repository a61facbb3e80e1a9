use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ai_llm_service::AiLlmError;
use landlord_questions::{
    AuditTrail, ConcernSource, FallbackReason, MissingInfoRecord, PhotoIssueRecord,
    QuestionCategory, QuestionModel, QuestionSource, QuestionSynthesizer, RedFlagRecord,
    Severity, TaggedFlags, tag,
};
use pretty_assertions::assert_eq;

/// Returns the same answer on every call; `None` simulates a timeout.
struct FixedGenerator {
    answer: Option<String>,
    calls: AtomicUsize,
}

impl FixedGenerator {
    fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn timing_out() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QuestionModel for FixedGenerator {
    async fn generate_questions(&self, _prompt: &str) -> Result<String, AiLlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .ok_or(AiLlmError::Timeout(Duration::from_secs(60)))
    }
}

fn red(flag: &str, severity: Severity) -> RedFlagRecord {
    RedFlagRecord {
        flag: flag.into(),
        severity,
        reason: "listing text".into(),
    }
}

fn five_flags() -> TaggedFlags {
    tag(
        &[
            red("Rent described only as 'affordable'", Severity::High),
            red("Requests wire transfer before viewing", Severity::High),
        ],
        &[MissingInfoRecord {
            item: "lease length".into(),
            importance: Severity::Medium,
            why: "needed to plan the school year".into(),
        }],
        &[PhotoIssueRecord {
            issue: "No bathroom photos".into(),
            severity: Severity::Low,
            explanation: "bathroom condition unknown".into(),
        }],
        &[ConcernSource {
            text: "thin walls, you hear everything".into(),
            sentiment: "negative".into(),
            category: "noise".into(),
        }],
    )
}

fn red_flags(n: usize) -> TaggedFlags {
    let reds: Vec<RedFlagRecord> = (0..n)
        .map(|i| red(&format!("issue {i}"), Severity::Medium))
        .collect();
    tag(&reds, &[], &[], &[])
}

#[tokio::test]
async fn empty_flags_make_no_call() {
    let generator = FixedGenerator::answering(r#"{"questions":[]}"#);
    let synth = QuestionSynthesizer::new(&generator);

    let out = synth.synthesize(&tag(&[], &[], &[], &[]), Some("Nice flat")).await;
    assert!(out.questions.is_empty());
    assert_eq!(out.source, QuestionSource::NoFlags);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn all_hallucinated_falls_back_to_composite() {
    let tagged = five_flags();
    let generator = FixedGenerator::answering(
        r#"{"questions":[
            {"question":"Is there a gym?","flag_ids":["amenity_gym"],"priority":"low"},
            {"question":"Is there a pool?","flag_ids":["amenity_pool"],"priority":"low"}
        ]}"#,
    );
    let out = QuestionSynthesizer::new(&generator)
        .synthesize(&tagged, None)
        .await;

    assert_eq!(generator.calls(), 1);
    assert_eq!(
        out.source,
        QuestionSource::Fallback {
            reason: FallbackReason::NoValidQuestions
        }
    );
    assert_eq!(out.report.invalid_ids(), vec!["amenity_gym", "amenity_pool"]);
    assert_eq!(out.questions.len(), 1);

    let q = &out.questions[0];
    assert_eq!(q.category, QuestionCategory::ComprehensiveReview);
    assert_eq!(q.priority, Severity::High);
    assert_eq!(q.flag_ids, tagged.ids());
    for flag in &tagged.flags {
        assert!(q.text.contains(&flag.description), "missing {}", flag.description);
    }
}

#[tokio::test]
async fn low_coverage_on_four_flags_falls_back() {
    let generator = FixedGenerator::answering(
        r#"{"questions":[{"question":"What is included?","flag_ids":["text_flag_2"],"priority":"medium"}]}"#,
    );
    let out = QuestionSynthesizer::new(&generator)
        .synthesize(&red_flags(4), None)
        .await;

    assert_eq!(
        out.source,
        QuestionSource::Fallback {
            reason: FallbackReason::LowCoverage {
                accepted: 1,
                total_flags: 4
            }
        }
    );
    assert_eq!(out.report.accepted.len(), 1);
    assert_eq!(out.questions[0].flag_ids.len(), 4);
}

#[tokio::test]
async fn half_coverage_on_two_flags_is_kept() {
    let generator = FixedGenerator::answering(
        r#"{"questions":[{"question":"Which utilities are included?","flag_ids":["text_flag_1"],"priority":"medium","reasoning":"budget"}]}"#,
    );
    let out = QuestionSynthesizer::new(&generator)
        .synthesize(&red_flags(2), None)
        .await;

    assert_eq!(out.source, QuestionSource::Generated);
    assert_eq!(out.questions.len(), 1);
    assert_eq!(out.questions[0].text, "Which utilities are included?");
    assert_eq!(out.questions[0].category, QuestionCategory::ListingDescription);
    assert_eq!(out.questions[0].reasoning.as_deref(), Some("budget"));
}

#[tokio::test]
async fn fenced_answer_is_parsed_and_ids_scrubbed() {
    let generator = FixedGenerator::answering(
        "```json\n{\"questions\":[\
         {\"question\":\"What is the exact rent? (text_flag_0)\",\"flag_ids\":[\"text_flag_0\",\"text_flag_1\"],\"priority\":\"high\"},\
         {\"question\":\"How long is the lease?\",\"flag_ids\":[\"missing_info_0\"],\"priority\":\"medium\"},\
         {\"question\":\"Can you share bathroom photos?\",\"flag_ids\":[\"photo_issue_0\"],\"priority\":\"low\"},\
         {\"question\":\"How is noise handled?\",\"flag_ids\":[\"student_concern_0\"],\"priority\":\"medium\"}\
         ]}\n```",
    );
    let out = QuestionSynthesizer::new(&generator)
        .synthesize(&five_flags(), Some("Affordable 2BR near campus"))
        .await;

    assert_eq!(out.source, QuestionSource::Generated);
    let texts: Vec<&str> = out.questions.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "What is the exact rent?",
            "How long is the lease?",
            "Can you share bathroom photos?",
            "How is noise handled?",
        ]
    );
    let categories: Vec<QuestionCategory> = out.questions.iter().map(|q| q.category).collect();
    assert_eq!(
        categories,
        vec![
            QuestionCategory::ListingDescription,
            QuestionCategory::MissingDetails,
            QuestionCategory::Photos,
            QuestionCategory::StudentConcerns,
        ]
    );
}

#[tokio::test]
async fn partial_rejection_without_rule_keeps_valid_items() {
    let generator = FixedGenerator::answering(
        r#"{"questions":[
            {"question":"a","flag_ids":["text_flag_0"]},
            {"question":"b","flag_ids":["text_flag_1"]},
            {"question":"c","flag_ids":["text_flag_9"]}
        ]}"#,
    );
    let out = QuestionSynthesizer::new(&generator)
        .synthesize(&red_flags(3), None)
        .await;

    assert_eq!(out.source, QuestionSource::Generated);
    assert_eq!(out.questions.len(), 2);
    assert_eq!(out.report.invalid_ids(), vec!["text_flag_9"]);
}

#[tokio::test]
async fn timeout_routes_to_fallback() {
    let generator = FixedGenerator::timing_out();
    let out = QuestionSynthesizer::new(&generator)
        .synthesize(&red_flags(2), None)
        .await;

    assert!(out.is_fallback());
    assert!(matches!(
        out.source,
        QuestionSource::Fallback {
            reason: FallbackReason::GenerationFailed { .. }
        }
    ));
    assert_eq!(out.questions.len(), 1);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn prose_answer_routes_to_fallback() {
    let generator = FixedGenerator::answering("Here are some great questions to ask!");
    let out = QuestionSynthesizer::new(&generator)
        .synthesize(&red_flags(1), None)
        .await;

    assert!(out.is_fallback());
    assert_eq!(out.questions[0].flag_ids, vec!["text_flag_0"]);
}

#[tokio::test]
async fn without_model_always_falls_back() {
    let out = QuestionSynthesizer::<FixedGenerator>::without_model()
        .synthesize(&red_flags(2), None)
        .await;
    assert_eq!(
        out.source,
        QuestionSource::Fallback {
            reason: FallbackReason::ModelUnavailable
        }
    );
}

fn only_run_dir(root: &std::path::Path) -> std::path::PathBuf {
    let dirs: Vec<_> = std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(dirs.len(), 1);
    dirs[0].clone()
}

#[tokio::test]
async fn audit_trail_records_run() {
    let root = tempfile::tempdir().unwrap();
    let generator = FixedGenerator::answering("```\n{\"questions\":[]}\n```");
    QuestionSynthesizer::new(&generator)
        .with_audit(AuditTrail::under(root.path()))
        .synthesize(&red_flags(1), None)
        .await;

    let run_dir = only_run_dir(root.path());
    for name in ["prompt.txt", "raw.txt", "clean.json", "report.json"] {
        assert!(run_dir.join(name).exists(), "{name} not written");
    }
    let clean = std::fs::read_to_string(run_dir.join("clean.json")).unwrap();
    assert_eq!(clean, "{\"questions\":[]}");
}

#[tokio::test]
async fn reused_audit_trail_keeps_every_run() {
    let root = tempfile::tempdir().unwrap();
    let trail = AuditTrail::under(root.path());

    let broken = FixedGenerator::answering("not json at all");
    QuestionSynthesizer::new(&broken)
        .with_audit(trail.clone())
        .synthesize(&red_flags(1), None)
        .await;
    let grounded = FixedGenerator::answering(
        r#"{"questions":[{"question":"Is the deposit refundable?","flag_ids":["text_flag_0"]}]}"#,
    );
    QuestionSynthesizer::new(&grounded)
        .with_audit(trail)
        .synthesize(&red_flags(1), None)
        .await;

    let mut raws: Vec<String> = std::fs::read_dir(root.path())
        .unwrap()
        .map(|e| std::fs::read_to_string(e.unwrap().path().join("raw.txt")).unwrap())
        .collect();
    raws.sort();
    assert_eq!(raws.len(), 2);
    assert_eq!(raws[0], "not json at all");
    assert!(raws[1].contains("Is the deposit refundable?"));
}

#[tokio::test]
async fn fence_info_string_does_not_matter() {
    for open in ["```json", "```Json", "```javascript", "``` json", "```js"] {
        let generator = FixedGenerator::answering(&format!(
            "{open}\n{{\"questions\":[{{\"question\":\"Is heat included?\",\"flag_ids\":[\"text_flag_0\"]}}]}}\n```"
        ));
        let out = QuestionSynthesizer::new(&generator)
            .synthesize(&red_flags(1), None)
            .await;
        assert_eq!(out.source, QuestionSource::Generated, "{open}");
        assert_eq!(out.questions[0].text, "Is heat included?");
    }
}

#[tokio::test]
async fn textless_candidates_never_reach_the_caller() {
    let generator = FixedGenerator::answering(
        r#"{"questions":[{"question":"(text_flag_0)","flag_ids":["text_flag_0"]},{"flag_ids":["text_flag_0"]}]}"#,
    );
    let out = QuestionSynthesizer::new(&generator)
        .synthesize(&red_flags(1), None)
        .await;

    assert_eq!(
        out.source,
        QuestionSource::Fallback {
            reason: FallbackReason::NoValidQuestions
        }
    );
    assert_eq!(out.report.hallucinations(), 2);
    assert!(out.questions.iter().all(|q| !q.text.trim().is_empty()));
}
