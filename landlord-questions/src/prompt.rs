//! Generation prompt for landlord questions.

use crate::flags::TaggedFlags;

/// Listing text beyond this many characters is cut from the prompt context.
pub const LISTING_CONTEXT_CHARS: usize = 500;

/// Requested question count: `max(1, round(0.7 * n))` to `n`.
pub fn target_range(total_flags: usize) -> (usize, usize) {
    let low = ((total_flags as f64) * 0.7).round() as usize;
    (low.max(1), total_flags)
}

/// Builds the prompt embedding every tagged flag and the grounding rules.
pub fn build_question_prompt(tagged: &TaggedFlags, listing_text: Option<&str>) -> String {
    let flags_json =
        serde_json::to_string_pretty(&tagged.flags).unwrap_or_else(|_| "[]".to_string());
    let (low, high) = target_range(tagged.len());

    let mut p = String::with_capacity(4096);
    p.push_str(
        "You are helping a college student prepare questions to ask a landlord about an apartment listing.\n\n",
    );
    p.push_str("AVAILABLE FLAGS (use ONLY these; do not invent new issues):\n");
    p.push_str(&flags_json);
    p.push_str("\n\n");

    if let Some(text) = listing_text.map(str::trim).filter(|t| !t.is_empty()) {
        let head: String = text.chars().take(LISTING_CONTEXT_CHARS).collect();
        p.push_str("LISTING TEXT (context only; do not ask about anything not flagged above):\n");
        p.push_str(&head);
        if text.chars().count() > LISTING_CONTEXT_CHARS {
            p.push_str("...");
        }
        p.push_str("\n\n");
    }

    p.push_str(
        "RULES:\n\
1. Ask ONLY about the flags listed above.\n\
2. Every question MUST cite at least one flag by its exact id in \"flag_ids\".\n\
3. Never put flag ids (like \"text_flag_0\" or \"missing_info_3\") in the question text.\n\
4. Do not invent concerns that are not in the flag list.\n\
5. Use concrete details from the flag descriptions.\n\
6. Merge related flags into one question when it reads naturally.\n\
7. Favor high-severity flags over medium and low.\n\
8. With few flags, ask fewer questions.\n\n",
    );
    p.push_str(&format!(
        "Expected: {low}-{high} questions (related flags may be combined).\n\n"
    ));
    p.push_str(
        "OUTPUT FORMAT (valid JSON only):\n\
{\n\
  \"questions\": [\n\
    {\n\
      \"question\": \"The question to ask the landlord\",\n\
      \"flag_ids\": [\"text_flag_0\"],\n\
      \"priority\": \"high\",\n\
      \"reasoning\": \"Why this matters\"\n\
    }\n\
  ]\n\
}\n\n\
Generate the questions now (JSON only):",
    );
    p
}
