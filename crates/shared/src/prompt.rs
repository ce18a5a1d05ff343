use crate::models::FeedEntry;

/// Characters of the source summary passed to the model.
pub const SUMMARY_CHAR_LIMIT: usize = 600;

pub const SYSTEM_PROMPT: &str = r#"You are a senior physician writing a public medical education blog draft.
Rules:
- Educational only, not medical diagnosis or personal medical advice.
- Avoid fear-based language, absolute claims, or overpromising.
- Use clear structure, short paragraphs, and practical guidance.
- When evidence is uncertain, say so.
- Include a short "When to seek medical care" section.
Output MUST be valid JSON only with keys:
title, excerpt, tags, markdown
"#;

/// Build the per-topic user prompt.
pub fn build_user_prompt<S: AsRef<str>>(topic: &FeedEntry, focus_keywords: &[S]) -> String {
    let focus = focus_keywords
        .iter()
        .map(|k| k.as_ref())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Create a blog draft based on this news/topic cue.

Topic cue:
- headline: {headline}
- source_url: {url}
- source_summary: {summary}

Site focus keywords (prefer integrating 2-4 naturally):
{focus}

Requirements:
- Audience: general public
- Language: Chinese
- Length: ~900-1400 Chinese characters
- Structure:
  1) Hook (1-2 lines)
  2) What happened / what it means
  3) Practical takeaways (3-6 bullets)
  4) When to seek medical care (bullets)
  5) Disclaimer (1 line)
- Tags: 3-6 short tags
Return JSON only.
"#,
        headline = topic.title,
        url = topic.link,
        summary = truncate_chars(&topic.summary, SUMMARY_CHAR_LIMIT),
        focus = focus,
    )
}

/// First `limit` characters of `text`, never splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
