//! Prompt sanitization: quoted dialogue removal and term rewriting.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// A disallowed term and its safe replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeRule {
    /// Term matched case-insensitively at word boundaries
    pub term: &'static str,
    /// Replacement text
    pub replacement: &'static str,
}

const fn rule(term: &'static str, replacement: &'static str) -> SanitizeRule {
    SanitizeRule { term, replacement }
}

/// Terms rewritten before a prompt reaches the image model, applied in order.
pub const DISALLOWED_TERMS: &[SanitizeRule] = &[
    rule("bitch", "enemy"),
    rule("ho", "person"),
    rule("ass", "self"),
    rule("smash", "defeat"),
    rule("shit", "stuff"),
    rule("negus", "ancient warriors"),
    rule("freak", "weird"),
    rule("thotty", "rude"),
    rule("vagil", "medicine"),
    rule("cocaine", "dust"),
    rule("hell", "heck"),
    rule("damn", "darn"),
    rule("fuck", "frick"),
    rule("niggas", "warriors"),
    rule("cum", "white energy"),
    rule("nut", "explode"),
    rule("boner", "power surge"),
    rule("pussy", "courage"),
    rule("whore", "villain"),
    rule("slut", "enemy"),
    rule("handjobs", "hand strikes"),
    rule("bukkake", "barrage"),
    rule("sex", "love"),
    rule("orgasm", "climax"),
    rule("tits", "chest"),
    rule("penis", "weapon"),
    rule("dick", "weapon"),
    rule("cock", "weapon"),
    rule("jerked off", "manipulated"),
];

fn quoted_spans() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r#""[^"\n]*""#).expect("double quote pattern should compile"),
            Regex::new(r"“[^”\n]*”").expect("curly quote pattern should compile"),
        ]
    })
}

fn single_quoted() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)(^|\W)'[^'\n]*'").expect("single quote pattern should compile")
    })
}

fn compiled_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        DISALLOWED_TERMS
            .iter()
            .map(|rule| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(rule.term));
                let regex = Regex::new(&pattern).expect("sanitize rule should compile");
                (regex, rule.replacement)
            })
            .collect()
    })
}

/// Prepare a compiled prompt for the image model.
///
/// Quoted spans are removed first, so dialogue never reaches the renderer.
/// Disallowed terms outside quotes are then replaced at word boundaries.
/// Apostrophes inside words (`Ayo's`) do not open a single-quoted span.
///
/// # Examples
///
/// ```
/// use hokusai_script::sanitize;
///
/// assert_eq!(sanitize("What the hell is this"), "What the heck is this");
/// assert_eq!(sanitize(r#"Ayo yells "damn it" and runs"#), "Ayo yells  and runs");
/// assert_eq!(sanitize("Hello there"), "Hello there");
/// ```
pub fn sanitize(prompt: &str) -> String {
    let mut text = prompt.to_string();
    for pattern in quoted_spans() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    text = single_quoted().replace_all(&text, "$1").into_owned();

    for (pattern, replacement) in compiled_rules() {
        if pattern.is_match(&text) {
            debug!(pattern = %pattern.as_str(), "Rewriting disallowed term");
            text = pattern.replace_all(&text, *replacement).into_owned();
        }
    }
    text
}
