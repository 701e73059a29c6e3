//! Prompts that ask a text service to write or extend scripts.
//!
//! Every template asks for the block format [`segment`](crate::segment)
//! understands: a `Sequence N: [Title]` heading, a `Prompt:` line that opens
//! with the active style prefix, and a `Chronological Flow:` section.

use hokusai_core::{DraftRequest, ReferenceCatalog, ReferenceEntry, StyleMode};
use hokusai_error::BuilderError;

/// Lore used when the project has none.
pub const DEFAULT_LORE: &str = "Generic Anime World";

/// Scripts passed to [`breakdown_request`] are cut to this many characters.
pub const BREAKDOWN_INPUT_LIMIT: usize = 20_000;

/// Output cap requested for full episodes.
pub const EPISODE_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Project state every drafting prompt draws on.
#[derive(Debug, Clone, Copy)]
pub struct DraftContext<'a> {
    /// World lore, blank for the default
    pub lore: &'a str,
    /// Catalog listed as available assets
    pub catalog: &'a ReferenceCatalog,
    /// Ask for voice descriptions before dialogue
    pub voice_tags: bool,
    /// Style whose prefix opens each `Prompt:` line
    pub style: StyleMode,
}

impl<'a> DraftContext<'a> {
    /// Context with the given catalog and all other settings at their defaults.
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        Self {
            lore: "",
            catalog,
            voice_tags: false,
            style: StyleMode::default(),
        }
    }

    fn lore(&self) -> &str {
        if self.lore.trim().is_empty() {
            DEFAULT_LORE
        } else {
            self.lore
        }
    }

    fn character_lines(&self, with_visuals: bool) -> String {
        self.catalog
            .characters()
            .values()
            .map(|entry| asset_line(entry, with_visuals, self.voice_tags))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn location_lines(&self, with_visuals: bool) -> String {
        self.catalog
            .locations()
            .values()
            .map(|entry| asset_line(entry, with_visuals, false))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn prompt_format(&self) -> String {
        format!(
            "Sequence X: [Title]\nPrompt: {}[Explicit Location Description], [Visual Action Description using @handles]\nChronological Flow:\n(Action) [Details using @handles]\n(Audio) [Name]: [Dialogue]",
            self.style.prefix()
        )
    }
}

fn asset_line(entry: &ReferenceEntry, with_visuals: bool, with_voice: bool) -> String {
    let mut line = format!("Handle: @{} | Name: {}", entry.id, entry.name);
    if with_visuals {
        line.push_str(&format!(" | Visual: {}", entry.description));
    }
    if let Some(voice) = entry.voice.as_deref().filter(|_| with_voice) {
        line.push_str(&format!(" | Voice: {voice}"));
    }
    line
}

fn request(prompt: String) -> Result<DraftRequest, BuilderError> {
    DraftRequest::builder().prompt(prompt).build()
}

const HANDLE_RULES: &str = "HANDLES VS NAMES:\n- In Prompt lines and (Action) lines always refer to characters by @handle.\n- In dialogue always use the character's Name, never the handle.";

const VISUAL_RULES: &str = "VISUAL RULES:\n- Re-state the location in every Prompt line.\n- Do not describe clothing; the reference images define outfits.\n- No text, captions or speech bubbles.";

/// Draft a script from a one-line idea.
///
/// # Errors
///
/// Returns a builder error only if the request cannot be assembled.
pub fn idea_request(ctx: &DraftContext<'_>, idea: &str) -> Result<DraftRequest, BuilderError> {
    let voice = if ctx.voice_tags {
        "VOICE TAGS: put the speaker's voice description in brackets before each line, e.g. (Audio) Ayo [Energetic Hero Voice]: Let's go!\n"
    } else {
        ""
    };
    request(format!(
        "WORLD LORE:\n{lore}\n\nWrite an anime script for: \"{idea}\"\n\nAVAILABLE CHARACTERS:\n{characters}\n\n{HANDLE_RULES}\n{voice}\nSTRUCTURE:\n- Break the story into 15-second sequences.\n- Start each sequence exactly with \"Sequence N:\".\n\n{VISUAL_RULES}\n\nFORMAT:\n{format}",
        lore = ctx.lore(),
        characters = ctx.character_lines(true),
        format = ctx.prompt_format(),
    ))
}

/// Convert a raw script into 15-second storyboard sequences.
///
/// Only the first 20 000 characters of `script` are sent.
///
/// # Errors
///
/// Returns a builder error only if the request cannot be assembled.
pub fn breakdown_request(
    ctx: &DraftContext<'_>,
    script: &str,
) -> Result<DraftRequest, BuilderError> {
    let excerpt: String = script.chars().take(BREAKDOWN_INPUT_LIMIT).collect();
    let voice = if ctx.voice_tags {
        "- Prefix spoken lines with the voice description in brackets, e.g. Ayo [Deep Voice]: Text\n"
    } else {
        ""
    };
    request(format!(
        "TASK: Convert this raw script into a piece-by-piece storyboard of 15-second sequences.\n\nWORLD LORE:\n{lore}\n\nINPUT SCRIPT:\n\"{excerpt}\"\n\nCONTINUITY:\n- Each sequence after the first must open in the visual state the previous one ended in.\n- Re-state the background location in every Prompt line.\n\nFORMATTING:\n- Start blocks with \"Sequence N: [Title]\".\n- Use \"Prompt: {prefix}...\" for the visual description.\n- Use @handles for visuals and Names for dialogue.\n- No clothing descriptions. No speech bubbles.\n{voice}\nAVAILABLE CHARACTERS (use their handles):\n{characters}",
        lore = ctx.lore(),
        prefix = ctx.style.prefix(),
        characters = ctx.character_lines(false),
    ))
}

/// Write a full episode of exactly `scene_count` sequences.
///
/// # Errors
///
/// Returns a builder error only if the request cannot be assembled.
pub fn episode_request(
    ctx: &DraftContext<'_>,
    idea: &str,
    scene_count: usize,
) -> Result<DraftRequest, BuilderError> {
    let voice = if ctx.voice_tags {
        "5. Every (Audio) line carries the speaker's voice description in brackets, e.g. (Audio) Ayo [Gravelly Hero Voice]: Stop!\n"
    } else {
        ""
    };
    let prompt = format!(
        "TASK: Write a full anime episode script based on this idea: \"{idea}\"\n\nWORLD LORE:\n{lore}\n\nAVAILABLE ASSETS:\n{characters}\n{locations}\n\nCONSTRAINTS:\n1. Generate EXACTLY {scene_count} sequences, numbered Sequence 1 to Sequence {scene_count}.\n2. Each sequence covers 15 seconds of screen time.\n3. Every sequence needs meaningful action or dialogue.\n4. Start every block with \"Sequence N:\".\n{voice}\n{HANDLE_RULES}\n\n{VISUAL_RULES}\n\nOUTPUT FORMAT PER SEQUENCE:\n{format}",
        lore = ctx.lore(),
        characters = ctx.character_lines(true),
        locations = ctx.location_lines(true),
        format = ctx.prompt_format(),
    );
    DraftRequest::builder()
        .prompt(prompt)
        .max_output_tokens(EPISODE_MAX_OUTPUT_TOKENS)
        .build()
}

/// Write the sequence after `previous`, or a cold open when there is none.
///
/// `previous` is the last scene's ordinal and content.
///
/// # Errors
///
/// Returns a builder error only if the request cannot be assembled.
pub fn next_beat_request(
    ctx: &DraftContext<'_>,
    previous: Option<(usize, &str)>,
) -> Result<DraftRequest, BuilderError> {
    let voice = if ctx.voice_tags {
        "- Include the [Voice Description] in brackets before spoken dialogue.\n"
    } else {
        ""
    };
    let rules = format!(
        "RULES:\n- Use \"Prompt: {prefix}...\" for visuals.\n- Use @handles for visuals and action, Names for dialogue.\n- No clothing descriptions. No speech bubbles.\n- Describe the environment in the Prompt line.\n{voice}",
        prefix = ctx.style.prefix(),
    );
    let assets = format!(
        "AVAILABLE CHARACTERS:\n{}\nAVAILABLE LOCATIONS:\n{}",
        ctx.character_lines(false),
        ctx.location_lines(false),
    );

    let prompt = match previous {
        Some((last_ordinal, last_content)) => {
            let next = last_ordinal + 1;
            format!(
                "TASK: Read the previous anime scene and write the immediate next 15-second sequence (Sequence {next}).\n\nWORLD LORE:\n{lore}\n\nPREVIOUS SCENE:\n\"{last_content}\"\n\nINSTRUCTIONS:\n1. Infer where the previous scene ends visually.\n2. Write \"Sequence {next}: [Title]\".\n3. Write a \"Prompt:\" that continues the action in the same environment.\n4. Write \"Chronological Flow:\" with action and dialogue.\n\n{rules}\n{assets}",
                lore = ctx.lore(),
            )
        }
        None => format!(
            "TASK: Write a dramatic opening scene (Sequence 1) for a new anime episode.\n\nWORLD LORE:\n{lore}\n\nINSTRUCTIONS:\n1. Start with high energy, grounded in the lore.\n2. Write \"Sequence 1: [Title]\".\n3. Write a \"Prompt:\" for the image generator.\n4. Write \"Chronological Flow:\".\n\n{rules}\n{assets}",
            lore = ctx.lore(),
        ),
    };
    request(prompt)
}

/// Prompt asking a text model to rewrite one scene.
///
/// # Examples
///
/// ```
/// use hokusai_script::drafting::rewrite_prompt;
///
/// let prompt = rewrite_prompt("Ayo runs", "make it rain");
/// assert!(prompt.starts_with("Script Scene: \"Ayo runs\""));
/// assert!(prompt.contains("User Instruction: \"make it rain\""));
/// ```
pub fn rewrite_prompt(text: &str, instruction: &str) -> String {
    format!(
        "Script Scene: \"{text}\"\nUser Instruction: \"{instruction}\"\nTask: Rewrite script scene based on instruction. Keep it short."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ReferenceCatalog {
        let mut catalog = ReferenceCatalog::new();
        let mut ayo = ReferenceEntry::character("auraayo", "Ayo", "Red skin");
        ayo.voice = Some("Energetic hero".to_string());
        catalog.add(ayo).unwrap();
        catalog
            .add(ReferenceEntry::location("dojo", "Old Dojo", "Wooden floors"))
            .unwrap();
        catalog
    }

    #[test]
    fn test_voice_only_when_enabled() {
        let catalog = catalog();
        let mut ctx = DraftContext::new(&catalog);
        let quiet = idea_request(&ctx, "a duel").unwrap();
        assert!(!quiet.prompt().contains("Voice: Energetic hero"));

        ctx.voice_tags = true;
        let voiced = idea_request(&ctx, "a duel").unwrap();
        assert!(
            voiced
                .prompt()
                .contains("Handle: @auraayo | Name: Ayo | Visual: Red skin | Voice: Energetic hero")
        );
    }

    #[test]
    fn test_default_lore_and_style_prefix() {
        let catalog = catalog();
        let ctx = DraftContext {
            style: StyleMode::Pixar,
            ..DraftContext::new(&catalog)
        };
        let prompt = idea_request(&ctx, "a duel").unwrap();
        assert!(prompt.prompt().contains(DEFAULT_LORE));
        assert!(prompt.prompt().contains(StyleMode::Pixar.prefix()));
    }

    #[test]
    fn test_episode_has_count_and_cap() {
        let catalog = catalog();
        let request = episode_request(&DraftContext::new(&catalog), "tournament", 12).unwrap();
        assert!(request.prompt().contains("EXACTLY 12 sequences"));
        assert!(request.prompt().contains("Handle: @dojo | Name: Old Dojo"));
        assert_eq!(*request.max_output_tokens(), Some(EPISODE_MAX_OUTPUT_TOKENS));
    }

    #[test]
    fn test_breakdown_truncates_input() {
        let catalog = catalog();
        let script = "x".repeat(BREAKDOWN_INPUT_LIMIT + 500);
        let request = breakdown_request(&DraftContext::new(&catalog), &script).unwrap();
        assert!(!request.prompt().contains(&"x".repeat(BREAKDOWN_INPUT_LIMIT + 1)));
        assert!(request.prompt().contains(&"x".repeat(BREAKDOWN_INPUT_LIMIT)));
    }

    #[test]
    fn test_next_beat_continuation_and_cold_open() {
        let catalog = catalog();
        let ctx = DraftContext::new(&catalog);
        let next = next_beat_request(&ctx, Some((4, "Ayo falls"))).unwrap();
        assert!(next.prompt().contains("Sequence 5: [Title]"));
        assert!(next.prompt().contains("\"Ayo falls\""));

        let cold = next_beat_request(&ctx, None).unwrap();
        assert!(cold.prompt().contains("Sequence 1: [Title]"));
    }
}
