//! Script pipeline for Hokusai.
//!
//! Raw script text flows through three stages:
//!
//! 1. [`segment`] splits it into timed [`Scene`](hokusai_core::Scene)s at
//!    `Sequence N:`, `Scene N:` and `Title:` headings.
//! 2. [`ReferenceResolver`] finds the catalog entries each scene mentions by
//!    `@handle`, display name, or alias.
//! 3. [`compile`] and [`sanitize`] turn a scene into the prompt sent to the
//!    image model.
//!
//! The [`drafting`] module builds prompts that ask a text service to write
//! scripts in the format the segmenter expects.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aliases;
mod compiler;
pub mod drafting;
mod heading;
mod matcher;
mod resolver;
mod rules;
mod segmenter;

pub use aliases::AliasTable;
pub use compiler::{
    NO_MUSIC_TAG, PLACEHOLDER_SCRIPT, compile, descriptor, inject_style, placeholder_content,
    toggle_no_music,
};
pub use heading::rewrite_sequence_heading;
pub use resolver::{ReferenceResolver, resolve_mentioned_ids};
pub use rules::{DISALLOWED_TERMS, SanitizeRule, sanitize};
pub use segmenter::segment;
