//! Trait definitions for the Hokusai storyboard toolkit.
//!
//! The storyboard core never talks to a concrete backend. Image generation,
//! text rewriting and persistence are reached through the capability traits
//! defined here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{ImageRenderer, KeyValueStore, TextService};
