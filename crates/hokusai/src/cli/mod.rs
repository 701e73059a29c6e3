//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the hokusai binary.

mod catalog;
mod commands;
mod generate;
mod storyboard;

pub use catalog::{handle_preset_command, handle_reference_command};
pub use commands::{Cli, Commands};
pub use generate::{batch, draft, generate, next_beat, refine};
pub use storyboard::{
    delete_scene, edit_scene, export_frames, import_script, insert_scene, list_scenes, lore,
    move_scene, reset, set_no_music, set_style, set_voice_tags, show_scene,
};
