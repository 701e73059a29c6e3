//! Storyboard editing and generation for Hokusai.
//!
//! A [`Workspace`] holds the live project: the [`Storyboard`] of scenes and
//! their generation results, the reference catalog, presets, lore and
//! settings. It is shared behind `Arc<RwLock<_>>` by:
//!
//! - [`GenerationScheduler`], which renders one scene at a time
//! - [`BatchDriver`], which renders many scenes with rate-limit cooldowns
//! - [`ScriptAssistant`], which rewrites and drafts scenes with a text model

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assistant;
mod batch;
mod presets;
mod scheduler;
mod storyboard;
mod workspace;

pub use assistant::ScriptAssistant;
pub use batch::{BatchDriver, BatchProgress, BatchReport, CancelFlag};
pub use presets::PresetLibrary;
pub use scheduler::{GenerationOutcome, GenerationScheduler, RATE_LIMITED_MESSAGE};
pub use storyboard::{Direction, Placement, Storyboard, reindex};
pub use workspace::{ImportMode, SharedWorkspace, Workspace};
