//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Hokusai - turn anime scripts into consistent storyboard frames
#[derive(Parser, Debug)]
#[command(name = "hokusai")]
#[command(about = "Turn anime scripts into consistent storyboard frames", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file used instead of the layered defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Segment a script file into scenes
    Import {
        /// Path to the script text
        file: PathBuf,

        /// Add after the existing scenes instead of replacing them
        #[arg(long)]
        append: bool,
    },

    /// List scenes with their generation status
    List,

    /// Show a scene and the prompt that would be rendered
    Show {
        /// Scene id (e.g. 03)
        id: String,
    },

    /// Replace a scene's script text
    Edit {
        /// Scene id
        id: String,

        /// New script text
        content: String,
    },

    /// Insert a placeholder scene next to another
    Insert {
        /// Scene id to insert next to
        id: String,

        /// Insert before the scene instead of after it
        #[arg(long)]
        before: bool,
    },

    /// Move a scene one step up or down
    Move {
        /// Scene id
        id: String,

        /// Direction to move
        direction: DirectionArg,
    },

    /// Delete a scene and its frame
    Delete {
        /// Scene id
        id: String,
    },

    /// Render one scene
    Generate {
        /// Scene id
        id: String,
    },

    /// Render scenes one after another, cooling down on rate limits
    Batch {
        /// Scene ids; all scenes when omitted
        ids: Vec<String>,
    },

    /// Rewrite a scene with a text model
    Refine {
        /// Scene id
        id: String,

        /// How to change the scene
        instruction: String,
    },

    /// Draft the next sequence and append it
    NextBeat,

    /// Draft scripts with a text model
    #[command(subcommand)]
    Draft(DraftCommands),

    /// Set the visual style
    Style {
        /// anime, aaa or pixar
        mode: String,
    },

    /// Toggle the no-music audio tag on every scene
    NoMusic {
        /// on or off
        state: Toggle,
    },

    /// Toggle voice descriptions in drafted dialogue
    Voice {
        /// on or off
        state: Toggle,
    },

    /// Show or replace the world lore
    Lore {
        /// File holding the new lore
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Manage character and location references
    #[command(subcommand)]
    Reference(ReferenceCommands),

    /// Manage catalog presets
    #[command(subcommand)]
    Preset(PresetCommands),

    /// Write rendered frames to a directory
    Export {
        /// Output directory
        dir: PathBuf,
    },

    /// Start over
    Reset {
        /// Remove all scenes and references instead of restoring the starter project
        #[arg(long)]
        clean: bool,
    },
}

/// Script drafting subcommands
#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    /// Write a script from a one-line idea
    Idea {
        /// The idea
        idea: String,

        /// Import the draft, replacing the storyboard
        #[arg(long)]
        import: bool,
    },

    /// Write a full episode with a fixed number of sequences
    Episode {
        /// The idea
        idea: String,

        /// Number of sequences
        #[arg(long, default_value = "12")]
        scenes: usize,

        /// Import the draft, replacing the storyboard
        #[arg(long)]
        import: bool,
    },

    /// Restructure a raw script into storyboard sequences
    Breakdown {
        /// Path to the raw script
        file: PathBuf,

        /// Import the result, replacing the storyboard
        #[arg(long)]
        import: bool,
    },
}

/// Reference catalog subcommands
#[derive(Subcommand, Debug)]
pub enum ReferenceCommands {
    /// List references
    List,

    /// Add a character or location
    Add {
        /// character or location
        kind: KindArg,

        /// Handle used as @id in scripts
        id: String,

        /// Display name
        name: String,

        /// Visual description
        description: String,

        /// Voice direction for dialogue
        #[arg(long)]
        voice: Option<String>,

        /// Reference sheet image
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Remove a reference
    Remove {
        /// Handle
        id: String,
    },

    /// Attach a reference sheet image
    Image {
        /// Handle
        id: String,

        /// Image file
        path: PathBuf,
    },
}

/// Preset subcommands
#[derive(Subcommand, Debug)]
pub enum PresetCommands {
    /// List saved presets
    List,

    /// Snapshot the current catalog
    Save {
        /// Preset name
        name: String,
    },

    /// Import a preset document
    Import {
        /// JSON file
        file: PathBuf,
    },

    /// Export a preset document
    Export {
        /// Preset id
        id: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Replace the catalog with a preset
    Apply {
        /// Preset id
        id: String,
    },

    /// Delete a preset
    Delete {
        /// Preset id
        id: String,
    },
}

/// Scene move direction
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DirectionArg {
    /// Toward the start
    Up,
    /// Toward the end
    Down,
}

/// On/off switch
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Toggle {
    /// Enable
    On,
    /// Disable
    Off,
}

impl Toggle {
    /// Whether the switch is on.
    pub fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

/// Reference kind
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
    /// A recurring character
    Character,
    /// A background or set
    Location,
}
