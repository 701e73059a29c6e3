//! Hokusai CLI binary.
//!
//! This binary provides command-line access to Hokusai's functionality:
//! - Import scripts and edit the storyboard
//! - Render frames one at a time or in batches
//! - Draft and refine scripts with a text model
//! - Manage references and presets

use clap::Parser;
use hokusai::{HokusaiConfig, Session};
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Load .env before the API key is read
    dotenvy::dotenv().ok();

    // Initialize tracing; RUST_LOG wins over the verbose flag
    let default_filter = if cli.verbose {
        "info,hokusai=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => HokusaiConfig::from_file(path)?,
        None => HokusaiConfig::load()?,
    };
    let session = Session::open(config).await?;

    // Execute the requested command
    match cli.command {
        Commands::Import { file, append } => {
            cli::import_script(&session, &file, append).await?;
        }

        Commands::List => cli::list_scenes(&session).await?,

        Commands::Show { id } => cli::show_scene(&session, &id).await?,

        Commands::Edit { id, content } => cli::edit_scene(&session, &id, &content).await?,

        Commands::Insert { id, before } => cli::insert_scene(&session, &id, before).await?,

        Commands::Move { id, direction } => cli::move_scene(&session, &id, direction).await?,

        Commands::Delete { id } => cli::delete_scene(&session, &id).await?,

        Commands::Generate { id } => cli::generate(&session, &id).await?,

        Commands::Batch { ids } => cli::batch(&session, ids).await?,

        Commands::Refine { id, instruction } => {
            cli::refine(&session, &id, &instruction).await?;
        }

        Commands::NextBeat => cli::next_beat(&session).await?,

        Commands::Draft(draft_cmd) => cli::draft(&session, draft_cmd).await?,

        Commands::Style { mode } => cli::set_style(&session, &mode).await?,

        Commands::NoMusic { state } => cli::set_no_music(&session, state.enabled()).await?,

        Commands::Voice { state } => cli::set_voice_tags(&session, state.enabled()).await?,

        Commands::Lore { file } => cli::lore(&session, file.as_deref()).await?,

        Commands::Reference(reference_cmd) => {
            cli::handle_reference_command(&session, reference_cmd).await?;
        }

        Commands::Preset(preset_cmd) => {
            cli::handle_preset_command(&session, preset_cmd).await?;
        }

        Commands::Export { dir } => cli::export_frames(&session, &dir).await?,

        Commands::Reset { clean } => cli::reset(&session, clean).await?,
    }

    Ok(())
}
