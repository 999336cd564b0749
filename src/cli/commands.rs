//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::TreemapService;
use crate::application::{load_dataset, ApplicationError};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{hex_to_rgb, CategoryIntensityMapper, TreeNode};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    // Completion needs no settings
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }
    if let Commands::Color { hex, alpha } = command {
        return cmd_color(hex, *alpha);
    }

    let settings = Settings::load(cli.config.as_deref())?;
    match command {
        Commands::Tree { file } => cmd_tree(&settings, file.as_deref()),
        Commands::Tiles { file, json } => cmd_tiles(&settings, file.as_deref(), *json),
        Commands::Ranges { file } => cmd_ranges(&settings, file.as_deref()),
        Commands::Legend { file } => cmd_legend(&settings, file.as_deref()),
        Commands::Config { command } => cmd_config(&settings, command),
        Commands::Color { .. } | Commands::Completion { .. } => Ok(()),
    }
}

/// Dataset argument, falling back to the configured dataset.
fn resolve_dataset(settings: &Settings, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.dataset.clone())
        .ok_or_else(|| {
            CliError::Usage(
                "no dataset given: pass a FILE or set `dataset` in the config".to_string(),
            )
        })
}

fn load(settings: &Settings, file: Option<&Path>) -> CliResult<TreeNode> {
    let path = resolve_dataset(settings, file)?;
    debug!("dataset: {}", path.display());
    Ok(load_dataset(&path)?)
}

#[instrument(skip(settings))]
fn cmd_tree(settings: &Settings, file: Option<&Path>) -> CliResult<()> {
    let root = load(settings, file)?;
    let tree = TreemapService::new(settings)?.annotate(&root)?;
    output::info(&tree.to_tree_string(settings.value_format));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_tiles(settings: &Settings, file: Option<&Path>, json: bool) -> CliResult<()> {
    let root = load(settings, file)?;
    let model = TreemapService::new(settings)?.shape(&root)?;

    if json {
        let text = serde_json::to_string_pretty(&model.tiles).map_err(|e| {
            ApplicationError::OperationFailed {
                context: "serialize tiles".to_string(),
                source: Box::new(e),
            }
        })?;
        output::info(&text);
        return Ok(());
    }

    for tile in &model.tiles {
        let intensity = tile
            .intensity
            .map(|i| format!("{:.3}", i))
            .unwrap_or_else(|| "-".to_string());
        output::info(&format!(
            "{}\t{}\t{}\t{}",
            tile.id, tile.display_value, intensity, tile.fill
        ));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_ranges(settings: &Settings, file: Option<&Path>) -> CliResult<()> {
    let root = load(settings, file)?;
    let output_range = settings.output_range()?;
    let service = TreemapService::new(settings)?;
    let tree = service.annotate(&root)?;
    let mapper = CategoryIntensityMapper::from_tree(&tree, output_range);

    output::header(&format!(
        "intensity {} -> {}",
        output_range.start, output_range.end
    ));
    for (category, range) in mapper.ranges() {
        output::entry(
            category,
            &format!(
                "{} .. {}",
                settings.value_format.format(range.min),
                settings.value_format.format(range.max)
            ),
        );
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_legend(settings: &Settings, file: Option<&Path>) -> CliResult<()> {
    let root = load(settings, file)?;
    let model = TreemapService::new(settings)?.shape(&root)?;
    for entry in &model.legend {
        output::swatch(entry.color, &format!("{} {}", entry.color, entry.key));
    }
    Ok(())
}

fn cmd_color(hex: &str, alpha: Option<f64>) -> CliResult<()> {
    let rgb = hex_to_rgb(hex)
        .ok_or_else(|| CliError::InvalidArgs(format!("not a 6-digit hex color: {}", hex)))?;
    match alpha {
        Some(a) if !(0.0..=1.0).contains(&a) => Err(CliError::InvalidArgs(format!(
            "alpha must be within 0..=1: {}",
            a
        ))),
        Some(a) => {
            output::info(&rgb.with_alpha(a));
            Ok(())
        }
        None => {
            output::info(&format!("rgb({},{},{})", rgb.r, rgb.g, rgb.b));
            Ok(())
        }
    }
}

fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}
