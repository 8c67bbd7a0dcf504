use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use casetrail::cli::{Cli, Command, OutputFormat};
use casetrail::config::Config;
use casetrail::{report, snapshot};
use progression::{Engine, Normalizer, ProgressionInput};

fn setup_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let cases_path = cli.cases.as_ref().unwrap_or(&config.cases_path);
    let recipes_path = cli.recipes.as_ref().unwrap_or(&config.recipes_path);
    let cases = snapshot::load_cases_or_empty(cases_path).context("Failed to load case snapshot")?;
    let recipes =
        snapshot::load_recipes_or_empty(recipes_path).context("Failed to load catalog snapshot")?;
    info!(cases = cases.len(), recipes = recipes.len(), "snapshots loaded");

    let engine = Engine::with_normalizer(Normalizer::with_aliases(config.module_aliases.clone()))
        .max_module_options(config.max_module_options);

    match cli.command {
        Command::Next { module } => {
            let view = engine.evaluate(&ProgressionInput {
                cases,
                recipes,
                selected_module: module,
            });
            print!("{}", report::render_next(&view));
        }
        Command::Journey => {
            let view = engine.evaluate(&ProgressionInput {
                cases,
                recipes,
                selected_module: None,
            });
            print!("{}", report::render_journey(&view));
        }
        Command::Modules => {
            let view = engine.evaluate(&ProgressionInput {
                cases,
                recipes,
                selected_module: None,
            });
            print!("{}", report::render_modules(&view));
        }
        Command::View { module, format } => {
            let view = engine.evaluate(&ProgressionInput {
                cases,
                recipes,
                selected_module: module,
            });
            match format {
                OutputFormat::Text => print!("{}", report::render_view(&view)),
                OutputFormat::Json => println!("{}", report::render_view_json(&view)?),
            }
        }
    }

    Ok(())
}
