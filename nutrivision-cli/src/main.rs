use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nutrivision_core::fun_facts::random_fun_fact;
use nutrivision_core::{NutriApp, NutriConfig, Reply};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nutrivision")]
#[command(about = "Food scanner and meal planner", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML configuration file (default: $NUTRIVISION_CONFIG, if set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a food photo (.jpg, .jpeg or .png)
    Scan {
        /// Path to the image
        image: PathBuf,
    },
    /// Generate a meal plan from the ingredients you have
    Plan {
        /// Ingredients, e.g. "oats, milk, bananas"
        ingredients: Vec<String>,
        /// Also write the plan to my_nutrition_plan.txt in this directory
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print a random nutrition fact
    Fact,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli { config, command } = Cli::parse();

    match command {
        Commands::Fact => {
            println!("💡 {}", random_fun_fact());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scan { image } => {
            let app = launch(config.as_deref())?;
            let upload = app
                .open_upload(&image)
                .with_context(|| format!("cannot use {}", image.display()))?;
            eprintln!("Analyzing {}...", upload.file_name());

            match app.press_analyze(Some(&upload)).await {
                Some(reply) => Ok(report(&reply)),
                None => Ok(ExitCode::SUCCESS),
            }
        }
        Commands::Plan { ingredients, save } => {
            let app = launch(config.as_deref())?;
            let input = ingredients.join(" ");
            let Some(outcome) = app.press_generate_plan(&input).await else {
                eprintln!("Nothing to plan: list the ingredients you have.");
                return Ok(ExitCode::SUCCESS);
            };

            let code = report(&outcome.reply);
            if let (Some(dir), Some(artifact)) = (save, outcome.artifact.as_ref()) {
                let written = artifact
                    .write_to(&dir)
                    .with_context(|| format!("cannot write plan into {}", dir.display()))?;
                eprintln!("Saved {}", written.display());
            }
            Ok(code)
        }
    }
}

/// Load configuration, build the app and print the startup banner to stderr
fn launch(config: Option<&Path>) -> Result<NutriApp> {
    let config = NutriConfig::load(config).context("failed to load configuration")?;
    let app = NutriApp::new(config).context("failed to build HTTP client")?;

    for line in banner(&app) {
        eprintln!("{line}");
    }
    Ok(app)
}

/// Missing-key warning, if any, followed by a random fact
fn banner(app: &NutriApp) -> Vec<String> {
    let mut lines: Vec<String> = app
        .startup_notice()
        .map(|notice| format!("⚠️  {notice}"))
        .into_iter()
        .collect();
    lines.push(format!("💡 {}", random_fun_fact()));
    lines
}

/// Print a reply; failures go to stderr and set a non-zero exit code
fn report(reply: &Reply) -> ExitCode {
    match reply {
        Reply::Answer(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Reply::Failure(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
