use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use brandfix::config::Config;
use brandfix::logging::init_logging;
use brandfix::oracle::OpenAiOracle;
use brandfix::pipeline::{CorrectionMode, Pipeline};
use brandfix::prompt::PromptBuilder;
use brandfix::registry::BrandRegistry;
use brandfix::xlsx;

#[derive(Parser)]
#[command(name = "brandfix")]
#[command(about = "Spreadsheet brand-name spellchecker backed by an LLM correction oracle")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct brand names in a spreadsheet and write the result
    Correct {
        /// Input spreadsheet (xlsx)
        #[arg(long)]
        input: PathBuf,
        /// Output spreadsheet (xlsx)
        #[arg(long)]
        output: PathBuf,
        /// Correct every cell of every sheet instead of a single column
        #[arg(long)]
        whole_sheet: bool,
        /// Target column name (overrides the configured one)
        #[arg(long)]
        column: Option<String>,
    },
    /// Print the effective brand registry (manual list plus scraped directory)
    Brands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    init_logging();

    let config = Config::load(&cli.config)?;
    let registry = BrandRegistry::build_with_directory(
        &config.brands.known,
        config.brands.directory_url.as_deref(),
    )
    .await;
    info!("Brand registry holds {} names", registry.len());

    match cli.command {
        Commands::Correct {
            input,
            output,
            whole_sheet,
            column,
        } => {
            let api_key = std::env::var("OPENAI_API_KEY")?;
            let oracle = OpenAiOracle::new(
                &config.oracle.endpoint,
                api_key,
                &config.oracle.model,
                &config.oracle.system_prompt,
                Duration::from_secs(config.oracle.timeout_seconds),
            )?;
            let prompt_builder = PromptBuilder::new(&config.correction.prompt_template);

            let mode = if whole_sheet {
                CorrectionMode::WholeSheet
            } else {
                CorrectionMode::Column(
                    column.unwrap_or_else(|| config.correction.target_column.clone()),
                )
            };

            let mut workbook = xlsx::read_workbook(&input)?;
            info!("Read {} sheets from {}", workbook.len(), input.display());

            let pipeline = Pipeline::new(&oracle, &prompt_builder, &registry);
            pipeline.run(&mut workbook, &mode).await?;

            let buffer = xlsx::write_workbook(&workbook, config.correction.autofit)?;
            std::fs::write(&output, buffer)?;
            println!("Corrected workbook written to {}", output.display());
        }
        Commands::Brands => {
            for brand in registry.as_slice() {
                println!("{}", brand);
            }
        }
    }

    Ok(())
}
