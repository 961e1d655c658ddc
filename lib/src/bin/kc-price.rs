//! King County sale-price CLI
//!
//! Trains a pricing model from a sales export, prices houses with a saved model and
//! lists the known ZIP codes.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kc_house_price::{
    LocationTable, ModelConfig, PredictionService, PricingConfig, RawFeatures, SalesData,
    TrainedModel, TrainingDataConfig,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "kc-price")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ridge-regression sale price estimates for King County homes", long_about = None)]
struct Args {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit a model on a sales export and save it
    Train {
        /// Directory holding the sales export (defaults to $SALES_DATA_PATH)
        #[arg(long)]
        data_path: Option<PathBuf>,

        /// File name of the sales export (defaults to $SALES_DATA_FILE)
        #[arg(long)]
        data_file: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Where to write the trained model
        #[arg(short, long, default_value = "kc_price_model.bin")]
        output: PathBuf,
    },

    /// Price one house with a saved model
    Predict {
        /// Trained model file
        #[arg(short, long, default_value = "kc_price_model.bin")]
        model: PathBuf,

        /// Raw features as a JSON object
        #[arg(short, long)]
        features: String,

        /// TOML configuration file (only the [model] section is used)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the ZIP code location table
    Zipcodes,
}

fn load_config(path: Option<&PathBuf>) -> Result<PricingConfig> {
    match path {
        Some(path) => PricingConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(PricingConfig::default()),
    }
}

/// Flags win over the configuration file, which wins over the environment.
fn training_source(
    data_path: Option<PathBuf>,
    data_file: Option<String>,
    config: &PricingConfig,
) -> Result<TrainingDataConfig> {
    let from_file = &config.training;
    let env = TrainingDataConfig::from_env().ok();

    let data_path = data_path
        .or_else(|| Some(from_file.data_path.clone()).filter(|p| !p.as_os_str().is_empty()))
        .or_else(|| env.as_ref().map(|e| e.data_path.clone()));
    let data_file = data_file
        .or_else(|| Some(from_file.data_file.clone()).filter(|f| !f.is_empty()))
        .or_else(|| env.as_ref().map(|e| e.data_file.clone()));

    match (data_path, data_file) {
        (Some(path), Some(file)) => Ok(TrainingDataConfig::new(path, file)),
        _ => bail!("training data location is not configured: pass --data-path and --data-file or set SALES_DATA_PATH and SALES_DATA_FILE"),
    }
}

fn train(
    data_path: Option<PathBuf>,
    data_file: Option<String>,
    config: Option<PathBuf>,
    output: PathBuf,
) -> Result<()> {
    let config = load_config(config.as_ref())?;
    let source = training_source(data_path, data_file, &config)?;

    let data = SalesData::from_config(&source).context("Failed to load sales data")?;
    info!("Loaded {} sales", data.len());

    info!("Training configuration:");
    info!("  Alphas: {:?}", config.model.alphas);
    info!("  Cross-validation: {}", config.model.cross_validation);

    let service = PredictionService::new(config.model.clone());
    let model = service.build(data.records()).context("Training failed")?;

    info!("Training complete!");
    info!("  Alpha: {}", model.regressor().alpha());
    info!("  Mean price: {:.2}", model.mean_response());
    for (column, w) in model
        .schema()
        .names()
        .iter()
        .zip(model.regressor().coefficients())
    {
        info!("  {:<12} {:>14.4}", column, w);
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    model
        .save_to_file(&output)
        .context("Failed to write model file")?;
    info!("Saved model to {}", output.display());
    Ok(())
}

fn predict(model: PathBuf, features: &str, config: Option<PathBuf>) -> Result<()> {
    let model_config: ModelConfig = load_config(config.as_ref())?.model;
    let trained = TrainedModel::load_from_file(&model)
        .with_context(|| format!("Failed to load model {}", model.display()))?;
    let raw: RawFeatures =
        serde_json::from_str(features).context("Features must be a JSON object")?;

    let service = PredictionService::with_model(model_config, trained)
        .context("Invalid model configuration")?;
    let price = service.predict(&raw).context("Prediction failed")?;
    println!("{}", price);
    Ok(())
}

fn zipcodes() {
    println!("{:>5}  {:<7} {:>14}", "index", "zipcode", "average price");
    for entry in LocationTable::global().iter() {
        println!(
            "{:>5}  {:<7} {:>14.1}",
            entry.index, entry.zipcode, entry.average_price
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match args.command {
        Command::Train {
            data_path,
            data_file,
            config,
            output,
        } => train(data_path, data_file, config, output),
        Command::Predict {
            model,
            features,
            config,
        } => predict(model, &features, config),
        Command::Zipcodes => {
            zipcodes();
            Ok(())
        }
    }
}
