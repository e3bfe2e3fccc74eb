//! Cases and arguments CLI
//!
//! Usage:
//!   casebase bin --input data/weather.csv --bins 3 --method equal-width
//!   casebase cases --input data/weather.csv
//!   casebase rules --input data/rules.txt --class-names NoRain,Rain
//!   casebase run-all --mock --rules data/rules.txt

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use polars::prelude::DataFrame;

use casebase::binning::BinningMethod;
use casebase::cases::{format_facts, CaseModel, CaseModelBuilder};
use casebase::config::Config;
use casebase::dataset::{dataset_name, load_csv, load_input};
use casebase::outputs::{
    load_rules_file, write_arguments_jsonl, write_case_model_jsonl, write_case_model_parquet,
    write_discretized_parquet, write_rule_failures_jsonl,
};
use casebase::rules::{parse_batch_parallel, RuleBatch, RuleParser};

#[derive(Parser)]
#[command(name = "casebase")]
#[command(about = "Tabular data and decision rules → cases and arguments")]
struct Cli {
    #[arg(long, global = true, default_value = "config/casebase.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct BinningArgs {
    /// Override the configured bin count
    #[arg(long)]
    bins: Option<usize>,
    /// equal-depth or equal-width
    #[arg(long)]
    method: Option<String>,
    /// Comma-separated columns to keep, in order
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discretize a CSV and write the label table
    Bin {
        #[arg(long)]
        input: String,
        #[command(flatten)]
        binning: BinningArgs,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Build the case model for a CSV
    Cases {
        #[arg(long)]
        input: String,
        #[command(flatten)]
        binning: BinningArgs,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Parse decision rules into arguments
    Rules {
        #[arg(long)]
        input: String,
        /// Comma-separated class names, index order
        #[arg(long, value_delimiter = ',')]
        class_names: Option<Vec<String>>,
        #[arg(long)]
        data_dir: Option<String>,
    },
    /// Build cases and parse rules in one go
    RunAll {
        #[arg(long)]
        input: Option<String>,
        #[arg(long)]
        rules: Option<String>,
        #[arg(long)]
        mock: bool,
        #[command(flatten)]
        binning: BinningArgs,
        #[arg(long)]
        data_dir: Option<String>,
    },
}

fn apply_overrides(config: &mut Config, binning: &BinningArgs, data_dir: &Option<String>) -> Result<()> {
    if let Some(n) = binning.bins {
        config.binning.n_bins = n;
    }
    if let Some(method) = &binning.method {
        config.binning.method = method
            .parse::<BinningMethod>()
            .map_err(anyhow::Error::msg)?;
    }
    if binning.columns.is_some() {
        config.binning.columns = binning.columns.clone();
    }
    if let Some(dir) = data_dir {
        config.data_dir = dir.clone();
    }
    Ok(())
}

fn run_bin_command(input: &str, config: &Config) -> Result<()> {
    let dataset = dataset_name(input);
    let df = load_csv(input)?;

    let builder = CaseModelBuilder::from_config(&config.binning)?;
    let table = builder
        .discretize_dataframe(&df)
        .with_context(|| format!("Failed to discretize {}", input))?;
    write_discretized_parquet(&config.data_dir, &dataset, &table)?;

    for column in table.columns() {
        println!("{}: {:?}", column.name, column.bin_counts());
    }
    Ok(())
}

fn run_cases_command(dataset: &str, df: &DataFrame, config: &Config) -> Result<CaseModel> {
    tracing::info!(
        "Building case model for dataset={}, n_bins={}, method={}",
        dataset,
        config.binning.n_bins,
        config.binning.method
    );

    let builder = CaseModelBuilder::from_config(&config.binning)?;
    let model = builder
        .build_from_dataframe(df)
        .with_context(|| format!("Failed to build case model for {}", dataset))?;

    write_case_model_jsonl(&config.data_dir, dataset, &model)?;
    write_case_model_parquet(&config.data_dir, dataset, &model)?;

    let mut top: Vec<_> = model.iter().collect();
    top.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    println!("\nTop 10 cases by probability:");
    for case in top.iter().take(10) {
        println!("{:.4}  {}", case.probability, format_facts(&case.facts));
    }
    Ok(model)
}

fn run_rules_command(path: &str, dataset: &str, config: &Config) -> Result<RuleBatch> {
    tracing::info!("Parsing rules from {}", path);

    let rules = load_rules_file(path)?;
    let parser = RuleParser::new(config.rules.class_names.clone());
    let batch = parse_batch_parallel(&parser, &rules);

    write_arguments_jsonl(&config.data_dir, dataset, &batch.arguments)?;
    if config.rules.review_failures && !batch.failures.is_empty() {
        write_rule_failures_jsonl(&config.data_dir, dataset, &batch.failures)?;
    }

    for failure in &batch.failures {
        println!("FAILED [{}]: {}", failure.index, failure.error);
    }
    Ok(batch)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Bin { input, binning, data_dir } => {
            apply_overrides(&mut config, &binning, &data_dir)?;
            run_bin_command(&input, &config)?;
        }
        Commands::Cases { input, binning, data_dir } => {
            apply_overrides(&mut config, &binning, &data_dir)?;
            let (dataset, df) = load_input(Some(input.as_str()), false, &config.mock)?;
            run_cases_command(&dataset, &df, &config)?;
        }
        Commands::Rules { input, class_names, data_dir } => {
            if class_names.is_some() {
                config.rules.class_names = class_names;
            }
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            run_rules_command(&input, &dataset_name(&input), &config)?;
        }
        Commands::RunAll { input, rules, mock, binning, data_dir } => {
            apply_overrides(&mut config, &binning, &data_dir)?;
            let (dataset, df) = load_input(input.as_deref(), mock, &config.mock)?;

            let model = run_cases_command(&dataset, &df, &config)?;
            let batch = match &rules {
                Some(path) => Some(run_rules_command(path, &dataset, &config)?),
                None => None,
            };

            println!("\n=== Pipeline Summary ===");
            println!("Dataset: {}", dataset);
            println!("Rows: {}", df.height());
            println!("Bins: {} ({})", config.binning.n_bins, config.binning.method);
            println!("Cases: {}", model.len());
            if let Some(batch) = batch {
                println!("Arguments: {}", batch.arguments.len());
                println!("Rule failures: {}", batch.failures.len());
            }
        }
    }

    Ok(())
}
