use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use sales_insight::cannibalization::RulesUpdate;
use sales_insight::{
    available_families, compare_periods, run_analysis, segment_clients, segment_with,
    summarize, validate_clients, validate_volumes, ClientNode, ClientVolume, ComparisonConfig,
    Config, GroupType,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Sales analytics engines over JSON exports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to $CONFIG_FILE, then config/default.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect SKU cannibalization in a client -> family -> SKU export
    Cannibalization {
        /// JSON array of client nodes
        #[arg(short, long)]
        input: PathBuf,

        /// Month (1-12) where the post period starts
        #[arg(long)]
        split_month: Option<u32>,

        /// Decline fraction that qualifies a victim
        #[arg(long)]
        drop_threshold: Option<f64>,

        /// Rise fraction that qualifies a cannibal
        #[arg(long)]
        growth_threshold: Option<f64>,

        /// Minimum combined pre + post average volume
        #[arg(long)]
        min_volume: Option<f64>,
    },

    /// Segment clients by volume
    Segment {
        /// JSON array of {id, name, volume}
        #[arg(short, long)]
        input: PathBuf,

        /// quartiles, quintiles, deciles or percentiles
        #[arg(short, long)]
        group: Option<GroupType>,

        /// Only list the members of this segment (e.g. Q1)
        #[arg(long)]
        segment: Option<String>,

        #[arg(long, default_value = "1")]
        page: usize,

        #[arg(long, default_value = "50")]
        page_size: usize,
    },

    /// Compare segmentation between two periods
    Compare {
        #[arg(long)]
        period1: PathBuf,

        #[arg(long)]
        period2: PathBuf,

        #[arg(short, long)]
        group: Option<GroupType>,

        #[arg(long, default_value = "Period 1")]
        label1: String,

        #[arg(long, default_value = "Period 2")]
        label2: String,
    },
}

/// Report wrapper stamped at generation time
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T: Serialize> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    body: T,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    sales_insight::utils::init_from_config(&config.logging)?;

    match args.command {
        Command::Cannibalization {
            input,
            split_month,
            drop_threshold,
            growth_threshold,
            min_volume,
        } => {
            let clients: Vec<ClientNode> = read_json(&input)?;
            validate_clients(&clients)?;

            let rules = config.detection.with_update(&RulesUpdate {
                drop_threshold,
                growth_threshold,
                min_volume,
                split_month,
            });

            let cases = run_analysis(&clients, &rules);
            info!(clients = clients.len(), cases = cases.len(), "Cannibalization analysis done");

            write_report(
                args.output.as_deref(),
                &serde_json::json!({
                    "rules": rules,
                    "families": available_families(&clients),
                    "summary": summarize(&cases),
                    "cases": cases,
                }),
            )
        }

        Command::Segment {
            input,
            group,
            segment,
            page,
            page_size,
        } => {
            let clients: Vec<ClientVolume> = read_json(&input)?;
            validate_volumes(&clients)?;

            let mut settings = config.segmentation.clone();
            if let Some(group) = group {
                settings.group_type = group;
            }

            let report = segment_with(&clients, &settings);
            info!(
                clients = report.total_clients,
                segments = report.segments.len(),
                "Segmentation done"
            );

            match segment {
                Some(id) => {
                    let selected = report
                        .segment(&id)
                        .with_context(|| format!("segment {} not found", id))?;
                    let listing = segment_clients(&clients, selected, page, page_size);
                    write_report(args.output.as_deref(), &listing)
                }
                None => write_report(args.output.as_deref(), &report),
            }
        }

        Command::Compare {
            period1,
            period2,
            group,
            label1,
            label2,
        } => {
            let first: Vec<ClientVolume> = read_json(&period1)?;
            let second: Vec<ClientVolume> = read_json(&period2)?;
            validate_volumes(&first)?;
            validate_volumes(&second)?;

            let mut settings = config.segmentation.clone();
            if let Some(group) = group {
                settings.group_type = group;
            }

            let comparison = compare_periods(
                &first,
                &second,
                &ComparisonConfig {
                    segmentation: settings,
                    label1,
                    label2,
                    ..ComparisonConfig::default()
                },
            );
            write_report(args.output.as_deref(), &comparison)
        }
    }
}

/// Explicit path, then $CONFIG_FILE, then the default file if present
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::from_file(path);
    }
    if std::env::var("CONFIG_FILE").is_ok()
        || Path::new(sales_insight::utils::config::DEFAULT_CONFIG_PATH).exists()
    {
        return Config::load();
    }
    Ok(Config::default())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn write_report<T: Serialize>(output: Option<&Path>, body: &T) -> Result<()> {
    let envelope = Envelope {
        generated_at: Utc::now(),
        body,
    };
    let json = serde_json::to_string_pretty(&envelope)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("Report saved to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
