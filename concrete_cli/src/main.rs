//! # ConcreteFlow CLI
//!
//! Runs concrete_core calculations from the command line. Inputs are JSON
//! files, results are printed as JSON (or saved with `--output`).
//!
//! ## Commands
//!
//! - `calc`: element calculation or joist-floor selection from a parameter file
//! - `joist`: joist selection straight from flags and a span table
//! - `codes`: list known design codes with their coefficients
//! - `compare`: required steel for one moment under every implemented code
//! - `cover`: nominal cover for an exposure class

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use concrete_core::calculations::{
    select_joist, CalculationRecord, CalculationStatus, JoistRequest, ProductType, SelectionPolicy,
};
use concrete_core::codes::registry;
use concrete_core::file_io::{load_parameters, load_span_table, save_json};

#[derive(Parser)]
#[command(name = "concreteflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-standard precast concrete calculations (EC2, ACI 318, BAEL 91)", long_about = None)]
struct Cli {
    /// Enable debug logging (otherwise RUST_LOG, default warn)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write JSON output to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a calculation from a parameter file
    Calc {
        /// Parameter bundle (JSON: geometry, loads, materials, conditions)
        #[arg(short, long)]
        params: PathBuf,

        /// Product type, e.g. beam, solid_slab, joist_block_floor
        #[arg(long, default_value = "beam", value_parser = parse_product)]
        product: ProductType,

        /// Design code or alias
        #[arg(short, long, env = "CONCRETEFLOW_CODE", default_value = "EC2")]
        code: String,

        /// Span table (JSON), required for joist_block_floor
        #[arg(long)]
        span_table: Option<PathBuf>,

        /// Calculation name
        #[arg(long, default_value = "calculation")]
        name: String,
    },

    /// Select a joist from a span table
    Joist {
        /// Span table (JSON array of rows)
        #[arg(short, long)]
        table: PathBuf,

        /// Clear span (m)
        #[arg(long)]
        span: f64,

        /// Permanent load g (kN/m²)
        #[arg(long)]
        permanent: f64,

        /// Live load q (kN/m²)
        #[arg(long)]
        live: f64,

        /// Only joists at this spacing (cm)
        #[arg(long)]
        spacing: Option<u32>,

        /// Only this filler block height (cm)
        #[arg(long)]
        block_height: Option<u32>,

        /// economical, minimal_height or maximal_reserve
        #[arg(long, default_value = "economical", value_parser = parse_policy)]
        policy: SelectionPolicy,
    },

    /// List design codes
    Codes,

    /// Compare required steel across codes for one section
    Compare {
        /// Ultimate moment (kN·m)
        #[arg(short, long)]
        moment: f64,

        /// Width (m)
        #[arg(long)]
        width: f64,

        /// Total height (m)
        #[arg(long)]
        height: f64,

        /// Cover (m)
        #[arg(long, default_value = "0.03")]
        cover: f64,
    },

    /// Nominal cover for an exposure class
    Cover {
        #[arg(short, long, env = "CONCRETEFLOW_CODE", default_value = "EC2")]
        code: String,

        /// Exposure class, e.g. XC1, "interior", "moderate"
        #[arg(short, long, default_value = "XC1")]
        exposure: String,

        /// Bar diameter (mm)
        #[arg(short, long, default_value = "16")]
        bar: f64,
    },
}

fn parse_product(value: &str) -> Result<ProductType, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| {
        let names: Vec<&str> = ProductType::ALL.iter().map(|p| p.as_str()).collect();
        format!("unknown product '{}', expected one of: {}", value, names.join(", "))
    })
}

fn parse_policy(value: &str) -> Result<SelectionPolicy, String> {
    SelectionPolicy::ALL
        .into_iter()
        .find(|p| p.as_str() == value)
        .ok_or_else(|| format!("unknown policy '{}', expected economical, minimal_height or maximal_reserve", value))
}

#[derive(Serialize)]
struct CoverReport {
    code: String,
    exposure_class: String,
    bar_diameter_mm: f64,
    cover_mm: f64,
}

fn emit<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            save_json(value, path).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Saved {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let output = cli.output.as_ref();

    match cli.command {
        Commands::Calc {
            params,
            product,
            code,
            span_table,
            name,
        } => {
            let parameters = load_parameters(&params)
                .with_context(|| format!("Failed to load parameters from {}", params.display()))?;
            let table = span_table
                .as_ref()
                .map(|path| load_span_table(path).with_context(|| format!("Failed to load {}", path.display())))
                .transpose()?;

            let mut record = CalculationRecord::new(name, product, code, parameters);
            let status = record.run(table.as_ref());
            emit(&record, output)?;

            if status == CalculationStatus::Error {
                let reason = record.error.map(|e| e.to_string()).unwrap_or_default();
                bail!("Calculation failed: {}", reason);
            }
        }

        Commands::Joist {
            table,
            span,
            permanent,
            live,
            spacing,
            block_height,
            policy,
        } => {
            let rows = load_span_table(&table).with_context(|| format!("Failed to load {}", table.display()))?;
            let mut request = JoistRequest::new(span, permanent, live).with_policy(policy);
            request.spacing_cm = spacing;
            request.block_height_cm = block_height;

            let selection = select_joist(&request, &rows)?;
            emit(&selection, output)?;
        }

        Commands::Codes => emit(&registry::list_codes(), output)?,

        Commands::Compare {
            moment,
            width,
            height,
            cover,
        } => emit(&registry::compare_codes(moment, width, height, cover), output)?,

        Commands::Cover { code, exposure, bar } => {
            let strategy = registry::design_code_from_str(&code, None, None)?;
            let report = CoverReport {
                code: strategy.id().to_string(),
                cover_mm: strategy.minimum_cover(&exposure, bar),
                exposure_class: exposure,
                bar_diameter_mm: bar,
            };
            emit(&report, output)?;
        }
    }

    Ok(())
}
