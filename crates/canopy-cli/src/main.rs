use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use serde_json::json;

use canopy_core::data::io::{CsvOptions, read_csv_path};
use canopy_core::formula::coefficient_placeholders;
use canopy_core::{AliasMap, CanopyConfig};
use canopy_models::{DiagnosticSeries, Session};

#[derive(Parser)]
#[command(name = "canopy", version, about = "Allometric regression for forest inventory data")]
struct Cli {
    /// TOML configuration (cleaning, screening and extra presets)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit an equation by OLS, or evaluate it with fixed coefficients
    Fit(FitArgs),
    /// Report data-quality findings for a file
    Audit(InputArgs),
    /// List the named equation presets
    Presets,
}

#[derive(Args)]
struct InputArgs {
    /// Delimited text file with one tree per row
    input: PathBuf,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

#[derive(Args)]
struct FitArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Equation such as "ln(Y) = b0 + b1*ln(DAP)"
    #[arg(short, long, conflicts_with = "preset")]
    formula: Option<String>,

    /// Name of a library preset to fit instead of --formula
    #[arg(short, long)]
    preset: Option<String>,

    /// Bind an alias to a column, ALIAS=COLUMN
    #[arg(short, long = "alias", value_name = "ALIAS=COLUMN", value_parser = parse_pair::<String>)]
    aliases: Vec<(String, String)>,

    /// Dependent column, bound to Y unless --alias names it
    #[arg(long, value_name = "COLUMN")]
    dependent: Option<String>,

    /// Independent column bound to its default alias (DAP, HT or X<n>)
    #[arg(long = "independent", value_name = "COLUMN")]
    independents: Vec<String>,

    /// Fixed coefficient, bN=VALUE; switches to manual evaluation
    #[arg(short, long = "coef", value_name = "bN=VALUE", value_parser = parse_pair::<f64>)]
    coefficients: Vec<(String, f64)>,

    /// Display name of the model
    #[arg(long)]
    name: Option<String>,

    /// Emit the result as JSON
    #[arg(long)]
    json: bool,

    /// Include chart series in the JSON output
    #[arg(long, requires = "json")]
    plot_data: bool,
}

fn parse_pair<T>(text: &str) -> Result<(String, T), String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{text}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing name in '{text}'"));
    }
    let value = value
        .trim()
        .parse::<T>()
        .map_err(|e| format!("invalid value in '{text}': {e}"))?;
    Ok((key.to_string(), value))
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => CanopyConfig::from_path(path)?,
        None => CanopyConfig::default(),
    };
    let mut session = Session::with_config(config);

    match cli.command {
        Command::Presets => {
            for (name, formula) in session.library().iter() {
                println!("{name:<28} {formula}");
            }
            Ok(())
        }
        Command::Audit(input) => {
            let report = load(&mut session, &input)?;
            if report.is_clean() {
                println!("No issues found.");
            }
            for finding in &report.critical {
                println!("critical: {finding}");
            }
            for finding in &report.warning {
                println!("warning: {finding}");
            }
            Ok(())
        }
        Command::Fit(args) => fit(&mut session, args),
    }
}

fn load(
    session: &mut Session,
    input: &InputArgs,
) -> Result<canopy_core::data::AuditReport, Box<dyn Error>> {
    let delimiter =
        u8::try_from(input.delimiter).map_err(|_| "the delimiter must be a single-byte character")?;
    let options = CsvOptions {
        delimiter,
        ..CsvOptions::default()
    };
    let raw = read_csv_path(&input.input, options)?;
    Ok(session.load_raw(&raw))
}

fn fit(session: &mut Session, args: FitArgs) -> Result<(), Box<dyn Error>> {
    let formula = match (&args.formula, &args.preset) {
        (Some(formula), _) => formula.clone(),
        (None, Some(preset)) => session
            .library()
            .get(preset)
            .map(str::to_string)
            .ok_or_else(|| format!("unknown preset '{preset}'"))?,
        (None, None) => return Err("either --formula or --preset is required".into()),
    };

    let report = load(session, &args.input)?;
    for finding in report.critical.iter().chain(&report.warning) {
        eprintln!("audit: {finding}");
    }

    let mut aliases = AliasMap::new();
    if let Some(column) = &args.dependent {
        aliases.bind_dependent("", column);
    }
    for (position, column) in args.independents.iter().enumerate() {
        aliases.bind("", column, position);
    }
    for (alias, column) in &args.aliases {
        aliases.insert(alias.as_str(), column.as_str());
    }
    session.set_aliases(aliases);

    let name = args.name.as_deref();
    if args.coefficients.is_empty() {
        session.fit(&formula, name)?;
    } else {
        let coefficients: IndexMap<String, f64> = args.coefficients.iter().cloned().collect();
        let missing: Vec<String> = coefficient_placeholders(&formula)
            .into_iter()
            .filter(|c| !coefficients.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing coefficient value(s): {}", missing.join(", ")).into());
        }
        session.evaluate_manual(&formula, &coefficients, name)?;
    }
    let result = session.current().ok_or("no result was produced")?;

    if !args.json {
        println!("{result}");
        return Ok(());
    }

    let mut output = serde_json::to_value(result)?;
    if args.plot_data {
        let dataset = session.dataset().ok_or("no dataset loaded")?;
        let series = DiagnosticSeries::build(result, dataset, session.aliases())?;
        output = json!({ "result": output, "plot_data": serde_json::to_value(series)? });
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
