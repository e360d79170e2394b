mod overrides;
mod reports;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;
use montecarlo::{DiceSpec, ExperimentConfig, TableFormat, parse_face_list};
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use overrides::{WeightFlag, apply_weight_flags};

#[derive(Debug, Parser)]
#[command(name = "montecarlo", version)]
#[command(about = "Roll weighted dice and tabulate jackpots, face counts, combinations and permutations")]
struct Args {
    /// JSON experiment file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Die faces (comma-separated), e.g. `1,2,3,4,5,6` or `heads,tails`
    #[arg(long)]
    faces: Option<String>,

    /// Number of identical dice in the game
    #[arg(long)]
    dice: Option<usize>,

    /// Number of rolls to play
    #[arg(long)]
    rolls: Option<usize>,

    /// Seed for a reproducible play
    #[arg(long)]
    seed: Option<u64>,

    /// Weight override for every die, as FACE=WEIGHT (repeatable)
    #[arg(long = "weight", value_name = "FACE=WEIGHT")]
    weights: Vec<String>,

    /// Weight override for one die, as DIE:FACE=WEIGHT (repeatable)
    #[arg(long = "die-weight", value_name = "DIE:FACE=WEIGHT")]
    die_weights: Vec<String>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Also print the most recent play table (`wide` or `narrow`)
    #[arg(long)]
    table: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

const DEFAULT_FACES: &str = "1,2,3,4,5,6";
const DEFAULT_ROLLS: usize = 100;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    let table_format = parse_table_format(args.table.as_deref())?;

    let start_time = Instant::now();
    let (game, report) = config.run().context("experiment failed")?;
    info!(
        "played {} rolls of {} dice (seed {})",
        report.n_rolls, report.n_dice, report.seed
    );

    let mut output_target = OutputTarget::new(args.output.clone())?;
    if output_target.is_file() {
        colored::control::set_override(false);
    } else if args.report == "console" {
        announce_banner();
    }

    match args.report.as_str() {
        "json" => reports::generate_json_report(output_target.writer(), &report)?,
        "markdown" => reports::generate_markdown_report(output_target.writer(), &report)?,
        "csv" => reports::generate_csv_report(output_target.writer(), &report)?,
        _ => reports::generate_console_report(
            output_target.writer(),
            &report,
            start_time.elapsed(),
        )?,
    }

    if let Some(format) = table_format {
        reports::write_play_table(output_target.writer(), &game, format)?;
    }

    output_target.finish()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    println!("{}", "🎲 Monte Carlo Dice".bright_cyan().bold());
    println!("{}", "===================".cyan());
}

fn parse_table_format(value: Option<&str>) -> Result<Option<TableFormat>> {
    value
        .map(|format| format.parse::<TableFormat>())
        .transpose()
        .context("invalid --table value")
}

/// Resolve the experiment from the optional config file plus command-line flags.
fn build_config(args: &Args) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ExperimentConfig {
            faces: parse_face_list(DEFAULT_FACES),
            dice: DiceSpec::default(),
            weights: Default::default(),
            rolls: DEFAULT_ROLLS,
            seed: None,
        },
    };

    if let Some(faces) = &args.faces {
        config.faces = parse_face_list(faces);
    }
    if let Some(dice) = args.dice {
        config.dice = DiceSpec::Count(dice);
    }
    if let Some(rolls) = args.rolls {
        config.rolls = rolls;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let flags = args
        .weights
        .iter()
        .map(|token| WeightFlag::parse_shared(token))
        .chain(
            args.die_weights
                .iter()
                .map(|token| WeightFlag::parse_scoped(token)),
        )
        .collect::<Result<Vec<_>>>()?;
    apply_weight_flags(&mut config, &flags)?;

    config.validate().context("invalid experiment")?;
    Ok(config)
}

fn load_config(path: &Path) -> Result<ExperimentConfig> {
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    ExperimentConfig::from_json(&json)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Report sink: stdout, or a file when `--output` is given.
struct OutputTarget {
    sink: BufWriter<Box<dyn Write>>,
    to_file: bool,
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        let (inner, to_file): (Box<dyn Write>, bool) = match path {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                (Box::new(file), true)
            }
            None => (Box::new(stdout()), false),
        };
        Ok(Self {
            sink: BufWriter::new(inner),
            to_file,
        })
    }

    const fn is_file(&self) -> bool {
        self.to_file
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.sink
    }

    fn finish(mut self) -> std::io::Result<()> {
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use montecarlo::FaceValue;

    fn base_args() -> Args {
        Args {
            config: None,
            faces: None,
            dice: None,
            rolls: None,
            seed: None,
            weights: Vec::new(),
            die_weights: Vec::new(),
            report: "console".to_string(),
            table: None,
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("montecarlo-main-{label}-{}", std::process::id()))
    }

    #[test]
    fn defaults_describe_two_fair_d6() {
        let config = build_config(&base_args()).unwrap();
        assert_eq!(config.faces.len(), 6);
        assert_eq!(config.dice, DiceSpec::Count(2));
        assert_eq!(config.rolls, DEFAULT_ROLLS);
        assert!(config.weights.is_empty());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args {
            faces: Some("heads,tails".to_string()),
            dice: Some(3),
            rolls: Some(9),
            seed: Some(4),
            weights: vec!["heads=3".to_string()],
            ..base_args()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.faces, vec![FaceValue::text("heads"), FaceValue::text("tails")]);
        assert_eq!(config.dice, DiceSpec::Count(3));
        assert_eq!(config.rolls, 9);
        assert_eq!(config.seed, Some(4));
        assert!(config.weights.contains_key("heads"));
    }

    #[test]
    fn config_file_is_loaded_and_overridden() {
        let path = temp_path("config.json");
        fs::write(&path, r#"{"faces": [1, 2, 3], "dice": 4, "rolls": 7, "seed": 1}"#).unwrap();
        let args = Args {
            config: Some(path),
            rolls: Some(11),
            ..base_args()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.faces.len(), 3);
        assert_eq!(config.dice, DiceSpec::Count(4));
        assert_eq!(config.rolls, 11);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args {
            config: Some(temp_path("does-not-exist.json")),
            ..base_args()
        };
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn duplicate_faces_fail_validation() {
        let args = Args {
            faces: Some("1,1,2".to_string()),
            ..base_args()
        };
        let err = build_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("not distinct"));
    }

    #[test]
    fn zero_padded_faces_stay_distinct() {
        let args = Args {
            faces: Some("01,1".to_string()),
            weights: vec!["01=2".to_string()],
            ..base_args()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.faces, vec![FaceValue::text("01"), FaceValue::Int(1)]);
    }

    #[test]
    fn unknown_face_override_fails_validation() {
        let args = Args {
            weights: vec!["9=2".to_string()],
            ..base_args()
        };
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn table_format_accepts_only_known_layouts() {
        assert_eq!(parse_table_format(None).unwrap(), None);
        assert_eq!(
            parse_table_format(Some("narrow")).unwrap(),
            Some(TableFormat::Narrow)
        );
        assert!(parse_table_format(Some("tall")).is_err());
    }

    #[test]
    fn output_target_writes_file() {
        let path = temp_path("out.txt");
        let mut target = OutputTarget::new(Some(path.clone())).unwrap();
        assert!(target.is_file());
        target.writer().write_all(b"ok").unwrap();
        target.finish().unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "ok");
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        assert!(!target.is_file());
        target.writer().write_all(b"").unwrap();
        target.finish().unwrap();
    }
}
