use clap::Parser;
use eeg_bandpower::data::{default_output_path, SignalLoader};
use eeg_bandpower::{AnalysisParameters, BandPowerError, BandPowerPipeline, RunStatus};
use std::io::Write;
use std::path::PathBuf;

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;

#[derive(Parser)]
#[command(
    name = "bandpower",
    version,
    about = "Per-epoch EEG band power (delta, theta, alpha, beta, total)",
    long_about = "Compute delta, theta, alpha and beta power for every epoch of one channel \
                  of a delimited text file and write the table as CSV."
)]
struct Cli {
    /// Input file with a header row
    input: PathBuf,

    /// Output CSV path (default: <input stem>_bandpowers.csv next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with analysis parameters; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Analysis range start in Hz
    #[arg(long)]
    lower_bound: Option<f64>,

    /// Analysis range end in Hz
    #[arg(long)]
    upper_bound: Option<f64>,

    /// Epoch length in seconds
    #[arg(long)]
    epoch_length: Option<f64>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_frequency: Option<f64>,

    /// 0-based channel (column) index
    #[arg(long)]
    channel: Option<usize>,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Print the table as JSON to stdout instead of writing CSV
    #[arg(long)]
    json: bool,

    /// Show progress on stderr
    #[arg(long)]
    progress: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn parameters(&self) -> Result<AnalysisParameters, String> {
        let mut params = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
                serde_json::from_str(&text)
                    .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?
            }
            None => AnalysisParameters::default(),
        };

        if let Some(v) = self.lower_bound {
            params.lower_bound = v;
        }
        if let Some(v) = self.upper_bound {
            params.upper_bound = v;
        }
        if let Some(v) = self.epoch_length {
            params.epoch_length = v;
        }
        if let Some(v) = self.sample_frequency {
            params.sample_frequency = v;
        }
        if let Some(v) = self.channel {
            params.channel_index = v;
        }

        Ok(params)
    }

    fn delimiter_byte(&self) -> Result<u8, String> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| format!("Delimiter must be ASCII, got {:?}", self.delimiter))
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    std::process::exit(execute(&cli));
}

fn execute(cli: &Cli) -> i32 {
    let (params, delimiter) = match cli.parameters().and_then(|p| Ok((p, cli.delimiter_byte()?))) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return EXIT_INPUT;
        }
    };
    log::debug!("Parameters: {:?}", params);

    let pipeline =
        BandPowerPipeline::new(params).with_loader(SignalLoader::new().delimiter(delimiter));

    let mut show_progress = |percent: u8| {
        eprint!("\rProgress: {:>3}%", percent);
        if percent == 100 {
            eprintln!();
        }
        let _ = std::io::stderr().flush();
    };
    let progress = if cli.progress {
        Some(&mut show_progress as &mut dyn eeg_bandpower::ProgressReporter)
    } else {
        None
    };

    let report = match pipeline.run(&cli.input, progress) {
        Ok(report) => report,
        Err(err) => return report_error(&err),
    };

    // Recoverable conditions were already logged at warn level
    if report.status != RunStatus::Completed {
        eprintln!("No results to export.");
        return EXIT_OK;
    }

    if cli.json {
        return match serde_json::to_string_pretty(&report.table) {
            Ok(json) => {
                println!("{}", json);
                EXIT_OK
            }
            Err(e) => {
                eprintln!("Error: failed to serialize results: {}", e);
                EXIT_FAILURE
            }
        };
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));
    match report.table.save_csv(&output) {
        Ok(()) => {
            println!("{} epoch(s) written to {}", report.table.len(), output.display());
            EXIT_OK
        }
        Err(err) => report_error(&err),
    }
}

fn report_error(err: &BandPowerError) -> i32 {
    eprintln!("Error: {}", err);
    if err.is_input_error() {
        EXIT_INPUT
    } else {
        EXIT_FAILURE
    }
}
