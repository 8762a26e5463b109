use anyhow::{Context, Result};
use clap::Parser;
use keylag::{
    cli::{Cli, OutputFormat},
    clock::MonotonicClock,
    config::KeylagConfig,
    csv_output,
    input::SymbolReader,
    json_output,
    session::{self, CaptureMode, Report},
    text_output::{self, TextOptions},
};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Config file (if any) with command line overrides applied
fn load_config(args: &Cli) -> Result<KeylagConfig> {
    let mut config = match &args.config {
        Some(path) => KeylagConfig::from_file(path)?,
        None => KeylagConfig::default(),
    };

    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(bins) = args.bins {
        config.bin_count = bins;
    }
    if let Some(sentinel) = args.sentinel {
        config.sentinel = sentinel;
    }
    if let Some(threshold) = args.anomaly_threshold {
        config.anomaly_threshold = threshold;
    }
    if args.stats_extended {
        config.stats_extended = true;
    }

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid command line settings")?;
    Ok(config)
}

/// Print the report and write it to the export file, if one is set
fn emit_report(report: &Report, config: &KeylagConfig, output: Option<&Path>) -> Result<()> {
    let rendered = match config.format {
        OutputFormat::Text => text_output::render(
            report,
            &TextOptions {
                stats_extended: config.stats_extended,
                anomaly_threshold: config.anomaly_threshold,
            },
        ),
        OutputFormat::Json => json_output::render(report)?,
        OutputFormat::Csv => csv_output::render(report),
    };

    // Text tables go to stderr (matching strace -c), data formats to stdout
    if config.format == OutputFormat::Text {
        eprint!("{}", rendered);
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
    }

    if let Some(path) = output.or_else(|| report.export_path(config)) {
        fs::write(path, &rendered)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }
    Ok(())
}

/// Capture one session from `input` and emit its report
fn run_once<R: BufRead>(
    mode: CaptureMode,
    config: &KeylagConfig,
    output: Option<&Path>,
    input: &mut R,
) -> Result<()> {
    let clock = MonotonicClock::new();
    let report = session::run_session(mode, &clock, SymbolReader::new(input), config)
        .with_context(|| format!("{} session failed", mode.label()))?;
    emit_report(&report, config, output)
}

/// Next menu number from `input`; `None` at end of input
fn read_menu_choice<R: BufRead>(input: &mut R) -> Result<Option<u32>> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        match token.parse() {
            Ok(choice) => return Ok(Some(choice)),
            Err(_) => eprintln!("Invalid choice: {}", token),
        }
    }
}

/// Interactive menu: pick a mode, capture, report, repeat until 0
fn run_menu<R: BufRead>(input: &mut R, config: &KeylagConfig, output: Option<&Path>) -> Result<()> {
    loop {
        println!(
            "Enter plot type to draw:\n\
             ------------------------\n\
             1. Curve\n\
             2. Histogram (one symbol)\n\
             3. Histogram (pair symbols)\n\
             0. Exit"
        );
        io::stdout().flush()?;

        let Some(choice) = read_menu_choice(input)? else {
            break;
        };
        if choice == 0 {
            break;
        }

        let Some(mode) = CaptureMode::from_menu_choice(choice) else {
            eprintln!("Unknown plot type: {}", choice);
            continue;
        };

        println!(
            "Enter characters, separating them by enter ('{}' for break)\n\
             ----------------------------------------------------------",
            config.sentinel
        );
        io::stdout().flush()?;

        // A failed session ends that session only; the menu keeps running
        if let Err(e) = run_once(mode, config, output, input) {
            eprintln!("Error: {:#}", e);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    match args.mode {
        Some(mode) => run_once(mode, &config, args.output.as_deref(), &mut input),
        None => run_menu(&mut input, &config, args.output.as_deref()),
    }
}
