use anyhow::{Context, Result};
use clap::Parser;
use codex_canon::{
    canon::{transition_delta, validate_sequence},
    cli::{
        AnalyzerArgs, CheckArgs, Cli, Command, DegeneracyArgs, InputArgs, InspectArgs,
        OutputFormat, TraceArgs,
    },
    degeneracy::{detect_degeneracy, DegeneracyConfig},
    json_output::CheckReport,
    parser::{parse_tokens, ParsedTokens},
    text_output,
    trace::ExecutionTrace,
};
use std::io::Read;
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

/// Read token content from the file argument or stdin
fn read_input(input: &InputArgs) -> Result<String> {
    if input.stdin {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Error reading stdin")?;
        return Ok(content);
    }
    match &input.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Error reading file: {}", path.display())),
        None => anyhow::bail!("Must specify a FILE or --stdin"),
    }
}

/// Parse tokens, failing when nothing recognizable remains
fn load_tokens(input: &InputArgs, verbose: bool) -> Result<ParsedTokens> {
    let content = read_input(input)?;
    let parsed = parse_tokens(&content)?;

    if parsed.indices.is_empty() {
        if verbose && parsed.has_unknown() {
            eprintln!("Parse errors:");
            for event in &parsed.unknown {
                eprintln!("  {}", event);
            }
        }
        anyhow::bail!("No valid tokens found");
    }
    Ok(parsed)
}

/// Defaults, then the TOML file, then `--window-size`
fn load_config(args: &AnalyzerArgs) -> Result<DegeneracyConfig> {
    let mut config = match &args.config {
        Some(path) => DegeneracyConfig::from_toml(path)?,
        None => DegeneracyConfig::default(),
    };
    if let Some(window_size) = args.window_size {
        config = config.with_window_size(window_size);
        config.validate()?;
    }
    Ok(config)
}

fn run_check(args: CheckArgs) -> Result<bool> {
    let parsed = load_tokens(&args.input, args.verbose)?;
    let validation = validate_sequence(&parsed.indices);

    let mut report = CheckReport::new(parsed.indices.len());
    report.add_events(parsed.unknown);
    report.add_events(validation.to_gray_events());
    if args.degeneracy {
        let config = load_config(&args.analyzer)?;
        report.add_degeneracy(detect_degeneracy(&parsed.indices, &config));
    }

    match args.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => {
            println!(
                "{}",
                text_output::format_summary(
                    &parsed.indices,
                    report.is_valid,
                    &report.gray_events,
                    args.verbose,
                )
            );
            if let Some(metrics) = &report.degeneracy {
                println!("{}", text_output::format_degeneracy(metrics));
            }
        }
    }

    Ok(report.is_valid)
}

fn run_degeneracy(args: DegeneracyArgs) -> Result<bool> {
    let parsed = load_tokens(&args.input, false)?;
    let config = load_config(&args.analyzer)?;
    let metrics = detect_degeneracy(&parsed.indices, &config);
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(!metrics.is_degenerate)
}

/// Label a transition by the direction it moves around the cycle
fn step_operator(from: usize, to: usize) -> &'static str {
    match transition_delta(from, to) {
        1 => "forward",
        6 => "backward",
        _ => "jump",
    }
}

fn run_trace(args: TraceArgs) -> Result<bool> {
    let parsed = load_tokens(&args.input, false)?;
    let mut trace = ExecutionTrace::create(args.trace_id);
    for pair in parsed.indices.windows(2) {
        trace.add_step(pair[0], step_operator(pair[0], pair[1]), pair[1], None, None);
    }

    match &args.output {
        Some(path) => {
            trace
                .save(path)
                .with_context(|| format!("Error writing trace: {}", path.display()))?;
            print!("{}", text_output::format_trace(&trace));
            println!("Saved: {}", path.display());
        }
        None => println!("{}", trace.to_json()?),
    }

    Ok(trace.is_clean())
}

fn run_inspect(args: InspectArgs) -> Result<bool> {
    let trace = ExecutionTrace::load(&args.trace_file)
        .with_context(|| format!("Error loading trace: {}", args.trace_file.display()))?;
    print!("{}", text_output::format_trace(&trace));
    Ok(trace.is_clean())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let passed = match args.command {
        Command::Check(check) => run_check(check)?,
        Command::Degeneracy(degeneracy) => run_degeneracy(degeneracy)?,
        Command::Trace(trace) => run_trace(trace)?,
        Command::Inspect(inspect) => run_inspect(inspect)?,
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}
