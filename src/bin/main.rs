use clap::Parser;
use crossterm::style::Stylize;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use wordfreq_core::cache::NoopCacheStore;
use wordfreq_core::{Analyzer, AnalyzerConfig, RankedResult, RawRequest, ValidationErrors};

/// Count the most frequent words in a text or a .txt file
#[derive(Parser, Debug)]
#[command(name = "wordfreq", version, about, long_about = None)]
struct Args {
    /// Text to analyze ("-" reads stdin)
    text: Option<String>,

    /// Text file to analyze (.txt)
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Show top N words
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    top: Option<i64>,

    /// Word to leave out of the count (repeatable)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Keep results across runs in this directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Skip the result cache entirely
    #[arg(long, conflicts_with = "cache_dir")]
    no_cache: bool,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match AnalyzerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "invalid configuration");
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            return ExitCode::from(1);
        }
    };

    let text = match args.text.as_deref() {
        Some("-") => {
            let mut input = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut input) {
                eprintln!("{} failed to read stdin: {}", "[ERROR]".red().bold(), e);
                return ExitCode::from(1);
            }
            Some(input)
        }
        _ => args.text.clone(),
    };

    let request = RawRequest {
        text,
        text_file: args.file.clone(),
        top: args.top,
        exclude: Some(args.exclude.clone()),
    };
    let input = match request.validate() {
        Ok(input) => input,
        Err(errors) => {
            print_validation_errors(&errors, args.json);
            return ExitCode::from(2);
        }
    };

    let analyzer = match &args.cache_dir {
        _ if args.no_cache => Analyzer::new(Arc::new(NoopCacheStore), config),
        Some(dir) => Analyzer::with_disk_cache_or_memory(dir, config),
        None => Analyzer::in_memory(config),
    };

    match analyzer.analyze(&input) {
        Ok(result) => {
            if args.json {
                println!("{}", serde_json::json!({ "data": result }));
            } else {
                print_table(&result, input.top);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "analysis failed");
            if args.json {
                println!("{}", serde_json::json!({ "error": e.to_string(), "code": e.error_code() }));
            } else {
                eprintln!("{} {}", "[ERROR]".red().bold(), e);
            }
            ExitCode::from(1)
        }
    }
}

fn print_validation_errors(errors: &ValidationErrors, json: bool) {
    if json {
        println!("{}", serde_json::to_string(errors).unwrap_or_else(|_| "{}".to_string()));
        return;
    }
    for (field, messages) in errors.fields() {
        for message in messages {
            eprintln!("{} {}: {}", "[INVALID]".yellow().bold(), field, message);
        }
    }
}

fn print_table(result: &RankedResult, top: usize) {
    println!("{}", format!("Top {} words", top).bold());
    println!("---------------------------------------");
    if result.is_empty() {
        println!("No words found.");
        return;
    }
    let width = result.iter().map(|e| e.word.chars().count()).max().unwrap_or(0);
    for (i, entry) in result.iter().enumerate() {
        let padded = format!("{:<width$}", entry.word, width = width);
        println!("{:>4}. {}  {}", i + 1, padded.cyan(), entry.count);
    }
}
