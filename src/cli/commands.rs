//! Command implementations for the property address processor CLI
//!
//! This module contains the command execution logic, terminal reporting
//! and output persistence. The library pipeline never writes files; this
//! layer owns that.

use crate::cli::args::{Args, Commands, HistoryArgs, ProcessArgs, StandardizeArgs};
use crate::config::ProcessorConfig;
use crate::constants::columns;
use crate::history::list_processed_files;
use crate::models::{ProcessOutcome, ProcessedData};
use crate::processor::DataProcessor;
use crate::standardizer::AddressStandardizer;
use crate::writer::{output_file_name, write_output};

use anyhow::{Context, Result, bail};
use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info};

/// Main command runner
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args);

    match args.command {
        Some(Commands::Process(process_args)) => run_process(&process_args, args.quiet),
        Some(Commands::History(history_args)) => run_history(&history_args),
        Some(Commands::Standardize(standardize_args)) => run_standardize(&standardize_args),
        None => bail!("No command given. Use --help to list commands."),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("property_address_processor={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Load configuration (file -> CLI overrides) for the process command
fn load_configuration(args: &ProcessArgs) -> Result<ProcessorConfig> {
    let mut config = ProcessorConfig::load(args.config_file.as_deref())
        .context("Failed to load configuration")?;

    if let Some(classes) = &args.classes {
        config = config.with_property_classes(classes.iter().map(|code| code.trim().to_string()));
    }
    if let Some(directory) = &args.output_dir {
        config = config.with_output_directory(directory.clone());
    }
    if let Some(format) = args.format {
        config = config.with_output_format(format);
    }
    if let Some(rows) = args.preview {
        config = config.with_preview_rows(rows);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run_process(args: &ProcessArgs, quiet: bool) -> Result<()> {
    let config = load_configuration(args)?;
    let processor = DataProcessor::from_config(config.clone())?;

    if !quiet {
        println!("{}", "Starting address processing".bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), args.input.display());
        println!(
            "  {} {}",
            "Property classes:".bright_cyan(),
            processor.valid_property_classes().join(", ")
        );
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid spinner template")?,
    );
    if quiet {
        spinner.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }
    spinner.set_message("Processing file...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = processor.process(&args.input);
    spinner.finish_and_clear();

    let mut data = match outcome {
        ProcessOutcome::Processed(data) => data,
        ProcessOutcome::EmptyInput { diagnostic } => {
            debug!("Empty input: {}", diagnostic);
            bail!("Unable to process the input file. Please ensure it contains valid data.");
        }
        ProcessOutcome::Failed { diagnostic } => {
            bail!("An error occurred while processing the file: {}", diagnostic);
        }
    };

    if !quiet {
        print_summary(&data);
    }

    if data.is_empty() {
        println!("{}", "No valid data was found after processing.".bright_yellow());
        return Ok(());
    }

    if !quiet && config.output.preview_rows > 0 {
        print_preview(&data, config.output.preview_rows)?;
    }

    if args.no_write {
        info!("Skipping output file (--no-write)");
        return Ok(());
    }

    let file_name = output_file_name(&args.input, config.output.format, &Local::now());
    let path = write_output(
        &mut data.frame,
        &config.output.directory,
        &file_name,
        config.output.format,
    )?;

    println!(
        "{} {}",
        "File processed successfully! Saved as".bright_green(),
        path.display().to_string().bright_white().bold()
    );
    Ok(())
}

fn print_summary(data: &ProcessedData) {
    let stats = &data.stats;
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows loaded:".bright_cyan(),
        stats.rows_loaded.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Excluded by class:".bright_cyan(),
        stats.rows_excluded_by_class.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Duplicates removed:".bright_cyan(),
        stats.duplicates_removed.to_string().bright_white()
    );
    if stats.unparseable_sale_dates > 0 {
        println!(
            "  {} {}",
            "Unparseable sale dates:".bright_yellow(),
            stats.unparseable_sale_dates.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {}",
        "Rows output:".bright_cyan(),
        stats.rows_output.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Processed:".bright_cyan(),
        data.processed_at.bright_white()
    );
}

fn print_preview(data: &ProcessedData, rows: usize) -> Result<()> {
    let preview = data
        .frame
        .select([columns::FULL_ADDRESS, columns::PROCESSED_DATE])?
        .head(Some(rows));

    println!(
        "\n{}",
        "Filtered and Standardized Address List".bright_green().bold()
    );
    println!("{}", preview);
    Ok(())
}

fn run_history(args: &HistoryArgs) -> Result<()> {
    let mut config = ProcessorConfig::load(args.config_file.as_deref())
        .context("Failed to load configuration")?;
    if let Some(directory) = &args.output_dir {
        config = config.with_output_directory(directory.clone());
    }

    let entries = list_processed_files(&config.output.directory)?;
    if entries.is_empty() {
        println!("No processing history available yet.");
        return Ok(());
    }

    println!("{}", "Processed Files".bright_green().bold());
    for entry in &entries {
        println!(
            "  {} {}",
            entry.file_name.bright_white(),
            format!("(Processed on {})", entry.modified_display()).bright_black()
        );
    }
    Ok(())
}

fn run_standardize(args: &StandardizeArgs) -> Result<()> {
    let standardizer = AddressStandardizer::new()?;
    for address in &args.addresses {
        println!(
            "{} {} {}",
            address,
            "->".bright_black(),
            standardizer.standardize(address).bright_white()
        );
    }
    Ok(())
}
