use clap::Parser;
use property_address_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Property Address Processor - Sale Export Cleaner");
    println!("================================================");
    println!();
    println!("Filter a property-sale export to whitelisted property classes,");
    println!("standardize street addresses and keep the latest sale per address.");
    println!();
    println!("USAGE:");
    println!("    property-address-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process        Process a CSV or Excel export (main command)");
    println!("    history        List previously processed files, newest first");
    println!("    standardize    Standardize addresses given on the command line");
    println!("    help           Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Increase logging verbosity");
    println!("    -q, --quiet      Suppress non-essential output");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process an export with the default property classes:");
    println!("    property-address-processor process sales.xlsx");
    println!();
    println!("    # Keep only condos and write Parquet to a custom directory:");
    println!("    property-address-processor process sales.csv --classes CD,R4 \\");
    println!("                                       --format parquet --output-dir out");
    println!();
    println!("    # Show what an address standardizes to:");
    println!("    property-address-processor standardize \"12 n main st\"");
    println!();
    println!("For detailed help on any command, use:");
    println!("    property-address-processor <COMMAND> --help");
}
