use clap::{Parser, Subcommand};
use fhir::{ClinicalMapping, TermSelection};
use namaste_core::{TerminologyTable, DEFAULT_SOURCE_CSV_PATH, DEFAULT_TABLE_PATH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "namaste")]
#[command(about = "NAMASTE to ICD-11 terminology CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the JSON terminology table from the CSV mapping source
    Ingest {
        /// CSV source with namaste_term, namaste_code, tm2_code, tm2_term, bio_code, bio_term
        #[arg(default_value = DEFAULT_SOURCE_CSV_PATH)]
        source: PathBuf,
        /// Output path for the serialized table
        #[arg(default_value = DEFAULT_TABLE_PATH)]
        output: PathBuf,
    },
    /// Search terms by case-insensitive substring
    Search {
        /// Partial term text
        query: String,
        /// Terminology table (.csv or .json)
        #[arg(long, default_value = DEFAULT_TABLE_PATH)]
        table: PathBuf,
    },
    /// Print the FHIR problem list for a mapping
    Generate {
        #[arg(long)]
        namaste_term: String,
        #[arg(long)]
        namaste_code: String,
        #[arg(long)]
        tm2_code: String,
        #[arg(long)]
        tm2_term: String,
        #[arg(long)]
        bio_code: String,
        #[arg(long)]
        bio_term: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Ingest { source, output }) => {
            println!("--- Reading file from {} ---", source.display());
            let table = match TerminologyTable::from_csv_path(&source) {
                Ok(table) => table,
                Err(e) => {
                    eprintln!("Error building terminology table: {}", e);
                    std::process::exit(1);
                }
            };
            match table.write_json(&output) {
                Ok(()) => println!(
                    "Success! {} has been created with {} terms.",
                    output.display(),
                    table.len()
                ),
                Err(e) => {
                    eprintln!("Error writing terminology table: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Search { query, table }) => {
            let table = match TerminologyTable::load(&table) {
                Ok(table) => table,
                Err(e) => {
                    eprintln!("Error loading terminology table: {}", e);
                    std::process::exit(1);
                }
            };
            let results = table.search(Some(&query));
            if results.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        Some(Commands::Generate {
            namaste_term,
            namaste_code,
            tm2_code,
            tm2_term,
            bio_code,
            bio_term,
        }) => {
            let selection = TermSelection {
                namaste_term,
                namaste_code,
                tm2_code,
                tm2_term,
                bio_code,
                bio_term,
            };
            let document = ClinicalMapping::generate(&selection);
            println!("{}", ClinicalMapping::render(&document)?);
        }
        None => {
            println!("Use 'namaste --help' for commands");
        }
    }

    Ok(())
}
