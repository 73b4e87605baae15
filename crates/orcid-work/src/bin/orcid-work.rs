//! orcid-work command line interface
//!
//! # Usage
//!
//! ```bash
//! # Print the work XML for a DOI
//! orcid-work xml 10.5061/dryad.8515
//!
//! # Check it against the bundled schema
//! orcid-work validate 10.5061/dryad.8515
//!
//! # Add it to a record (token from ORCID_ACCESS_TOKEN)
//! orcid-work create 10.5061/dryad.8515 --orcid 0000-0002-1825-0097
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use orcid_work::{load_environment, OrcidApi, WorkConfig, WorkError, WorkRecord, WorkTypeMapper};

#[derive(Parser)]
#[command(name = "orcid-work")]
#[command(version)]
#[command(about = "Build, validate and submit ORCID work records from DOI metadata")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: <config dir>/orcid-work/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Member API access token
    #[arg(long, global = true, env = "ORCID_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Fail on unmapped work types instead of using "other"
    #[arg(long, global = true)]
    strict_types: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the work record XML
    Xml {
        doi: String,
    },

    /// Print the BibTeX citation
    Citation {
        doi: String,
    },

    /// Validate the work record against the bundled schema
    Validate {
        doi: String,
    },

    /// Add the work to an ORCID record and print its put-code
    Create {
        doi: String,
        #[arg(long, env = "ORCID_ID")]
        orcid: String,
    },

    /// Replace an existing work
    Update {
        doi: String,
        #[arg(long)]
        put_code: String,
        #[arg(long, env = "ORCID_ID")]
        orcid: String,
    },

    /// Remove a work from an ORCID record
    Delete {
        #[arg(long)]
        put_code: String,
        #[arg(long, env = "ORCID_ID")]
        orcid: String,
    },

    /// List the works on an ORCID record
    Works {
        #[arg(long, env = "ORCID_ID")]
        orcid: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = load_environment() {
        tracing::warn!("{}", e);
    }
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, WorkError> {
    let config = WorkConfig::load(cli.config.as_deref())?;
    let token = cli.token.clone().unwrap_or_default();
    let mapper = if cli.strict_types {
        WorkTypeMapper::strict()
    } else {
        WorkTypeMapper::new()
    };
    let record = |doi: &str, orcid: &str| -> Result<WorkRecord, WorkError> {
        Ok(WorkRecord::from_config(doi, orcid, token.as_str(), &config)?.with_work_type_mapper(mapper))
    };

    match cli.command {
        Commands::Xml { doi } => match record(&doi, "")?.data()? {
            Some(xml) => println!("{}", xml),
            None => return incomplete(&doi),
        },
        Commands::Citation { doi } => match record(&doi, "")?.citation()? {
            Some(citation) => println!("{}", citation),
            None => return incomplete(&doi),
        },
        Commands::Validate { doi } => {
            let work = record(&doi, "")?;
            let errors = work.validation_errors()?;
            if !errors.is_empty() {
                for error in errors {
                    println!("{}", error);
                }
                return Ok(ExitCode::FAILURE);
            }
            println!("valid");
        }
        Commands::Create { doi, orcid } => {
            let put_code = OrcidApi::from_config(&config)?.create_work(&record(&doi, &orcid)?)?;
            println!("{}", put_code);
        }
        Commands::Update {
            doi,
            put_code,
            orcid,
        } => {
            OrcidApi::from_config(&config)?.update_work(&record(&doi, &orcid)?, &put_code)?;
        }
        Commands::Delete { put_code, orcid } => {
            OrcidApi::from_config(&config)?.delete_work(&orcid, &token, &put_code)?;
        }
        Commands::Works { orcid } => {
            println!("{}", OrcidApi::from_config(&config)?.get_works(&orcid, &token)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn incomplete(doi: &str) -> Result<ExitCode, WorkError> {
    eprintln!("Metadata for {} lacks title, container title, contributors or year", doi);
    Ok(ExitCode::FAILURE)
}
