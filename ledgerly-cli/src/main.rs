use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ledgerly_import::{CommitOutcome, HttpBackend, ImportCoordinator, UploadOutcome};
use ledgerly_ingest::{Direction, detect_dialect, parse_delimited, parse_tagged, StatementDialect};
use std::path::{Path, PathBuf};

mod config;

#[derive(Parser, Debug)]
#[command(name = "ledgerly", version, about = "Ledgerly statement import CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full import workflow: parse, categorize, commit
    Import {
        /// Statement export file (.csv, .ofx, .ofc)
        #[arg(long)]
        file: PathBuf,

        /// Target ledger id (defaults to the configured ledger)
        #[arg(long)]
        ledger: Option<String>,

        /// Assign a category: SEQ=NAME (repeatable)
        #[arg(long = "assign", value_name = "SEQ=NAME")]
        assign: Vec<String>,

        /// Define a new category for this session (repeatable)
        #[arg(long = "define", value_name = "NAME")]
        define: Vec<String>,

        /// Commit even if some transactions are uncategorized
        #[arg(long)]
        yes: bool,
    },

    /// Parse a statement file and print the transactions without committing
    Parse {
        #[arg(long)]
        file: PathBuf,

        /// Print canonical records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories available for assignment
    Categories,

    /// Show or change the backend configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Show,
    Set {
        #[arg(long)]
        api_base: Option<String>,

        #[arg(long)]
        api_token: Option<String>,

        #[arg(long)]
        default_ledger: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Import {
            file,
            ledger,
            assign,
            define,
            yes,
        } => {
            run_import(&file, ledger, &assign, &define, yes).await?;
        }

        Command::Parse { file, json } => {
            run_parse(&file, json)?;
        }

        Command::Categories => {
            let backend = backend_from_config()?;
            let coordinator = ImportCoordinator::new(backend);
            for name in coordinator.candidate_categories().await? {
                println!("{name}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Show => {
                let cfg = config::read_config()?;
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            }
            ConfigCommand::Set {
                api_base,
                api_token,
                default_ledger,
            } => {
                let mut cfg = config::read_config()?;
                if let Some(v) = api_base {
                    cfg.api_base = v;
                }
                if let Some(v) = api_token {
                    cfg.api_token = Some(v);
                }
                if let Some(v) = default_ledger {
                    cfg.default_ledger = Some(v);
                }
                config::write_config(&cfg)?;
                println!("Wrote {}", config::config_path()?.display());
            }
        },
    }

    Ok(())
}

async fn run_import(
    file: &Path,
    ledger: Option<String>,
    assign: &[String],
    define: &[String],
    yes: bool,
) -> Result<()> {
    let cfg = config::read_config()?;
    let ledger = match ledger.or(cfg.default_ledger.clone()) {
        Some(l) => l,
        None => bail!("no target ledger: pass --ledger or set one with `ledgerly config set --default-ledger <id>`"),
    };

    let filename = file_name(file)?;
    // Extension check runs before the file is read
    detect_dialect(&filename)?;
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;

    let backend = HttpBackend::new(&cfg.api_base, cfg.api_token.clone());
    let mut coordinator = ImportCoordinator::new(backend);

    match coordinator.begin_upload(&filename, &content)? {
        UploadOutcome::NoTransactions => {
            println!("Warning: no transactions found in {}", file.display());
            return Ok(());
        }
        UploadOutcome::Advanced { count } => {
            let session = coordinator.session().context("session should exist after upload")?;
            let (income, expense) = session.totals();
            println!("Parsed {count} transactions from {}", file.display());
            println!("  income:  {income:.2}");
            println!("  expense: {expense:.2}");
        }
    }

    coordinator.confirm_review()?;

    for name in define {
        if let Err(err) = coordinator.define_category(name).await {
            // The name stays usable for this session even if the remote
            // create failed.
            eprintln!("Warning: could not create category {name:?}: {err:#}");
        }
    }

    for pair in assign {
        let (sequence_id, label) = parse_assignment(pair)?;
        coordinator.assign_category(sequence_id, label)?;
    }

    match coordinator.commit(&ledger, yes).await? {
        CommitOutcome::NeedsConfirmation { uncategorized } => {
            println!("{uncategorized} transactions are still uncategorized.");
            println!("Re-run with --yes to commit anyway, or add --assign SEQ=NAME.");
        }
        CommitOutcome::Committed { count } => {
            println!("Imported {count} transactions into ledger {ledger}");
        }
    }

    Ok(())
}

fn run_parse(file: &Path, json: bool) -> Result<()> {
    let filename = file_name(file)?;
    let dialect = detect_dialect(&filename)?;
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;

    let txns = match dialect {
        StatementDialect::DelimitedText => parse_delimited(&content)?,
        StatementDialect::TaggedBlock => parse_tagged(&content)?,
    };

    if txns.is_empty() {
        println!("Warning: no transactions found in {}", file.display());
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&txns)?);
        return Ok(());
    }

    for t in &txns {
        let sign = match t.direction {
            Direction::Income => '+',
            Direction::Expense => '-',
        };
        println!(
            "#{:<4} {:<12} {}{:>10.2}  {}",
            t.sequence_id, t.date, sign, t.amount, t.description
        );
    }
    println!("\n{} transactions", txns.len());
    Ok(())
}

fn backend_from_config() -> Result<HttpBackend> {
    let cfg = config::read_config()?;
    Ok(HttpBackend::new(&cfg.api_base, cfg.api_token))
}

fn file_name(path: &Path) -> Result<String> {
    Ok(path
        .file_name()
        .with_context(|| format!("not a file path: {}", path.display()))?
        .to_string_lossy()
        .to_string())
}

fn parse_assignment(pair: &str) -> Result<(u32, &str)> {
    let Some((seq, label)) = pair.split_once('=') else {
        bail!("invalid --assign {pair:?}: expected SEQ=NAME");
    };
    let sequence_id: u32 = seq
        .trim()
        .parse()
        .with_context(|| format!("invalid sequence id in --assign {pair:?}"))?;
    let label = label.trim();
    if label.is_empty() {
        bail!("empty category name in --assign {pair:?}");
    }
    Ok((sequence_id, label))
}
