use ledger_report::args::{Args, Command};
use ledger_report::errors::{DraftError, StoreError};
use ledger_report::logging::init_tracing;
use ledger_report::report::listing;
use ledger_report::{Config, LedgerDraft, ReportStore, TransactionType};
use std::error::Error;
use std::path::PathBuf;
use std::process;

fn main() {
    init_tracing();
    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration: {}", err);
            process::exit(1);
        }
    };
    if let Some(dir) = args.dir {
        config.report_dir = dir;
    }

    let store = match ReportStore::open(&config.report_dir) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open report directory: {}", err);
            process::exit(1);
        }
    };

    let action = args.command.action();
    if let Err(err) = run(&store, &config, args.command) {
        eprintln!("failed to {}: {}", action, err);
        process::exit(1);
    }
}

/// Converts a 1-based row number into an index into `draft`.
fn row_index(draft: &LedgerDraft, row: usize) -> Result<usize, DraftError> {
    if row == 0 || row > draft.len() {
        return Err(DraftError::NoSuchRow(row));
    }

    Ok(row - 1)
}

/// Loads report `name`, or starts an empty draft if it does not exist yet.
fn open_draft(store: &ReportStore, name: &str) -> Result<(LedgerDraft, bool), StoreError> {
    if store.exists(name)? {
        Ok((LedgerDraft::from_entries(store.load(name)?), true))
    } else {
        Ok((LedgerDraft::new(), false))
    }
}

fn persist_draft(
    store: &ReportStore,
    name: &str,
    draft: &LedgerDraft,
    existed: bool,
) -> Result<PathBuf, StoreError> {
    if existed {
        store.save(name, draft.entries())
    } else {
        store.create(name, draft.entries())
    }
}

fn run(store: &ReportStore, config: &Config, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List => {
            let names = store.list()?;
            if names.is_empty() {
                println!("no reports in {}", store.dir().display());
            }
            for (i, name) in names.iter().enumerate() {
                println!("{}) {}", i + 1, name);
            }
        }
        Command::Show { report } => {
            let entries = store.load(&report)?;
            print!("{}", listing(&entries, &config.labels)?);
        }
        Command::Render { report } => {
            let path = store.export_pdf(&report, config)?;
            println!("{}", path.display());
        }
        Command::Add {
            report,
            transaction_type,
            mut input,
        } => {
            input.main = config
                .categories
                .main_or_first(transaction_type, Some(&input.main));
            let (mut draft, existed) = open_draft(store, &report)?;
            draft.add(&config.categories, transaction_type, input)?;
            let path = persist_draft(store, &report, &draft, existed)?;
            println!("{}", path.display());
        }
        Command::AddBatch {
            report,
            transaction_type,
            main,
            sub,
            rows,
        } => {
            let main = config
                .categories
                .main_or_first(transaction_type, main.as_deref());
            let (mut draft, existed) = open_draft(store, &report)?;
            let added = draft.add_batch(
                &config.categories,
                transaction_type,
                &main,
                sub.as_deref(),
                &rows,
            )?;
            let path = persist_draft(store, &report, &draft, existed)?;
            println!("added {} of {} rows to {}", added, rows.len(), path.display());
        }
        Command::Edit { report, row, patch } => {
            let mut draft = LedgerDraft::from_entries(store.load(&report)?);
            let index = row_index(&draft, row)?;
            draft.update(&config.categories, index, patch)?;
            store.save(&report, draft.entries())?;
        }
        Command::Remove { report, row } => {
            let mut draft = LedgerDraft::from_entries(store.load(&report)?);
            let index = row_index(&draft, row)?;
            let removed = draft.remove(index)?;
            store.save(&report, draft.entries())?;
            println!(
                "removed {} | {} | {}",
                removed.category, removed.description, removed.amount
            );
        }
        Command::Search { report, query } => {
            let draft = LedgerDraft::from_entries(store.load(&report)?);
            let hits = draft.search(&query);
            if hits.is_empty() {
                println!("no entries match {:?}", query);
            }
            for (index, entry) in hits {
                println!(
                    "{:<4} | {} | {} | {} | {}",
                    index + 1,
                    entry.transaction_type.label(),
                    entry.category,
                    entry.description,
                    entry.amount
                );
            }
        }
        Command::Categories { transaction_type } => {
            let types = match transaction_type {
                Some(transaction_type) => vec![transaction_type],
                None => vec![TransactionType::Income, TransactionType::Expense],
            };
            for transaction_type in types {
                println!("{}:", transaction_type);
                for (i, category) in config.categories.allowed(transaction_type).iter().enumerate() {
                    println!("  {}) {}", i + 1, category);
                }
            }
        }
    }

    Ok(())
}
