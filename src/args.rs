use crate::draft::{EntryInput, EntryPatch};
use crate::entry::TransactionType;
use clap::{value_t, App, AppSettings, Arg, ArgMatches, ErrorKind, SubCommand};
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "ledger_report.json";

const TRANSACTION_TYPES: [&str; 2] = ["income", "expense"];

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    List,
    Show {
        report: String,
    },
    Render {
        report: String,
    },
    /// An empty `input.main` selects the first permitted category.
    Add {
        report: String,
        transaction_type: TransactionType,
        input: EntryInput,
    },
    /// Several `(description, amount)` rows filed under one category.
    AddBatch {
        report: String,
        transaction_type: TransactionType,
        main: Option<String>,
        sub: Option<String>,
        rows: Vec<(String, String)>,
    },
    /// `row` is 1-based, as displayed by `show`.
    Edit {
        report: String,
        row: usize,
        patch: EntryPatch,
    },
    Remove {
        report: String,
        row: usize,
    },
    Search {
        report: String,
        query: String,
    },
    Categories {
        transaction_type: Option<TransactionType>,
    },
}

impl Command {
    /// What the command does, for error messages.
    pub fn action(&self) -> &'static str {
        match self {
            Command::List => "list reports",
            Command::Show { .. } => "show report",
            Command::Render { .. } => "render report",
            Command::Add { .. } => "add entry",
            Command::AddBatch { .. } => "add entries",
            Command::Edit { .. } => "edit entry",
            Command::Remove { .. } => "remove entry",
            Command::Search { .. } => "search report",
            Command::Categories { .. } => "list categories",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Args {
    pub config: PathBuf,
    pub dir: Option<PathBuf>,
    pub command: Command,
}

fn report_arg() -> Arg<'static, 'static> {
    Arg::with_name("report")
        .takes_value(true)
        .required(true)
        .index(1)
        .help("name of the report, without the .csv extension")
}

fn row_arg() -> Arg<'static, 'static> {
    Arg::with_name("row")
        .takes_value(true)
        .required(true)
        .index(2)
        .validator(|value| match value.parse::<usize>() {
            Ok(row) if row >= 1 => Ok(()),
            _ => Err(String::from("rows are numbered from 1")),
        })
        .help("row number as shown by `show`")
}

fn type_arg(required: bool) -> Arg<'static, 'static> {
    Arg::with_name("type")
        .long("type")
        .short("t")
        .takes_value(true)
        .required(required)
        .possible_values(&TRANSACTION_TYPES)
        .help("transaction type")
}

fn category_arg() -> Arg<'static, 'static> {
    Arg::with_name("category")
        .long("category")
        .short("c")
        .takes_value(true)
        .help("main category, new entries default to the first permitted one")
}

fn sub_arg() -> Arg<'static, 'static> {
    Arg::with_name("sub")
        .long("sub")
        .short("s")
        .takes_value(true)
        .help("optional sub-category")
}

/// Splits `description=amount` on the last `=`.
fn split_row(value: &str) -> Option<(String, String)> {
    value
        .rsplit_once('=')
        .map(|(description, amount)| (description.to_string(), amount.to_string()))
}

fn entry_args(required: bool) -> Vec<Arg<'static, 'static>> {
    vec![
        type_arg(required),
        category_arg(),
        sub_arg(),
        Arg::with_name("description")
            .long("description")
            .short("d")
            .takes_value(true)
            .required(required)
            .help("free-text description"),
        Arg::with_name("amount")
            .long("amount")
            .short("a")
            .takes_value(true)
            .required(required)
            .help("amount, e.g. 1500.50"),
    ]
}

fn app() -> App<'static, 'static> {
    App::new("ledger_report")
        .version("0.1.0")
        .about("record income and expense entries and render them as a PDF summary")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .global(true)
                .help("path of the JSON configuration file"),
        )
        .arg(
            Arg::with_name("dir")
                .long("dir")
                .takes_value(true)
                .global(true)
                .help("directory holding the reports, overrides the config file"),
        )
        .subcommand(SubCommand::with_name("list").about("list stored reports"))
        .subcommand(
            SubCommand::with_name("show")
                .about("print the entries and totals of a report")
                .arg(report_arg()),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("render a report to PDF")
                .arg(report_arg()),
        )
        .subcommand(
            SubCommand::with_name("add")
                .about("append an entry, creating the report if needed")
                .arg(report_arg())
                .args(&entry_args(true)),
        )
        .subcommand(
            SubCommand::with_name("add-batch")
                .about("append several entries under one category, skipping invalid rows")
                .arg(report_arg())
                .arg(type_arg(true))
                .arg(category_arg())
                .arg(sub_arg())
                .arg(
                    Arg::with_name("rows")
                        .long("row")
                        .short("r")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .required(true)
                        .validator(|value| match split_row(&value) {
                            Some(_) => Ok(()),
                            None => Err(String::from("rows are written as description=amount")),
                        })
                        .help("a description=amount row, may be repeated"),
                ),
        )
        .subcommand(
            SubCommand::with_name("edit")
                .about("replace fields of an entry")
                .arg(report_arg())
                .arg(row_arg())
                .args(&entry_args(false)),
        )
        .subcommand(
            SubCommand::with_name("remove")
                .about("delete an entry")
                .arg(report_arg())
                .arg(row_arg()),
        )
        .subcommand(
            SubCommand::with_name("search")
                .about("print the rows containing a text, ignoring case")
                .arg(report_arg())
                .arg(
                    Arg::with_name("query")
                        .takes_value(true)
                        .required(true)
                        .index(2)
                        .help("text to look for in any field"),
                ),
        )
        .subcommand(
            SubCommand::with_name("categories")
                .about("list the permitted main categories")
                .arg(type_arg(false)),
        )
}

fn value(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.value_of(name).map(str::to_string)
}

fn report(matches: &ArgMatches) -> String {
    matches.value_of("report").unwrap_or_default().to_string()
}

fn transaction_type(matches: &ArgMatches) -> Result<Option<TransactionType>, clap::Error> {
    if matches.is_present("type") {
        Ok(Some(value_t!(matches, "type", TransactionType)?))
    } else {
        Ok(None)
    }
}

impl Args {
    pub fn parse() -> Self {
        match Self::try_parse_from(std::env::args_os()) {
            Ok(args) => args,
            Err(err) => err.exit(),
        }
    }

    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from_safe(iter)?;

        let command = match matches.subcommand() {
            ("list", Some(_)) => Command::List,
            ("show", Some(m)) => Command::Show { report: report(m) },
            ("render", Some(m)) => Command::Render { report: report(m) },
            ("add", Some(m)) => Command::Add {
                report: report(m),
                transaction_type: value_t!(m, "type", TransactionType)?,
                input: EntryInput {
                    main: value(m, "category").unwrap_or_default(),
                    sub: value(m, "sub"),
                    description: value(m, "description").unwrap_or_default(),
                    amount: value(m, "amount").unwrap_or_default(),
                },
            },
            ("add-batch", Some(m)) => Command::AddBatch {
                report: report(m),
                transaction_type: value_t!(m, "type", TransactionType)?,
                main: value(m, "category"),
                sub: value(m, "sub"),
                rows: m
                    .values_of("rows")
                    .map(|rows| rows.filter_map(split_row).collect())
                    .unwrap_or_default(),
            },
            ("edit", Some(m)) => Command::Edit {
                report: report(m),
                row: value_t!(m, "row", usize)?,
                patch: EntryPatch {
                    transaction_type: transaction_type(m)?,
                    main: value(m, "category"),
                    sub: value(m, "sub"),
                    description: value(m, "description"),
                    amount: value(m, "amount"),
                },
            },
            ("remove", Some(m)) => Command::Remove {
                report: report(m),
                row: value_t!(m, "row", usize)?,
            },
            ("search", Some(m)) => Command::Search {
                report: report(m),
                query: value(m, "query").unwrap_or_default(),
            },
            ("categories", Some(m)) => Command::Categories {
                transaction_type: transaction_type(m)?,
            },
            (other, _) => {
                return Err(clap::Error::with_description(
                    &format!("unknown command: {}", other),
                    ErrorKind::UnrecognizedSubcommand,
                ))
            }
        };

        Ok(Self {
            config: matches
                .value_of("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            dir: matches.value_of("dir").map(PathBuf::from),
            command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("ledger_report").chain(args.iter().copied()))
    }

    #[test]
    fn should_parse_add_command() {
        let args = parse(&[
            "add", "june", "--type", "income", "-c", "Donations", "--sub", "Roof", "-d", "Fair",
            "-a", "1500",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(args.dir, None);
        assert_eq!(
            args.command,
            Command::Add {
                report: "june".to_string(),
                transaction_type: TransactionType::Income,
                input: EntryInput {
                    main: "Donations".to_string(),
                    sub: Some("Roof".to_string()),
                    description: "Fair".to_string(),
                    amount: "1500".to_string(),
                },
            }
        );
    }

    #[test]
    fn should_require_entry_fields_for_add() {
        assert!(parse(&["add", "june", "--type", "income"]).is_err());
        assert!(parse(&["add", "june", "-t", "transfer", "-c", "A", "-d", "B", "-a", "1"]).is_err());
    }

    #[test]
    fn should_default_add_category_to_empty() {
        let args = parse(&["add", "june", "-t", "expense", "-d", "Water", "-a", "300"]).unwrap();
        match args.command {
            Command::Add { input, .. } => assert_eq!(input.main, ""),
            other => panic!("expected add, got {:?}", other),
        }
    }

    #[test]
    fn should_parse_repeated_batch_rows() {
        let args = parse(&[
            "add-batch", "june", "-t", "expense", "-c", "Utilities", "--row", "Water=300",
            "-r", "a=b=590.25", "--row", "Power=",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::AddBatch {
                report: "june".to_string(),
                transaction_type: TransactionType::Expense,
                main: Some("Utilities".to_string()),
                sub: None,
                rows: vec![
                    ("Water".to_string(), "300".to_string()),
                    ("a=b".to_string(), "590.25".to_string()),
                    ("Power".to_string(), "".to_string()),
                ],
            }
        );
    }

    #[test]
    fn should_reject_malformed_batch_rows() {
        assert!(parse(&["add-batch", "june", "-t", "income"]).is_err());
        assert!(parse(&["add-batch", "june", "-t", "income", "--row", "Water"]).is_err());
    }

    #[test]
    fn should_parse_search() {
        assert_eq!(
            parse(&["search", "june", "water bill"]).unwrap().command,
            Command::Search {
                report: "june".to_string(),
                query: "water bill".to_string(),
            }
        );
        assert!(parse(&["search", "june"]).is_err());
    }

    #[test]
    fn should_parse_partial_edit() {
        let args = parse(&["edit", "june", "3", "--amount", "20"]).unwrap();
        assert_eq!(
            args.command,
            Command::Edit {
                report: "june".to_string(),
                row: 3,
                patch: EntryPatch {
                    amount: Some("20".to_string()),
                    ..EntryPatch::default()
                },
            }
        );
    }

    #[test]
    fn should_reject_row_zero() {
        assert!(parse(&["remove", "june", "0"]).is_err());
        assert!(parse(&["remove", "june", "x"]).is_err());
        assert_eq!(
            parse(&["remove", "june", "2"]).unwrap().command,
            Command::Remove {
                report: "june".to_string(),
                row: 2
            }
        );
    }

    #[test]
    fn should_accept_global_options() {
        let args = parse(&["--config", "cfg.json", "--dir", "/tmp/reports", "list"]).unwrap();
        assert_eq!(args.config, PathBuf::from("cfg.json"));
        assert_eq!(args.dir, Some(PathBuf::from("/tmp/reports")));
        assert_eq!(args.command, Command::List);
    }

    #[test]
    fn should_require_a_subcommand() {
        assert!(parse(&[]).is_err());
        assert_eq!(
            parse(&["categories", "-t", "expense"]).unwrap().command,
            Command::Categories {
                transaction_type: Some(TransactionType::Expense)
            }
        );
    }
}
