use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Arg, Command};
use forecourt::export::{self, Csv, Html, Text};
use forecourt::{FuelCatalog, Ledger};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[async_std::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("Forecourt")
        .version("0.1.0")
        .about("Fuel station daily ledger")
        .arg(
            Arg::new("records")
                .short('r')
                .long("records")
                .help("Sets directory or file of records or '-' for stdin")
                .value_name("DIR")
                .default_value("./")
                .takes_value(true),
        )
        .arg(
            Arg::new("catalog")
                .short('c')
                .long("catalog")
                .help("Fuel price catalog file")
                .value_name("FILE")
                .takes_value(true),
        )
        .arg(
            Arg::new("date")
                .short('d')
                .long("date")
                .help("Ledger date, defaults to today")
                .value_name("DATE")
                .takes_value(true),
        )
        .subcommand(Command::new("summary").about("Shows the daily summary"))
        .subcommand(
            Command::new("export")
                .about("Writes the daily report in the given format")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .help("Output format")
                        .value_name("FORMAT")
                        .value_parser(["text", "csv", "html"])
                        .default_value("text")
                        .takes_value(true),
                ),
        )
        .subcommand(Command::new("records").about("Lists the day's records"))
        .subcommand(Command::new("prices").about("Shows the fuel price catalog"))
        .subcommand(
            Command::new("adjust")
                .about("Applies a percentage change to every fuel price")
                .arg(
                    Arg::new("percent")
                        .short('p')
                        .long("percent")
                        .help("Signed percentage, e.g. 5 or -2.5")
                        .value_name("PERCENT")
                        .allow_hyphen_values(true)
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::new("write")
                        .short('w')
                        .long("write")
                        .help("Writes the adjusted catalog back to a file")
                        .value_name("FILE")
                        .takes_value(true),
                ),
        )
        .get_matches();

    let records = match matches.get_one::<String>("records").map(String::as_str) {
        Some("-") => None,
        other => other,
    };
    let catalog_file = matches.get_one::<String>("catalog").map(String::as_str);
    let date: NaiveDate = match matches.get_one::<String>("date") {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid date {:?}", arg))?,
        None => Local::now().date_naive(),
    };

    if let Some(adjust) = matches.subcommand_matches("adjust") {
        let percent_arg = adjust
            .get_one::<String>("percent")
            .context("percent is required")?;
        let percent: Decimal = percent_arg
            .parse()
            .with_context(|| format!("invalid percentage {:?}", percent_arg))?;
        let mut catalog = match catalog_file {
            Some(path) => FuelCatalog::from_file(path).await?,
            None => FuelCatalog::defaults(),
        };
        let clamped = catalog.apply_bulk_percentage(percent);
        if !clamped.is_empty() {
            eprintln!("Clamped to the minimum price: {}", clamped.join(", "));
        }
        println!("{catalog}");
        if let Some(path) = adjust.get_one::<String>("write") {
            async_std::fs::write(path, catalog.to_yaml()?)
                .await
                .with_context(|| format!("cannot write catalog to {:?}", path))?;
        }
    } else if matches.subcommand_matches("prices").is_some() {
        let catalog = match catalog_file {
            Some(path) => FuelCatalog::from_file(path).await?,
            None => FuelCatalog::defaults(),
        };
        println!("{catalog}");
    } else {
        let ledger = Ledger::load(records, catalog_file).await?;
        if let Some(export_matches) = matches.subcommand_matches("export") {
            let report = ledger.report(date);
            let page = match export_matches
                .get_one::<String>("format")
                .map(String::as_str)
            {
                Some("csv") => export::render::<Csv>(&report)?,
                Some("html") => export::render::<Html>(&report)?,
                _ => export::render::<Text>(&report)?,
            };
            print!("{page}");
        } else if matches.subcommand_matches("records").is_some() {
            let day = ledger.day(date);
            for sale in &day.sales {
                println!("{sale}");
            }
            for credit in &day.credits {
                println!("{credit}");
            }
            for income in &day.incomes {
                println!("{income}");
            }
            for expense in &day.expenses {
                println!("{expense}");
            }
        } else {
            // summary is also the default when no subcommand is given
            let report = ledger.report(date);
            print!("{}", export::render::<Text>(&report)?);
        }
    }
    Ok(())
}
