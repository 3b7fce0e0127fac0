//! Order Settlement CLI
//!
//! Evaluates a sheet of order drafts and prints one settlement row per
//! order, or adjusts the persisted exchange rates.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- orders.csv [--rates rates.csv] > settlements.csv
//! cargo run -- set-rate usd 12900 [--rates rates.csv]
//! cargo run -- rates [--rates rates.csv]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use order_settlement::{
    Currency, ExchangeRateProvider, RateStore, Result, SettlementEngine, SettlementError,
};
use rust_decimal::Decimal;
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;
use std::str::FromStr;

const DEFAULT_RATES_PATH: &str = "rates.csv";

enum Command {
    Settle { input: String },
    SetRate { currency: Currency, rate: Decimal },
    ShowRates,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let (command, rates_path) = parse_args(env::args().skip(1).collect())?;
    let store = RateStore::new(rates_path);

    match command {
        Command::Settle { input } => {
            let file = File::open(&input)?;
            let reader = BufReader::new(file);

            let mut engine = SettlementEngine::new(store.current_rates()?);
            engine.process_csv(reader)?;

            let stdout = io::stdout();
            let handle = stdout.lock();
            engine.write_output(handle)?;
        }
        Command::SetRate { currency, rate } => {
            let rates = store.set_rate(currency, rate)?;
            println!("{}={}", currency, rates.rate(currency));
        }
        Command::ShowRates => {
            let rates = store.current_rates()?;
            let mut out = io::stdout().lock();
            writeln!(out, "usd={}", rates.usd)?;
            writeln!(out, "eur={}", rates.eur)?;
        }
    }

    Ok(())
}

/// Splits off `--rates <path>` and interprets the remaining positionals.
fn parse_args(args: Vec<String>) -> Result<(Command, String)> {
    let mut rates_path = DEFAULT_RATES_PATH.to_string();
    let mut positional = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--rates" {
            rates_path = iter
                .next()
                .ok_or_else(|| SettlementError::InvalidArgument("--rates needs a path".into()))?;
        } else {
            positional.push(arg);
        }
    }

    let command = match positional.first().map(String::as_str) {
        None => return Err(SettlementError::MissingArgument),
        Some("set-rate") => {
            let [_, currency, rate] = positional.as_slice() else {
                return Err(SettlementError::InvalidArgument(
                    "usage: set-rate <usd|eur> <rate>".into(),
                ));
            };
            let rate = Decimal::from_str(rate.trim())
                .map_err(|e| SettlementError::InvalidArgument(format!("rate '{}': {}", rate, e)))?;
            Command::SetRate {
                currency: Currency::from_str(currency)?,
                rate,
            }
        }
        Some("rates") => Command::ShowRates,
        Some(input) => Command::Settle {
            input: input.to_string(),
        },
    };

    Ok((command, rates_path))
}
