use std::path::PathBuf;

use bandkeep::Dollar;
use clap::Parser;
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    about = "Keep the stock-value-to-cash ratio of a two-asset holding inside its target band"
)]
pub(crate) struct Cli {
    #[arg(help = "Cash balance in dollars")]
    pub cash: Option<Dollar>,
    #[arg(help = "Number of shares held")]
    pub shares: Option<u64>,
    #[arg(help = "Current share price in dollars")]
    pub price: Option<Dollar>,
    #[arg(
        short,
        long,
        conflicts_with_all = ["cash", "shares", "price"],
        help = "Evaluate scenarios from a CSV file with cash,shares,price columns"
    )]
    pub batch: Option<PathBuf>,
    #[arg(long, value_enum, help = "Print shell completions and exit")]
    pub completions: Option<Shell>,
}
