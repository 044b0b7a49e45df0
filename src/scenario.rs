use std::{io::Read, path::PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{Dollar, rebalance::Portfolio};

/// One row of a batch file: the three inputs the planner needs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Scenario {
    pub cash: Dollar,
    pub shares: u64,
    pub price: Dollar,
}

impl From<Scenario> for Portfolio {
    fn from(s: Scenario) -> Self {
        Portfolio::new(s.cash, s.shares, s.price)
    }
}

pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Vec<Scenario>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Failed to open file {path:?}"))?;
    parse_scenarios(file)
}

pub fn parse_scenarios<R: Read>(input: R) -> anyhow::Result<Vec<Scenario>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers = csv_reader.headers()?;
    if headers.get(0) != Some("cash")
        || headers.get(1) != Some("shares")
        || headers.get(2) != Some("price")
    {
        warn!(?headers, "Unexpected headers");
        bail!("Unexpected csv file format: expected cash,shares,price");
    }
    let mut scenarios = Vec::new();
    for row in csv_reader.deserialize() {
        let scenario: Scenario = row.context("Failed to parse scenario row")?;
        debug!(?scenario, "parsed row");
        scenarios.push(scenario);
    }
    Ok(scenarios)
}
