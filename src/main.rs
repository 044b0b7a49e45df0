use std::{io, path::PathBuf};

use anyhow::Context;
use bandkeep::{
    Action,
    rebalance::{BAND, Portfolio, RebalancePlan},
    scenario,
};
use clap::{CommandFactory, Parser};
use tabled::{Table, Tabled, settings::Style};

mod cli;

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "Cash")]
    cash: String,
    #[tabled(rename = "Shares")]
    shares: u64,
    #[tabled(rename = "Stock value")]
    stock_value: String,
    #[tabled(rename = "Ratio")]
    ratio: String,
}

impl StateRow {
    fn new(portfolio: &Portfolio) -> Self {
        Self {
            cash: format!("${:.2}", portfolio.cash),
            shares: portfolio.shares,
            stock_value: format!("${:.2}", portfolio.stock_value()),
            ratio: format!("{:.1}x", portfolio.ratio()),
        }
    }
}

#[derive(Tabled)]
struct BatchRow {
    #[tabled(rename = "Cash")]
    cash: String,
    #[tabled(rename = "Shares")]
    shares: u64,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Action")]
    action: &'static str,
    #[tabled(rename = "Qty")]
    quantity: u64,
    #[tabled(rename = "Trade value")]
    trade_value: String,
    #[tabled(rename = "Ratio after")]
    resulting_ratio: String,
}

impl BatchRow {
    fn new(portfolio: &Portfolio, plan: &RebalancePlan) -> Self {
        let action = match plan.action {
            Action::Hold => "hold",
            Action::Sell(_) => "sell",
            Action::Buy(_) => "buy",
        };
        Self {
            cash: format!("${:.2}", portfolio.cash),
            shares: portfolio.shares,
            price: format!("${:.2}", portfolio.price),
            action,
            quantity: plan.quantity(),
            trade_value: format!("${:.2}", plan.trade_value),
            resulting_ratio: format!("{:.1}x", plan.resulting_ratio),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opts = cli::Cli::parse();

    if let Some(shell) = opts.completions {
        let mut cmd = cli::Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    if let Some(path) = &opts.batch {
        return run_batch(path);
    }

    let (Some(cash), Some(shares), Some(price)) = (opts.cash, opts.shares, opts.price) else {
        anyhow::bail!("Provide CASH, SHARES and PRICE, or use --batch");
    };
    anyhow::ensure!(cash > 0.0, "cash must be greater than zero");
    anyhow::ensure!(shares >= 1, "at least one share must be held");
    anyhow::ensure!(price > 0.0, "price must be greater than zero");

    let portfolio = Portfolio::new(cash, shares, price);
    let plan = portfolio.plan()?;
    render(&portfolio, &plan);
    Ok(())
}

fn run_batch(path: &PathBuf) -> anyhow::Result<()> {
    let scenarios = scenario::load_from_file(path)?;
    let mut rows = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let portfolio = Portfolio::from(scenario);
        let plan = portfolio
            .plan()
            .with_context(|| format!("Bad scenario {scenario:?}"))?;
        rows.push(BatchRow::new(&portfolio, &plan));
    }
    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(())
}

fn render(portfolio: &Portfolio, plan: &RebalancePlan) {
    println!("Current portfolio");
    println!("{}", Table::new([StateRow::new(portfolio)]).with(Style::sharp()));
    println!();

    match plan.action {
        Action::Hold => println!(
            "No rebalancing needed: the ratio is inside the {:.0}-{:.0}x band.",
            BAND.lower, BAND.upper
        ),
        Action::Sell(q) => println!("Rebalance: sell {q} shares (${:.2})", plan.trade_value),
        Action::Buy(q) => println!("Rebalance: buy {q} shares (${:.2})", plan.trade_value),
    }
    if plan.action != Action::Hold {
        println!();
        println!("Projected state after the trade");
        println!(
            "{}",
            Table::new([StateRow::new(&plan.after)]).with(Style::sharp())
        );
    }
    println!();

    println!("Next rebalancing triggers");
    if let (Some(upper), Some(lower)) = (plan.upper_trigger, plan.lower_trigger) {
        println!(
            " - at ${upper:.2} the ratio reaches {:.0}x (sell side)",
            BAND.upper
        );
        println!(
            " - at ${lower:.2} the ratio reaches {:.0}x (buy side)",
            BAND.lower
        );
    }
}
