use thiserror::Error;
use tracing::debug;

use crate::{Action, Dollar, Ratio};

/// Target range for the stock-value-to-cash ratio. These are policy
/// constants, not user inputs.
#[derive(Debug, Clone, Copy)]
pub struct RatioBand {
    pub lower: Ratio,
    pub upper: Ratio,
    /// Soft ceiling that ends the buy scan early.
    pub buy_stop: Ratio,
}

pub const BAND: RatioBand = RatioBand {
    lower: 8.0,
    upper: 9.0,
    buy_stop: 8.5,
};

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum InvalidInput {
    #[error("cash must be greater than zero (got {0})")]
    Cash(Dollar),
    #[error("price must be greater than zero (got {0})")]
    Price(Dollar),
}

/// A two-asset holding: a cash balance and a whole-share position in a
/// single security, marked at `price`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portfolio {
    pub cash: Dollar,
    pub shares: u64,
    pub price: Dollar,
}

/// The structured recommendation produced by one call to [`Portfolio::plan`].
#[derive(Debug, Clone, PartialEq)]
pub struct RebalancePlan {
    pub action: Action,
    pub trade_value: Dollar,
    pub after: Portfolio,
    pub resulting_ratio: Ratio,
    /// Price at which, holding cash and shares fixed, the ratio reaches the
    /// upper band boundary. `None` when no shares are held.
    pub upper_trigger: Option<Dollar>,
    /// Same, for the lower boundary.
    pub lower_trigger: Option<Dollar>,
}

impl RebalancePlan {
    pub fn quantity(&self) -> u64 {
        self.action.quantity()
    }
}

impl Portfolio {
    pub fn new(cash: Dollar, shares: u64, price: Dollar) -> Self {
        Self {
            cash,
            shares,
            price,
        }
    }

    pub fn stock_value(&self) -> Dollar {
        self.shares as Dollar * self.price
    }

    pub fn ratio(&self) -> Ratio {
        self.stock_value() / self.cash
    }

    fn validate(&self) -> Result<(), InvalidInput> {
        // NaN fails both comparisons and is rejected here too.
        if !(self.cash > 0.0) {
            return Err(InvalidInput::Cash(self.cash));
        }
        if !(self.price > 0.0) {
            return Err(InvalidInput::Price(self.price));
        }
        Ok(())
    }

    /// Decide whether to sell, buy, or hold so the ratio lands back inside
    /// the band, and at what price the next trigger would fire.
    pub fn plan(&self) -> Result<RebalancePlan, InvalidInput> {
        self.validate()?;
        let ratio = self.ratio();
        debug!(ratio, "evaluating portfolio");

        let (action, after) = if ratio > BAND.upper {
            let q = self.sell_quantity();
            let after = Self {
                cash: self.cash + q as Dollar * self.price,
                shares: self.shares - q,
                price: self.price,
            };
            (Action::Sell(q), after)
        } else if ratio < BAND.lower {
            let q = self.buy_quantity();
            let after = Self {
                cash: self.cash - q as Dollar * self.price,
                shares: self.shares + q,
                price: self.price,
            };
            (Action::Buy(q), after)
        } else {
            (Action::Hold, *self)
        };

        // Triggers use the pre-trade balances. Undefined with no shares held.
        let (upper_trigger, lower_trigger) = if self.shares == 0 {
            (None, None)
        } else {
            let shares = self.shares as Dollar;
            (
                Some(BAND.upper * self.cash / shares),
                Some(BAND.lower * self.cash / shares),
            )
        };

        Ok(RebalancePlan {
            action,
            trade_value: action.quantity() as Dollar * self.price,
            resulting_ratio: after.ratio(),
            after,
            upper_trigger,
            lower_trigger,
        })
    }

    /// Smallest whole-share sale that brings the ratio down to the upper
    /// boundary. Each unit sold strictly decreases the ratio, so the scan
    /// stops at the first quantity that works. Capped at the share count:
    /// if even selling out cannot reach the boundary, the cap is the
    /// best-effort answer.
    fn sell_quantity(&self) -> u64 {
        let mut q = 0;
        while q < self.shares {
            let trial = Self {
                cash: self.cash + q as Dollar * self.price,
                shares: self.shares - q,
                price: self.price,
            };
            if trial.ratio() <= BAND.upper {
                break;
            }
            q += 1;
        }
        debug!(q, "sell scan finished");
        q
    }

    /// Best-candidate scan over affordable buy quantities. Keeps the
    /// candidate whose ratio sits closest above the lower boundary, stops
    /// once a trial ratio passes `buy_stop`, and runs out when one more
    /// share can no longer be paid for. Quantity zero is the baseline
    /// candidate, so the scan can come back empty-handed and still report
    /// a buy of nothing.
    ///
    /// Deliberately asymmetric with [`Self::sell_quantity`]: the early exit
    /// means this is a heuristic, not an optimum. Observable behavior,
    /// kept as is.
    fn buy_quantity(&self) -> u64 {
        let mut q = 0u64;
        let mut best_q = 0u64;
        let mut best_ratio = self.ratio();
        loop {
            let trial_cash = self.cash - q as Dollar * self.price;
            if trial_cash < self.price {
                break;
            }
            let trial_ratio = ((self.shares + q) as Dollar * self.price) / trial_cash;
            if q == 0 {
                best_ratio = trial_ratio;
            } else if trial_ratio >= BAND.lower
                && (trial_ratio - BAND.lower).abs() < (best_ratio - BAND.lower).abs()
            {
                best_ratio = trial_ratio;
                best_q = q;
            }
            if trial_ratio > BAND.buy_stop {
                break;
            }
            q += 1;
        }
        debug!(best_q, best_ratio, "buy scan finished");
        best_q
    }
}
