pub mod rebalance;
pub mod scenario;

pub type Dollar = f64;
pub type Ratio = f64;

/// Recommended trade. The payload is the whole-share quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Hold,
    Sell(u64),
    Buy(u64),
}

impl Action {
    pub fn quantity(&self) -> u64 {
        match self {
            Action::Hold => 0,
            Action::Sell(q) | Action::Buy(q) => *q,
        }
    }
}
