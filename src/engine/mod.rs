mod fees;
mod settlement;

pub use fees::FeeGenerator;
pub use settlement::SettlementEngine;
