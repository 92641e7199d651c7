pub mod reports;
pub mod simulation;
pub mod tester;

pub use simulation::{CurrencyOp, SimulationPlan, SimulationSummary};
pub use tester::*;
