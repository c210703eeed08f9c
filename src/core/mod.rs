//! Core business logic module
//!
//! - `traits` - The `DataStore` seam every store implements
//! - `change` - Greedy change planning over the coin inventory
//! - `machine` - Deposits, refunds and the purchase state machine
//! - `dispatch` - Command execution shared by the CLI and script replay

pub mod change;
pub mod dispatch;
pub mod machine;
pub mod traits;

pub use change::{plan_change, ChangePlan, CoinDraw};
pub use machine::SodaMachine;
pub use traits::DataStore;
