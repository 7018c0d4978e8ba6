//! CLI command handlers, one file per command.

mod classify;
mod reconcile;
mod resolve;
mod simulate;

pub use classify::run_classify;
pub use reconcile::run_reconcile;
pub use resolve::run_resolve;
pub use simulate::run_simulate;
