pub mod timeseries;
pub mod ledger;
pub mod session;
pub mod orchestrator;
