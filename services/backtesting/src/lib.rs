//! Backtest support services
//!
//! - Static product-to-exchange resolution and vt_symbol generation
//! - Contract factory and registry (the dependency the backtest engine
//!   holds instead of monkey-patched lookups)
//! - Option discovery against a bar store collaborator

pub mod contracts;
pub mod discovery;
pub mod exchange;
pub mod symbols;

pub use contracts::{ContractFactory, ContractProvider, ContractRegistry};
pub use discovery::{BarOverview, BarStore, Interval, OptionDiscoveryService};
pub use exchange::ExchangeResolver;
pub use symbols::VtSymbolGenerator;
