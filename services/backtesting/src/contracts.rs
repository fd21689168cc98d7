//! Contract factory and registry
//!
//! The registry is the lookup interface the backtest engine holds as a
//! dependency (`ContractProvider`), replacing attribute injection of
//! `get_contract` / `get_all_contracts` functions.

use regex::Regex;
use rustc_hash::FxHashMap;
use services_common::types::contract::{ContractData, ContractOptionType, Product};
use tracing::{info, warn};

/// Builds contract descriptors from vt_symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractFactory;

impl ContractFactory {
    /// Parse a vt_symbol into a contract descriptor.
    ///
    /// Option symbols carry a `C`/`P` marker between the underlying part
    /// and the strike (`IO2506-C-4000`, `m2509-C-2800`, `MA509C2350`);
    /// anything else that looks like `{letters}{digits}` is a future.
    #[must_use]
    pub fn create(vt_symbol: &str) -> Option<ContractData> {
        let (symbol, exchange) = vt_symbol.split_once('.')?;
        if symbol.is_empty() || exchange.is_empty() {
            return None;
        }

        let option_re = Regex::new(r"^([A-Za-z]+\d+)-?([CP])-?(\d+(?:\.\d+)?)$").ok()?;
        if let Some(captures) = option_re.captures(symbol) {
            let underlying = captures.get(1)?.as_str();
            let kind = match captures.get(2)?.as_str() {
                "C" => ContractOptionType::Call,
                _ => ContractOptionType::Put,
            };
            let strike: f64 = captures.get(3)?.as_str().parse().ok()?;
            let expiry = underlying
                .chars()
                .skip_while(|c| c.is_ascii_alphabetic())
                .collect::<String>();

            return Some(ContractData {
                symbol: symbol.to_string(),
                exchange: exchange.to_string(),
                name: symbol.to_string(),
                product: Product::Option,
                size: 10.0,
                pricetick: 0.5,
                min_volume: 1,
                option_strike: Some(strike),
                option_underlying: Some(format!("{underlying}.{exchange}")),
                option_type: Some(kind),
                option_expiry: Some(expiry),
                gateway_name: "BACKTESTING".to_string(),
            });
        }

        let future_re = Regex::new(r"^[A-Za-z]+\d+$").ok()?;
        if future_re.is_match(symbol) {
            return Some(ContractData {
                symbol: symbol.to_string(),
                exchange: exchange.to_string(),
                name: symbol.to_string(),
                product: Product::Futures,
                size: 10.0,
                pricetick: 1.0,
                min_volume: 1,
                option_strike: None,
                option_underlying: None,
                option_type: None,
                option_expiry: None,
                gateway_name: "BACKTESTING".to_string(),
            });
        }
        None
    }
}

/// Lookup interface the backtest engine depends on.
pub trait ContractProvider {
    /// Contract by vt_symbol.
    fn get_contract(&self, vt_symbol: &str) -> Option<&ContractData>;
    /// All registered contracts.
    fn get_all_contracts(&self) -> Vec<&ContractData>;
}

/// vt_symbol-keyed contract store. Last write wins on duplicates.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    contracts: FxHashMap<String, ContractData>,
}

impl ContractRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contract under its vt_symbol.
    pub fn register(&mut self, contract: ContractData) {
        self.contracts.insert(contract.vt_symbol(), contract);
    }

    /// Contract by vt_symbol.
    #[must_use]
    pub fn get(&self, vt_symbol: &str) -> Option<&ContractData> {
        self.contracts.get(vt_symbol)
    }

    /// All registered contracts.
    #[must_use]
    pub fn get_all(&self) -> Vec<&ContractData> {
        self.contracts.values().collect()
    }

    /// Number of registered contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Build and register contracts for a batch of vt_symbols; symbols the
    /// factory cannot parse are skipped. Returns how many registered.
    pub fn register_many(&mut self, vt_symbols: &[String]) -> usize {
        let mut count = 0;
        for vt_symbol in vt_symbols {
            match ContractFactory::create(vt_symbol) {
                Some(contract) => {
                    self.register(contract);
                    count += 1;
                }
                None => warn!(vt_symbol = %vt_symbol, "cannot build contract, skipped"),
            }
        }
        info!(count, "contracts registered");
        count
    }
}

impl ContractProvider for ContractRegistry {
    fn get_contract(&self, vt_symbol: &str) -> Option<&ContractData> {
        self.get(vt_symbol)
    }

    fn get_all_contracts(&self) -> Vec<&ContractData> {
        self.get_all()
    }
}
