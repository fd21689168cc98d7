//! Contract factory and registry tests

use backtesting::{ContractFactory, ContractProvider, ContractRegistry};
use proptest::prelude::*;
use rstest::*;
use services_common::types::contract::{ContractOptionType, Product};

#[rstest]
fn factory_parses_futures() {
    let contract = ContractFactory::create("rb2510.SHFE").unwrap();
    assert_eq!(contract.symbol, "rb2510");
    assert_eq!(contract.exchange, "SHFE");
    assert_eq!(contract.product, Product::Futures);
    assert_eq!(contract.vt_symbol(), "rb2510.SHFE");
    assert!(contract.option_strike.is_none());
}

#[rstest]
#[case("IO2506-C-4000.CFFEX", ContractOptionType::Call, 4000.0, "IO2506.CFFEX")]
#[case("m2509-P-2800.DCE", ContractOptionType::Put, 2800.0, "m2509.DCE")]
#[case("MA509C2350.CZCE", ContractOptionType::Call, 2350.0, "MA509.CZCE")]
fn factory_parses_options(
    #[case] vt_symbol: &str,
    #[case] kind: ContractOptionType,
    #[case] strike: f64,
    #[case] underlying: &str,
) {
    let contract = ContractFactory::create(vt_symbol).unwrap();
    assert_eq!(contract.product, Product::Option);
    assert_eq!(contract.option_type, Some(kind));
    assert_eq!(contract.option_strike, Some(strike));
    assert_eq!(contract.option_underlying.as_deref(), Some(underlying));
}

#[rstest]
#[case("")]
#[case("rb2510")]
#[case(".SHFE")]
#[case("rb-2510.SHFE")]
fn factory_rejects_malformed_symbols(#[case] vt_symbol: &str) {
    assert!(ContractFactory::create(vt_symbol).is_none());
}

#[rstest]
fn register_and_get() {
    let mut registry = ContractRegistry::new();
    let contract = ContractFactory::create("rb2510.SHFE").unwrap();
    registry.register(contract.clone());

    assert_eq!(registry.get("rb2510.SHFE"), Some(&contract));
    assert!(registry.get("cu2510.SHFE").is_none());
}

#[rstest]
fn duplicate_registration_last_write_wins() {
    let mut registry = ContractRegistry::new();
    let mut first = ContractFactory::create("rb2510.SHFE").unwrap();
    first.size = 10.0;
    let mut second = first.clone();
    second.size = 5.0;

    registry.register(first);
    registry.register(second.clone());

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("rb2510.SHFE"), Some(&second));
}

#[rstest]
fn register_many_skips_unparseable() {
    let mut registry = ContractRegistry::new();
    let symbols = vec![
        "rb2510.SHFE".to_string(),
        "not a symbol".to_string(),
        "IO2506-C-4000.CFFEX".to_string(),
    ];
    let count = registry.register_many(&symbols);
    assert_eq!(count, 2);
    assert_eq!(registry.len(), 2);
}

#[rstest]
fn provider_interface_matches_registry() {
    let mut registry = ContractRegistry::new();
    registry.register_many(&["rb2510.SHFE".to_string(), "cu2511.SHFE".to_string()]);

    let provider: &dyn ContractProvider = &registry;
    assert!(provider.get_contract("rb2510.SHFE").is_some());
    assert!(provider.get_contract("zz9999.SHFE").is_none());
    assert_eq!(provider.get_all_contracts().len(), 2);
}

proptest! {
    /// N unique registrations give N entries, each retrievable; unseen
    /// symbols miss.
    #[test]
    fn registry_round_trip(codes in prop::collection::hash_set("[a-z]{2}2[0-9]{3}", 1..20)) {
        let mut registry = ContractRegistry::new();
        let vt_symbols: Vec<String> =
            codes.iter().map(|c| format!("{c}.SHFE")).collect();

        for vt_symbol in &vt_symbols {
            registry.register(ContractFactory::create(vt_symbol).unwrap());
        }

        prop_assert_eq!(registry.len(), vt_symbols.len());
        prop_assert_eq!(registry.get_all().len(), vt_symbols.len());
        for vt_symbol in &vt_symbols {
            prop_assert!(registry.get(vt_symbol).is_some());
        }
        prop_assert!(registry.get("unseen9999.SHFE").is_none());
    }
}
