//! Exchange resolution tests

use backtesting::exchange::EXCHANGE_MAP;
use backtesting::ExchangeResolver;
use proptest::prelude::*;
use rstest::*;

#[rstest]
fn known_products_resolve() {
    assert_eq!(ExchangeResolver::resolve("IF"), Some("CFFEX"));
    assert_eq!(ExchangeResolver::resolve("rb"), Some("SHFE"));
    assert_eq!(ExchangeResolver::resolve("m"), Some("DCE"));
    assert_eq!(ExchangeResolver::resolve("MA"), Some("CZCE"));
    assert_eq!(ExchangeResolver::resolve("sc"), Some("INE"));
}

#[rstest]
fn unknown_and_miscased_products_miss() {
    assert_eq!(ExchangeResolver::resolve("zz"), None);
    // Resolution is case-sensitive: "RB" is not a SHFE product code.
    assert_eq!(ExchangeResolver::resolve("RB"), None);
}

proptest! {
    /// Resolution agrees with the static table for every listed product.
    #[test]
    fn resolver_matches_table(index in 0usize..EXCHANGE_MAP.len()) {
        let (code, exchange) = EXCHANGE_MAP[index];
        prop_assert_eq!(ExchangeResolver::resolve(code), Some(exchange));
    }
}
