//! vt_symbol generation
//!
//! Produces near-term contract identifiers `"{code}{YYMM}.{exchange}"` for
//! a product. The reference date is injected so backtests replay
//! deterministically.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::exchange::ExchangeResolver;

/// Generates standard vt_symbols for a product's near-term contracts.
#[derive(Debug, Clone, Copy, Default)]
pub struct VtSymbolGenerator;

impl VtSymbolGenerator {
    /// Contract months covered by default.
    pub const DEFAULT_MONTHS: u32 = 3;

    /// vt_symbols of the next `months` contract months starting at
    /// `today`'s month. Unknown products yield an empty list.
    #[must_use]
    pub fn generate_recent_symbols(product_code: &str, today: NaiveDate, months: u32) -> Vec<String> {
        let Some(exchange) = ExchangeResolver::resolve(product_code) else {
            warn!(product_code, "unknown product, no symbols generated");
            return Vec::new();
        };

        (0..months)
            .map(|offset| {
                let month0 = today.month0() + offset;
                let year = today.year() + (month0 / 12) as i32;
                let month = month0 % 12 + 1;
                format!(
                    "{product_code}{:02}{month:02}.{exchange}",
                    year.rem_euclid(100)
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_roll_across_year_end() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        let symbols = VtSymbolGenerator::generate_recent_symbols("rb", today, 3);
        assert_eq!(
            symbols,
            vec!["rb2511.SHFE", "rb2512.SHFE", "rb2601.SHFE"]
        );
    }

    #[test]
    fn unknown_product_yields_nothing() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(VtSymbolGenerator::generate_recent_symbols("zz", today, 3).is_empty());
    }

    #[test]
    fn index_future_resolves_to_cffex() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let symbols = VtSymbolGenerator::generate_recent_symbols("IF", today, 2);
        assert_eq!(symbols, vec!["IF2506.CFFEX", "IF2507.CFFEX"]);
    }
}
