//! Option discovery
//!
//! Finds options recorded in the bar store that belong to a set of
//! underlying futures: the symbol prefix matches the future (or its mapped
//! option product), the remainder carries a `C`/`P` marker, the data is
//! one-minute bars and the exchange matches. A failing store yields an
//! empty result, never an error.

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Index futures whose options trade under a different product code.
pub const FUTURE_OPTION_MAP: &[(&str, &str)] = &[("IF", "IO"), ("IM", "MO"), ("IH", "HO")];

/// Bar aggregation interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    /// One-minute bars
    #[serde(rename = "1m")]
    Minute,
    /// One-hour bars
    #[serde(rename = "1h")]
    Hour,
    /// Daily bars
    #[serde(rename = "d")]
    Daily,
}

/// One recorded series in the bar store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarOverview {
    /// Exchange symbol
    pub symbol: String,
    /// Exchange code
    pub exchange: String,
    /// Recorded interval
    pub interval: Interval,
}

/// The data-store seam the discovery service reads through.
pub trait BarStore {
    /// Overview of every recorded series.
    fn get_bar_overview(&self) -> anyhow::Result<Vec<BarOverview>>;
}

/// Finds option contracts recorded for a set of underlying futures.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionDiscoveryService;

impl OptionDiscoveryService {
    /// vt_symbols of options with one-minute data under the given
    /// underlyings. Store failures are logged and reported as empty.
    #[must_use]
    pub fn discover(store: &dyn BarStore, underlying_vt_symbols: &[String]) -> Vec<String> {
        if underlying_vt_symbols.is_empty() {
            return Vec::new();
        }

        let target_map = Self::build_target_map(underlying_vt_symbols);
        if target_map.is_empty() {
            return Vec::new();
        }

        let overviews = match store.get_bar_overview() {
            Ok(overviews) => overviews,
            Err(e) => {
                error!(error = %e, "bar store query failed");
                return Vec::new();
            }
        };

        let option_vt_symbols = Self::match_options(&overviews, &target_map);
        info!(count = option_vt_symbols.len(), "options discovered");
        option_vt_symbols
    }

    /// `{future_symbol: (exchange, [prefix, ...])}`. Every future matches
    /// its own symbol as a prefix (commodity options); index futures add
    /// the mapped option-product prefix.
    fn build_target_map(
        underlying_vt_symbols: &[String],
    ) -> FxHashMap<String, (String, Vec<String>)> {
        let re = Regex::new(r"^([a-zA-Z]+)(\d+)").expect("static pattern");
        let mut target_map = FxHashMap::default();

        for vt_symbol in underlying_vt_symbols {
            let Some((symbol, exchange)) = vt_symbol.split_once('.') else {
                continue;
            };

            let mut prefixes = vec![symbol.to_string()];
            if let Some(captures) = re.captures(symbol) {
                let product_code = captures[1].to_uppercase();
                let contract_suffix = &captures[2];
                if let Some((_, option_product)) = FUTURE_OPTION_MAP
                    .iter()
                    .find(|(future, _)| *future == product_code)
                {
                    prefixes.push(format!("{option_product}{contract_suffix}"));
                }
            }
            target_map.insert(symbol.to_string(), (exchange.to_string(), prefixes));
        }
        target_map
    }

    /// Keep one-minute series whose symbol extends a known prefix with a
    /// remainder containing `C` or `P` (the bare future itself never
    /// matches) on the same exchange.
    fn match_options(
        overviews: &[BarOverview],
        target_map: &FxHashMap<String, (String, Vec<String>)>,
    ) -> Vec<String> {
        let mut option_vt_symbols = Vec::new();

        for overview in overviews {
            if overview.interval != Interval::Minute {
                continue;
            }

            for (future_exchange, prefixes) in target_map.values() {
                if &overview.exchange != future_exchange {
                    continue;
                }

                let matched = prefixes.iter().find(|prefix| {
                    overview.symbol.starts_with(prefix.as_str())
                        && overview.symbol.len() > prefix.len()
                });
                let Some(prefix) = matched else {
                    continue;
                };

                let suffix = &overview.symbol[prefix.len()..];
                if suffix.contains('C') || suffix.contains('P') {
                    option_vt_symbols.push(format!("{}.{}", overview.symbol, overview.exchange));
                    break;
                }
            }
        }
        option_vt_symbols
    }
}
