//! Option selector
//!
//! Filters a candidate chain down to tradable OTM contracts, scores the
//! survivors, and offers the open-time liquidity gate plus delta- and
//! spread-based picks.

use options_engine::OptionKind;

use crate::chain::OptionChain;
use crate::config::OptionSelectorConfig;
use crate::scoring::{expiry_score, liquidity_score, otm_score, total_score, SelectionScore};

/// Candidate filtering, scoring and selection over one option chain.
#[derive(Debug, Clone, Default)]
pub struct OptionSelector {
    config: OptionSelectorConfig,
}

impl OptionSelector {
    /// Selector from configuration.
    #[must_use]
    pub fn new(config: OptionSelectorConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &OptionSelectorConfig {
        &self.config
    }

    /// Indices of candidates that survive the base filter: OTM contracts of
    /// the requested type passing the bid price/volume and trading-day
    /// thresholds.
    #[must_use]
    pub fn filter_candidates(
        &self,
        chain: &OptionChain,
        underlying_price: f64,
        option_type: OptionKind,
    ) -> Vec<usize> {
        (0..chain.len())
            .filter(|&i| {
                if chain.option_type[i] != option_type {
                    return false;
                }
                let otm = match option_type {
                    OptionKind::Call => chain.strike_price[i] > underlying_price,
                    OptionKind::Put => chain.strike_price[i] < underlying_price,
                };
                otm && chain.bid_price[i] >= self.config.min_bid_price
                    && chain.bid_volume[i] >= self.config.min_bid_volume
                    && chain.days_to_expiry[i] >= self.config.min_trading_days
                    && chain.days_to_expiry[i] <= self.config.max_trading_days
            })
            .collect()
    }

    /// Target OTM strike at the configured strike level.
    ///
    /// Strikes of the requested type are walked outward from the underlying
    /// price; the `strike_level`-th one (1-based) is the target, clamping
    /// to the furthest available.
    #[must_use]
    pub fn target_otm_strike(
        &self,
        chain: &OptionChain,
        underlying_price: f64,
        option_type: OptionKind,
    ) -> Option<f64> {
        let mut strikes: Vec<f64> = chain
            .strike_price
            .iter()
            .zip(&chain.option_type)
            .filter(|&(&strike, &kind)| {
                kind == option_type
                    && match option_type {
                        OptionKind::Call => strike > underlying_price,
                        OptionKind::Put => strike < underlying_price,
                    }
            })
            .map(|(&strike, _)| strike)
            .collect();

        match option_type {
            OptionKind::Call => strikes.sort_by(f64::total_cmp),
            OptionKind::Put => strikes.sort_by(|a, b| b.total_cmp(a)),
        }
        strikes.dedup_by(|a, b| (*a - *b).abs() < 1e-9);

        if strikes.is_empty() {
            return None;
        }
        let level = (self.config.strike_level.max(1) as usize).min(strikes.len());
        Some(strikes[level - 1])
    }

    /// Score the filtered candidates and sort them by `total_score`
    /// descending.
    #[must_use]
    pub fn score_candidates(
        &self,
        chain: &OptionChain,
        underlying_price: f64,
        option_type: OptionKind,
    ) -> Vec<SelectionScore> {
        let indices = self.filter_candidates(chain, underlying_price, option_type);
        let Some(target_strike) = self.target_otm_strike(chain, underlying_price, option_type)
        else {
            return Vec::new();
        };

        let mut scores: Vec<SelectionScore> = indices
            .into_iter()
            .map(|i| {
                let spread = chain.ask_price[i] - chain.bid_price[i];
                let liquidity = liquidity_score(&self.config, spread, chain.bid_volume[i]);
                let otm = otm_score(chain.strike_price[i], target_strike);
                let expiry = expiry_score(&self.config, chain.days_to_expiry[i]);
                SelectionScore {
                    vt_symbol: chain.vt_symbol[i].clone(),
                    liquidity_score: liquidity,
                    otm_score: otm,
                    expiry_score: expiry,
                    total_score: total_score(&self.config, liquidity, otm, expiry),
                }
            })
            .collect();

        scores.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        scores
    }

    /// Open-time liquidity gate on a quote snapshot: session volume, best
    /// bid volume and the spread measured in ticks must all pass.
    #[must_use]
    pub fn check_liquidity(
        &self,
        bid_price: f64,
        ask_price: f64,
        bid_volume: u32,
        session_volume: u32,
        price_tick: f64,
    ) -> bool {
        if session_volume < self.config.liquidity_min_volume {
            return false;
        }
        if bid_volume < self.config.liquidity_min_bid_volume {
            return false;
        }
        if price_tick <= 0.0 {
            return false;
        }
        let spread_ticks = (ask_price - bid_price) / price_tick;
        spread_ticks <= f64::from(self.config.liquidity_max_spread_ticks) + 1e-9
    }

    /// Candidate whose delta is nearest to `target_delta`, within the
    /// configured tolerance. `deltas` is parallel to the chain rows;
    /// non-finite entries are skipped.
    #[must_use]
    pub fn select_by_delta(&self, chain: &OptionChain, deltas: &[f64], target_delta: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &delta) in deltas.iter().enumerate().take(chain.len()) {
            if !delta.is_finite() {
                continue;
            }
            let distance = (delta - target_delta).abs();
            if distance <= self.config.delta_tolerance {
                match best {
                    Some((_, best_distance)) if best_distance <= distance => {}
                    _ => best = Some((i, distance)),
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Vertical spread legs: the scored leg at the target strike level and
    /// a protection leg `default_spread_width` levels further OTM. Returns
    /// `(short_leg, long_leg)` chain indices.
    #[must_use]
    pub fn select_vertical_spread(
        &self,
        chain: &OptionChain,
        underlying_price: f64,
        option_type: OptionKind,
    ) -> Option<(usize, usize)> {
        let indices = self.filter_candidates(chain, underlying_price, option_type);
        if indices.is_empty() {
            return None;
        }

        // Sort the filtered candidates outward from the underlying price.
        let mut ordered = indices;
        match option_type {
            OptionKind::Call => {
                ordered.sort_by(|&a, &b| chain.strike_price[a].total_cmp(&chain.strike_price[b]));
            }
            OptionKind::Put => {
                ordered.sort_by(|&a, &b| chain.strike_price[b].total_cmp(&chain.strike_price[a]));
            }
        }

        let short_pos = (self.config.strike_level.max(1) as usize - 1).min(ordered.len() - 1);
        let long_pos = short_pos + self.config.default_spread_width.max(1) as usize;
        if long_pos >= ordered.len() {
            return None;
        }
        Some((ordered[short_pos], ordered[long_pos]))
    }
}
