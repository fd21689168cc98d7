//! Volatility surface built from solved quotes
//!
//! A snapshot of implied volatility over a strike x expiry grid, queried by
//! nearest-neighbour or linear interpolation along each axis. Out-of-domain
//! queries fail in-band instead of extrapolating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One solved implied volatility point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolQuote {
    /// Strike price
    pub strike: f64,
    /// Time to expiry in years
    pub time_to_expiry: f64,
    /// Implied volatility
    pub implied_vol: f64,
}

/// Surface query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolQueryResult {
    /// Interpolated implied volatility
    pub implied_vol: f64,
    /// Whether the query landed inside the surface domain
    pub success: bool,
    /// Failure description, empty on success
    pub error_message: String,
}

impl VolQueryResult {
    fn found(implied_vol: f64) -> Self {
        Self {
            implied_vol,
            success: true,
            error_message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            implied_vol: 0.0,
            success: false,
            error_message: message.into(),
        }
    }
}

/// Smile slice: volatility across strikes at one expiry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolSmile {
    /// Expiry of the slice, in years
    pub time_to_expiry: f64,
    /// Strikes in ascending order
    pub strikes: Vec<f64>,
    /// Volatility per strike
    pub vols: Vec<f64>,
}

/// Term-structure slice: volatility across expiries at one strike
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermStructure {
    /// Strike of the slice
    pub strike: f64,
    /// Expiries in ascending order, in years
    pub expiries: Vec<f64>,
    /// Volatility per expiry
    pub vols: Vec<f64>,
}

/// Serializable surface snapshot: `vol_matrix[expiry_idx][strike_idx]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolSurfaceSnapshot {
    /// Strike axis, ascending
    pub strikes: Vec<f64>,
    /// Expiry axis, ascending, in years
    pub expiries: Vec<f64>,
    /// Volatility grid indexed `[expiry][strike]`
    pub vol_matrix: Vec<Vec<f64>>,
    /// Snapshot time
    pub timestamp: DateTime<Utc>,
}

/// Volatility surface assembled from individual quotes.
#[derive(Debug, Clone, Default)]
pub struct VolSurface {
    quotes: Vec<VolQuote>,
}

impl VolSurface {
    /// Empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one solved point.
    pub fn insert(&mut self, quote: VolQuote) {
        self.quotes.push(quote);
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// True when no points are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Interpolated volatility at `(strike, time_to_expiry)`.
    ///
    /// Picks the expiry slice closest to the query, then interpolates
    /// linearly between the bracketing strikes of that slice. A query
    /// outside the strike range of the slice fails.
    #[must_use]
    pub fn query(&self, strike: f64, time_to_expiry: f64) -> VolQueryResult {
        if self.quotes.is_empty() {
            return VolQueryResult::failure("波动率曲面为空");
        }

        let nearest_expiry = self
            .quotes
            .iter()
            .map(|q| q.time_to_expiry)
            .min_by(|a, b| {
                (a - time_to_expiry)
                    .abs()
                    .total_cmp(&(b - time_to_expiry).abs())
            })
            .unwrap_or(time_to_expiry);

        let mut slice: Vec<&VolQuote> = self
            .quotes
            .iter()
            .filter(|q| (q.time_to_expiry - nearest_expiry).abs() < 1e-12)
            .collect();
        slice.sort_by(|a, b| a.strike.total_cmp(&b.strike));

        let lowest = slice[0];
        let highest = slice[slice.len() - 1];
        if strike < lowest.strike || strike > highest.strike {
            return VolQueryResult::failure(format!(
                "strike {strike} 超出曲面范围 [{}, {}]",
                lowest.strike, highest.strike
            ));
        }

        for pair in slice.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if strike >= lo.strike && strike <= hi.strike {
                let width = hi.strike - lo.strike;
                let vol = if width < 1e-12 {
                    lo.implied_vol
                } else {
                    let w = (strike - lo.strike) / width;
                    lo.implied_vol + w * (hi.implied_vol - lo.implied_vol)
                };
                return VolQueryResult::found(vol);
            }
        }
        // Single-point slice: exact strike match or rejected above.
        VolQueryResult::found(lowest.implied_vol)
    }

    /// Smile slice at the expiry nearest to `time_to_expiry`.
    #[must_use]
    pub fn smile(&self, time_to_expiry: f64) -> VolSmile {
        let mut slice: Vec<&VolQuote> = match self
            .quotes
            .iter()
            .map(|q| q.time_to_expiry)
            .min_by(|a, b| {
                (a - time_to_expiry)
                    .abs()
                    .total_cmp(&(b - time_to_expiry).abs())
            }) {
            Some(nearest) => self
                .quotes
                .iter()
                .filter(|q| (q.time_to_expiry - nearest).abs() < 1e-12)
                .collect(),
            None => Vec::new(),
        };
        slice.sort_by(|a, b| a.strike.total_cmp(&b.strike));

        VolSmile {
            time_to_expiry: slice.first().map_or(time_to_expiry, |q| q.time_to_expiry),
            strikes: slice.iter().map(|q| q.strike).collect(),
            vols: slice.iter().map(|q| q.implied_vol).collect(),
        }
    }

    /// Term structure at the given strike (exact matches only).
    #[must_use]
    pub fn term_structure(&self, strike: f64) -> TermStructure {
        let mut slice: Vec<&VolQuote> = self
            .quotes
            .iter()
            .filter(|q| (q.strike - strike).abs() < 1e-12)
            .collect();
        slice.sort_by(|a, b| a.time_to_expiry.total_cmp(&b.time_to_expiry));

        TermStructure {
            strike,
            expiries: slice.iter().map(|q| q.time_to_expiry).collect(),
            vols: slice.iter().map(|q| q.implied_vol).collect(),
        }
    }

    /// Dense grid snapshot over all observed strikes and expiries.
    /// Cells without a stored quote carry the interpolated value of their
    /// expiry slice, or zero where interpolation is impossible.
    #[must_use]
    pub fn snapshot(&self, timestamp: DateTime<Utc>) -> VolSurfaceSnapshot {
        let mut strikes: Vec<f64> = self.quotes.iter().map(|q| q.strike).collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

        let mut expiries: Vec<f64> = self.quotes.iter().map(|q| q.time_to_expiry).collect();
        expiries.sort_by(f64::total_cmp);
        expiries.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

        let vol_matrix = expiries
            .iter()
            .map(|&expiry| {
                strikes
                    .iter()
                    .map(|&strike| {
                        let result = self.query(strike, expiry);
                        if result.success {
                            result.implied_vol
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();

        VolSurfaceSnapshot {
            strikes,
            expiries,
            vol_matrix,
            timestamp,
        }
    }
}
