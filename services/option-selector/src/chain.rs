//! Candidate option chain
//!
//! Column-oriented table over the candidate contracts: one vector per
//! column instead of one map per row, so filtering and scoring walk flat
//! memory.

use options_engine::OptionKind;
use serde::{Deserialize, Serialize};

/// One candidate contract, the row view of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    /// Contract identifier
    pub vt_symbol: String,
    /// Call or put
    pub option_type: OptionKind,
    /// Strike price
    pub strike_price: f64,
    /// Expiry date tag, `YYYY-MM-DD`
    pub expiry_date: String,
    /// Best bid price
    pub bid_price: f64,
    /// Best bid volume
    pub bid_volume: u32,
    /// Best ask price
    pub ask_price: f64,
    /// Best ask volume
    pub ask_volume: u32,
    /// Remaining trading days
    pub days_to_expiry: u32,
    /// Underlying contract symbol
    pub underlying_symbol: String,
}

/// Struct-of-vectors candidate table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    /// Contract identifiers
    pub vt_symbol: Vec<String>,
    /// Call/put per row
    pub option_type: Vec<OptionKind>,
    /// Strike per row
    pub strike_price: Vec<f64>,
    /// Expiry tag per row
    pub expiry_date: Vec<String>,
    /// Best bid per row
    pub bid_price: Vec<f64>,
    /// Bid volume per row
    pub bid_volume: Vec<u32>,
    /// Best ask per row
    pub ask_price: Vec<f64>,
    /// Ask volume per row
    pub ask_volume: Vec<u32>,
    /// Trading days left per row
    pub days_to_expiry: Vec<u32>,
    /// Underlying symbol per row
    pub underlying_symbol: Vec<String>,
}

impl OptionChain {
    /// Empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of candidate rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vt_symbol.len()
    }

    /// True when the chain holds no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vt_symbol.is_empty()
    }

    /// Append one candidate.
    pub fn push(&mut self, row: CandidateRow) {
        self.vt_symbol.push(row.vt_symbol);
        self.option_type.push(row.option_type);
        self.strike_price.push(row.strike_price);
        self.expiry_date.push(row.expiry_date);
        self.bid_price.push(row.bid_price);
        self.bid_volume.push(row.bid_volume);
        self.ask_price.push(row.ask_price);
        self.ask_volume.push(row.ask_volume);
        self.days_to_expiry.push(row.days_to_expiry);
        self.underlying_symbol.push(row.underlying_symbol);
    }

    /// Row view at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> CandidateRow {
        CandidateRow {
            vt_symbol: self.vt_symbol[index].clone(),
            option_type: self.option_type[index],
            strike_price: self.strike_price[index],
            expiry_date: self.expiry_date[index].clone(),
            bid_price: self.bid_price[index],
            bid_volume: self.bid_volume[index],
            ask_price: self.ask_price[index],
            ask_volume: self.ask_volume[index],
            days_to_expiry: self.days_to_expiry[index],
            underlying_symbol: self.underlying_symbol[index].clone(),
        }
    }
}

impl FromIterator<CandidateRow> for OptionChain {
    fn from_iter<T: IntoIterator<Item = CandidateRow>>(iter: T) -> Self {
        let mut chain = Self::new();
        for row in iter {
            chain.push(row);
        }
        chain
    }
}
