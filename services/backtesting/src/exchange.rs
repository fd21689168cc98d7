//! Product-to-exchange resolution
//!
//! One static table covers the products the strategy trades. Resolution is
//! case-sensitive: CFFEX and CZCE products use upper-case codes, the
//! commodity exchanges lower-case.

/// Product code to exchange code.
pub const EXCHANGE_MAP: &[(&str, &str)] = &[
    // CFFEX index and bond futures
    ("IF", "CFFEX"),
    ("IH", "CFFEX"),
    ("IC", "CFFEX"),
    ("IM", "CFFEX"),
    ("T", "CFFEX"),
    ("TF", "CFFEX"),
    ("TS", "CFFEX"),
    // SHFE metals and energy-chemicals
    ("rb", "SHFE"),
    ("hc", "SHFE"),
    ("cu", "SHFE"),
    ("al", "SHFE"),
    ("zn", "SHFE"),
    ("ni", "SHFE"),
    ("au", "SHFE"),
    ("ag", "SHFE"),
    ("ru", "SHFE"),
    ("fu", "SHFE"),
    ("bu", "SHFE"),
    // DCE agriculture and industrials
    ("m", "DCE"),
    ("y", "DCE"),
    ("p", "DCE"),
    ("c", "DCE"),
    ("cs", "DCE"),
    ("a", "DCE"),
    ("i", "DCE"),
    ("j", "DCE"),
    ("jm", "DCE"),
    ("l", "DCE"),
    ("v", "DCE"),
    ("pp", "DCE"),
    ("eg", "DCE"),
    ("eb", "DCE"),
    ("pg", "DCE"),
    // CZCE agriculture and chemicals
    ("MA", "CZCE"),
    ("TA", "CZCE"),
    ("SR", "CZCE"),
    ("CF", "CZCE"),
    ("FG", "CZCE"),
    ("OI", "CZCE"),
    ("RM", "CZCE"),
    ("SA", "CZCE"),
    ("UR", "CZCE"),
    ("AP", "CZCE"),
    // INE energy
    ("sc", "INE"),
    ("lu", "INE"),
    ("nr", "INE"),
    ("bc", "INE"),
];

/// Resolves product codes through [`EXCHANGE_MAP`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeResolver;

impl ExchangeResolver {
    /// Exchange code for a product, `None` for unknown products.
    #[must_use]
    pub fn resolve(product_code: &str) -> Option<&'static str> {
        EXCHANGE_MAP
            .iter()
            .find(|(code, _)| *code == product_code)
            .map(|(_, exchange)| *exchange)
    }
}
