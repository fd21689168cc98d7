//! Closed set of pricers routed by the pricing engine

pub mod baw;
pub mod bs;
pub mod crr;

pub use baw::BawPricer;
pub use bs::BlackScholesPricer;
pub use crr::CrrPricer;
