//! Mathematical utilities: histogramming, the Newton likelihood driver, and
//! the significance statistic.

pub mod histogram;
pub mod newton;
pub mod stats;

pub use histogram::*;
pub use newton::*;
pub use stats::*;
