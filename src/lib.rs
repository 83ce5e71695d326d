//! `evlist` library crate.
//!
//! A time-tagged event-list engine for astrophysical time-series analysis:
//!
//! - mark "active" (signal) and "background" (fit) time windows on a stream
//!   of photon arrival times tagged with energy channels
//! - fit a per-channel polynomial background model over the background
//!   windows, binned or unbinned, with automatic degree selection
//! - produce per-channel rate products (observed or background-subtracted)
//!   as spectral input for a downstream fitting pipeline
//!
//! The main entry point is [`series::EventList`].

pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod report;
pub mod series;
