//! Totals-market value detection for football fixtures.
//!
//! The pipeline runs strictly forward: raw provider statistics are
//! normalized into indicators, blended into a calibrated probability with
//! a confidence score, compared against the bookmaker's quote, and any
//! positive-EV market becomes a ranked, stake-sized opportunity. Every
//! stage is a pure function of its inputs; orchestration, fetching,
//! persistence and notification delivery live on the caller's side of the
//! [`data_source::DataSource`] boundary.

pub mod config;
pub mod data_source;
pub mod normalize;
pub mod over_prob;
pub mod pipeline;
pub mod rankings;
pub mod report;
pub mod summary;
pub mod types;
pub mod value_detect;
