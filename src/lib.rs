//! College recommendations from historical JoSAA closing ranks.
//!
//! A query loads one seat table per institution kind, ranks each with
//! [`analyzer::rank_colleges`] (NIT tables with the home-state/other-state
//! quota split, IIIT tables without), and hands the results to
//! [`report`] for display and export.

pub mod analyzer;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;

pub use analyzer::{rank_colleges, rank_colleges_traced, CollegeRanker, LogTrace, NoTrace, RankTrace};
pub use error::{ExportError, LoadError, RecommendError};
pub use models::{CandidateProfile, RankedEntry, RankedResult, SeatRecord};
