//! # Crewrank Speed Normalization & Ranking Engine
//!
//! This crate turns heterogeneous race results (different distances, boat classes,
//! timed or placed only) into comparable adjusted speeds, margins and rankings.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage,
//!   CSV parsing or rendering. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every operation is a pure function of its inputs.
//!   The `RankingEngine` takes a result history (and optionally the previous
//!   snapshot) and produces a `RankingTable`; nothing is cached between calls.
//! - **Empty is not an error:** No results, or no direct meetings, produce empty
//!   outputs. `AnalyticsError` is reserved for invalid input.
//!
//! ## Public API
//!
//! - `estimate_speed`: the speed primitive every other calculation builds on.
//! - `calculate_margin`, `boat_lengths`, `format_margin`: margins between two boats.
//! - `RankingEngine`, `RankingTable`, `TeamRanking`: class rankings with rank movement.
//! - `head_to_head`: direct-race record of two teams.
//! - `race_margins`: finishing order and gaps within a single race.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod head_to_head;
pub mod margin;
pub mod race;
pub mod report;
pub mod speed;

// Re-export the key components to create a clean, public-facing API.
pub use engine::RankingEngine;
pub use error::AnalyticsError;
pub use head_to_head::{head_to_head, HeadToHeadSummary, Meeting};
pub use margin::{boat_lengths, boat_lengths_for, calculate_margin, format_margin, MarginDisplay, MarginResult};
pub use race::{ordinal, race_margins, FinishMargin};
pub use report::{ConfidenceTier, RankChange, RankingTable, TeamRanking, Trend};
pub use speed::{estimate_speed, result_speed};
