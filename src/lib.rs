//! Bayesian ranking and filtering engine for food-menu datasets.
//!
//! The pipeline is a chain of pure stages over an immutable table:
//!
//! ```text
//! loader → MealDataset → score → filter → rank → (shell renders)
//! ```
//!
//! Smoothed scores pull a meal's raw rating toward a prior belief in
//! proportion to how few reviews support it, so one 5-star review does not
//! outrank a thousand 4.5-star ones. [`session::Session`] wraps the chain
//! with file-identity caching and per-query memoization for interactive
//! shells.

pub mod cli;
pub mod data;
pub mod error;
pub mod rank;
pub mod score;
pub mod session;
pub mod stats;

pub use data::filter::{filtered_indices, FilterParams};
pub use data::loader::{load_file, LoadOptions};
pub use data::model::{MealDataset, MealRecord};
pub use error::ConfigError;
pub use rank::{rank_by_score, rank_by_value, RankedMeal, ValueFilters, ValueMeal};
pub use score::{bayesian_score, score_table, ScoreParams};
pub use session::{RankQuery, Session};
