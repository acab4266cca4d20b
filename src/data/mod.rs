/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MealDataset (skipped rows counted)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  MealDataset  │  Vec<MealRecord>, tag catalogs, rating baseline
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply predicates → filtered indices
///   └──────────┘
/// ```
///
/// Scoring and ranking live one level up (`crate::score`, `crate::rank`) and
/// operate on the indices produced here.

pub mod filter;
pub mod loader;
pub mod model;
