use std::collections::BTreeSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// MealRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single meal (one row of the source table).
///
/// `rating == 0.0` means "unrated": such rows stay in the table for aggregate
/// statistics but are excluded from every ranking view.
/// `price: None` means the price is unknown (missing in the source, or below
/// the realism floor applied at load time).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealRecord {
    /// Stable identifier (source `meal_id` column, or the row ordinal).
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Average star rating in [0, 5].
    pub rating: f64,
    pub review_count: u32,
    /// Known price, always > 0. `None` when missing or below the floor.
    pub price: Option<f64>,
    pub calories: f64,
    /// Cuisine tags, parsed once at load time.
    pub cuisines: BTreeSet<String>,
    /// Diet / feature tags, parsed once at load time.
    pub specifications: BTreeSet<String>,
    pub chef_name: String,
    pub is_celebrity_chef: bool,
    /// Product page link, display-only.
    pub url: Option<String>,
}

impl MealRecord {
    /// Whether the meal has a review-backed rating.
    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }
}

/// Split a delimited tag string into a trimmed, deduplicated set.
///
/// Empty entries are dropped; matching stays case-sensitive.
pub fn parse_tags(raw: &str, delimiter: char) -> BTreeSet<String> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// MealDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed tag catalogs.
///
/// Immutable after load: every downstream stage (score, filter, rank) is a
/// pure function producing a new view, never a mutation of this table.
#[derive(Debug, Clone, PartialEq)]
pub struct MealDataset {
    /// All meals (rows), in source order.
    pub meals: Vec<MealRecord>,
    /// Sorted set of distinct cuisine tags across the table.
    pub cuisines: BTreeSet<String>,
    /// Sorted set of distinct diet / feature tags across the table.
    pub specifications: BTreeSet<String>,
    /// Rows rejected at load time (missing or malformed required fields).
    pub skipped_rows: usize,
    /// Mean rating over rated meals; 0.0 when nothing is rated.
    pub mean_rating: f64,
}

impl MealDataset {
    /// Build the tag catalogs and rating baseline from loaded rows.
    pub fn from_meals(meals: Vec<MealRecord>, skipped_rows: usize) -> Self {
        let mut cuisines = BTreeSet::new();
        let mut specifications = BTreeSet::new();

        for meal in &meals {
            cuisines.extend(meal.cuisines.iter().cloned());
            specifications.extend(meal.specifications.iter().cloned());
        }

        let mut rated_sum = 0.0;
        let mut rated_count = 0usize;
        for meal in meals.iter().filter(|m| m.is_rated()) {
            rated_sum += meal.rating;
            rated_count += 1;
        }
        let mean_rating = if rated_count == 0 {
            0.0
        } else {
            rated_sum / rated_count as f64
        };

        MealDataset {
            meals,
            cuisines,
            specifications,
            skipped_rows,
            mean_rating,
        }
    }

    /// Number of meals.
    pub fn len(&self) -> usize {
        self.meals.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}
