use serde::Serialize;

use crate::data::model::{MealDataset, MealRecord};

// ---------------------------------------------------------------------------
// Ranked views
// ---------------------------------------------------------------------------

/// One row of a rating ranking: the record plus its smoothed score.
///
/// A borrowed view over the immutable table, cheap to rebuild on every
/// parameter change and serializable as a flat object.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMeal<'a> {
    #[serde(flatten)]
    pub meal: &'a MealRecord,
    pub bayesian_score: f64,
}

/// One row of a value ranking. Only meals with a known price qualify.
#[derive(Debug, Clone, Serialize)]
pub struct ValueMeal<'a> {
    #[serde(flatten)]
    pub meal: &'a MealRecord,
    pub bayesian_score: f64,
    /// Smoothed score per currency unit, scaled ×1000.
    pub value_score: f64,
}

// ---------------------------------------------------------------------------
// Contract A – rating rank
// ---------------------------------------------------------------------------

/// Order the filtered subset by smoothed score, best first.
///
/// `scores` is the full-table score column from [`crate::score::score_table`];
/// `indices` the surviving rows in table order. The sort is stable, so ties
/// keep table order and repeated calls on unchanged input yield an identical
/// sequence.
pub fn rank_by_score<'a>(
    dataset: &'a MealDataset,
    scores: &[f64],
    indices: &[usize],
) -> Vec<RankedMeal<'a>> {
    let mut ranked: Vec<RankedMeal<'a>> = indices
        .iter()
        .map(|&i| RankedMeal {
            meal: &dataset.meals[i],
            bayesian_score: scores[i],
        })
        .collect();
    ranked.sort_by(|a, b| b.bayesian_score.total_cmp(&a.bayesian_score));
    ranked
}

// ---------------------------------------------------------------------------
// Contract B – value rank
// ---------------------------------------------------------------------------

/// Extra thresholds for the value view, AND-combined and applied before
/// ranking. All bounds are inclusive; `None` disables a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueFilters {
    /// Keep meals whose smoothed score is at least this.
    pub min_score: Option<f64>,
    pub max_price: Option<f64>,
    pub max_calories: Option<f64>,
}

impl ValueFilters {
    fn passes(&self, meal: &MealRecord, score: f64, price: f64) -> bool {
        self.min_score.is_none_or(|min| score >= min)
            && self.max_price.is_none_or(|max| price <= max)
            && self.max_calories.is_none_or(|max| meal.calories <= max)
    }
}

/// Order meals by quality-per-currency-unit, best first.
///
/// Meals without a known price are excluded from value computation entirely.
/// The loader guarantees known prices are above the realism floor, so the
/// division is safe; a non-positive price smuggled in through a hand-built
/// record is skipped rather than propagated as infinity.
pub fn rank_by_value<'a>(
    dataset: &'a MealDataset,
    scores: &[f64],
    indices: &[usize],
    filters: &ValueFilters,
) -> Vec<ValueMeal<'a>> {
    let mut ranked: Vec<ValueMeal<'a>> = indices
        .iter()
        .filter_map(|&i| {
            let meal = &dataset.meals[i];
            let price = meal.price?;
            if price <= 0.0 {
                log::warn!("Meal {} has non-positive price {price}, skipping", meal.id);
                return None;
            }
            let bayesian_score = scores[i];
            if !filters.passes(meal, bayesian_score, price) {
                return None;
            }
            Some(ValueMeal {
                meal,
                bayesian_score,
                value_score: (bayesian_score / price) * 1000.0,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.value_score.total_cmp(&a.value_score));
    ranked
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::score::{score_table, ScoreParams};

    fn meal(id: u64, rating: f64, reviews: u32, price: Option<f64>, calories: f64) -> MealRecord {
        MealRecord {
            id,
            name: format!("meal-{id}"),
            description: String::new(),
            rating,
            review_count: reviews,
            price,
            calories,
            cuisines: BTreeSet::new(),
            specifications: BTreeSet::new(),
            chef_name: String::new(),
            is_celebrity_chef: false,
            url: None,
        }
    }

    fn all_indices(ds: &MealDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn orders_by_score_descending() {
        // Worked example: C = 4.0, m = 100.
        let ds = MealDataset::from_meals(
            vec![
                meal(0, 4.5, 10, None, 400.0),
                meal(1, 5.0, 1, None, 400.0),
                meal(2, 3.0, 1000, None, 400.0),
            ],
            0,
        );
        let params = ScoreParams::new(4.0, 100).unwrap();
        let scores = score_table(&ds, &params);
        let ranked = rank_by_score(&ds, &scores, &all_indices(&ds));

        let ids: Vec<u64> = ranked.iter().map(|r| r.meal.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn ties_keep_table_order_and_reruns_are_identical() {
        // Identical rating/review pairs tie exactly.
        let ds = MealDataset::from_meals(
            vec![
                meal(0, 4.0, 50, None, 400.0),
                meal(1, 4.0, 50, None, 400.0),
                meal(2, 4.8, 500, None, 400.0),
                meal(3, 4.0, 50, None, 400.0),
            ],
            0,
        );
        let params = ScoreParams::new(3.5, 100).unwrap();
        let scores = score_table(&ds, &params);
        let indices = all_indices(&ds);

        let first: Vec<u64> = rank_by_score(&ds, &scores, &indices)
            .iter()
            .map(|r| r.meal.id)
            .collect();
        assert_eq!(first, vec![2, 0, 1, 3]);

        let second: Vec<u64> = rank_by_score(&ds, &scores, &indices)
            .iter()
            .map(|r| r.meal.id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn value_rank_excludes_unknown_prices() {
        let ds = MealDataset::from_meals(
            vec![
                meal(0, 4.0, 100, Some(10.0), 400.0),
                meal(1, 4.8, 100, None, 400.0),
            ],
            0,
        );
        let params = ScoreParams::new(4.0, 100).unwrap();
        let scores = score_table(&ds, &params);
        let indices = all_indices(&ds);

        // The unpriced meal ranks by rating but has no value row.
        assert_eq!(rank_by_score(&ds, &scores, &indices).len(), 2);
        let valued = rank_by_value(&ds, &scores, &indices, &ValueFilters::default());
        assert_eq!(valued.len(), 1);
        assert_eq!(valued[0].meal.id, 0);
    }

    #[test]
    fn value_score_is_score_per_price_scaled() {
        let ds = MealDataset::from_meals(vec![meal(0, 4.0, 0, Some(10.0), 400.0)], 0);
        let params = ScoreParams::new(4.0, 100).unwrap();
        let scores = score_table(&ds, &params);

        let valued = rank_by_value(&ds, &scores, &all_indices(&ds), &ValueFilters::default());
        // Zero reviews → score == prior == 4.0 → 4.0 / 10 * 1000.
        assert!((valued[0].value_score - 400.0).abs() < 1e-9);
    }

    #[test]
    fn value_filters_are_and_combined() {
        let ds = MealDataset::from_meals(
            vec![
                meal(0, 4.8, 1000, Some(10.0), 400.0), // high score, cheap
                meal(1, 4.8, 1000, Some(25.0), 400.0), // too expensive
                meal(2, 4.8, 1000, Some(10.0), 900.0), // too caloric
                meal(3, 2.0, 1000, Some(10.0), 400.0), // score too low
            ],
            0,
        );
        let params = ScoreParams::new(4.0, 100).unwrap();
        let scores = score_table(&ds, &params);

        let filters = ValueFilters {
            min_score: Some(4.0),
            max_price: Some(20.0),
            max_calories: Some(500.0),
        };
        let valued = rank_by_value(&ds, &scores, &all_indices(&ds), &filters);
        let ids: Vec<u64> = valued.iter().map(|v| v.meal.id).collect();
        assert_eq!(ids, vec![0]);
    }

    #[test]
    fn non_positive_price_is_skipped_not_propagated() {
        let ds = MealDataset::from_meals(vec![meal(0, 4.0, 10, Some(0.0), 400.0)], 0);
        let params = ScoreParams::new(4.0, 100).unwrap();
        let scores = score_table(&ds, &params);

        let valued = rank_by_value(&ds, &scores, &all_indices(&ds), &ValueFilters::default());
        assert!(valued.is_empty());
    }

    #[test]
    fn empty_subset_ranks_to_empty_sequence() {
        let ds = MealDataset::from_meals(Vec::new(), 0);
        let ranked = rank_by_score(&ds, &[], &[]);
        assert!(ranked.is_empty());
        let valued = rank_by_value(&ds, &[], &[], &ValueFilters::default());
        assert!(valued.is_empty());
    }
}
