use std::collections::BTreeSet;

use crate::error::ConfigError;

use super::model::{MealDataset, MealRecord};

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// User-selected filter state for one ranking request.
///
/// Every stage is independently skippable: an empty tag set or an absent
/// range is a no-op. Tag stages use OR semantics within the field (any
/// selected tag qualifies a row).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterParams {
    pub cuisines: BTreeSet<String>,
    pub diets: BTreeSet<String>,
    /// Inclusive `(min, max)` calorie bounds.
    pub calories: Option<(f64, f64)>,
    /// Inclusive `(min, max)` price bounds. Unknown prices always pass.
    pub price: Option<(f64, f64)>,
}

impl FilterParams {
    /// Reject inverted ranges before touching the table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("calorie", self.calories)?;
        check_range("price", self.price)?;
        Ok(())
    }
}

fn check_range(name: &'static str, range: Option<(f64, f64)>) -> Result<(), ConfigError> {
    match range {
        Some((min, max)) if min > max => Err(ConfigError::InvertedRange { name, min, max }),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Filter pipeline
// ---------------------------------------------------------------------------

/// Return indices of meals that pass all active filters.
///
/// Unrated rows (`rating == 0`) are dropped first, upstream of every other
/// stage; the raw table stays untouched for aggregate statistics. The
/// remaining stages are independent predicates over disjoint fields, so
/// their order carries no semantics — tag membership runs first because it
/// is the cheapest test.
pub fn filtered_indices(
    dataset: &MealDataset,
    params: &FilterParams,
) -> Result<Vec<usize>, ConfigError> {
    params.validate()?;

    Ok(dataset
        .meals
        .iter()
        .enumerate()
        .filter(|(_, meal)| meal.is_rated() && passes(meal, params))
        .map(|(i, _)| i)
        .collect())
}

fn passes(meal: &MealRecord, params: &FilterParams) -> bool {
    if !params.cuisines.is_empty() && meal.cuisines.is_disjoint(&params.cuisines) {
        return false;
    }
    if !params.diets.is_empty() && meal.specifications.is_disjoint(&params.diets) {
        return false;
    }
    if let Some((min, max)) = params.calories {
        if meal.calories < min || meal.calories > max {
            return false;
        }
    }
    if let Some((min, max)) = params.price {
        // Unknown prices are never excluded by a price range.
        if let Some(price) = meal.price {
            if price < min || price > max {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::parse_tags;

    fn meal(id: u64, rating: f64, calories: f64, price: Option<f64>) -> MealRecord {
        MealRecord {
            id,
            name: format!("meal-{id}"),
            description: String::new(),
            rating,
            review_count: 10,
            price,
            calories,
            cuisines: parse_tags("Italian,Mexican", ','),
            specifications: parse_tags("Vegan|Spicy", '|'),
            chef_name: String::new(),
            is_celebrity_chef: false,
            url: None,
        }
    }

    fn dataset() -> MealDataset {
        MealDataset::from_meals(
            vec![
                meal(0, 4.5, 500.0, Some(12.0)),
                meal(1, 0.0, 300.0, Some(9.0)), // unrated
                meal(2, 3.5, 501.0, None),
                meal(3, 2.0, 200.0, Some(30.0)),
            ],
            0,
        )
    }

    fn tags(csv: &str) -> BTreeSet<String> {
        parse_tags(csv, ',')
    }

    #[test]
    fn unrated_rows_never_appear() {
        let indices = filtered_indices(&dataset(), &FilterParams::default()).unwrap();
        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn empty_filters_are_no_ops() {
        let ds = dataset();
        let all = filtered_indices(&ds, &FilterParams::default()).unwrap();
        let explicit = filtered_indices(
            &ds,
            &FilterParams {
                cuisines: BTreeSet::new(),
                diets: BTreeSet::new(),
                calories: None,
                price: None,
            },
        )
        .unwrap();
        assert_eq!(all, explicit);
    }

    #[test]
    fn cuisine_filter_uses_or_semantics() {
        let ds = dataset();
        // "Italian" alone matches; the second tag never occurs in the table.
        let params = FilterParams {
            cuisines: tags("Italian,Nonexistent"),
            ..Default::default()
        };
        let indices = filtered_indices(&ds, &params).unwrap();
        assert_eq!(indices, vec![0, 2, 3]);

        let params = FilterParams {
            cuisines: tags("Nonexistent"),
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &params).unwrap().is_empty());
    }

    #[test]
    fn diet_filter_matches_any_selected_tag() {
        let params = FilterParams {
            diets: tags("Spicy"),
            ..Default::default()
        };
        let indices = filtered_indices(&dataset(), &params).unwrap();
        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn calorie_bounds_are_inclusive() {
        let params = FilterParams {
            calories: Some((0.0, 500.0)),
            ..Default::default()
        };
        let indices = filtered_indices(&dataset(), &params).unwrap();
        // 500 kept (inclusive), 501 dropped.
        assert_eq!(indices, vec![0, 3]);
    }

    #[test]
    fn unknown_price_always_passes_price_range() {
        let params = FilterParams {
            price: Some((10.0, 20.0)),
            ..Default::default()
        };
        let indices = filtered_indices(&dataset(), &params).unwrap();
        // Meal 2 has no price; meal 3 at 30.0 is out of range.
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let ds = dataset();
        let params = FilterParams {
            cuisines: tags("Italian"),
            calories: Some((0.0, 600.0)),
            price: Some((5.0, 40.0)),
            ..Default::default()
        };
        let once = filtered_indices(&ds, &params).unwrap();

        // Re-filter the surviving subset: nothing further drops out.
        let survivors = MealDataset::from_meals(
            once.iter().map(|&i| ds.meals[i].clone()).collect(),
            0,
        );
        let twice = filtered_indices(&survivors, &params).unwrap();
        assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn empty_table_yields_empty_output() {
        let ds = MealDataset::from_meals(Vec::new(), 0);
        let indices = filtered_indices(&ds, &FilterParams::default()).unwrap();
        assert!(indices.is_empty());
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let ds = dataset();
        let params = FilterParams {
            calories: Some((600.0, 100.0)),
            ..Default::default()
        };
        assert_eq!(
            filtered_indices(&ds, &params),
            Err(ConfigError::InvertedRange {
                name: "calorie",
                min: 600.0,
                max: 100.0
            })
        );

        let params = FilterParams {
            price: Some((20.0, 10.0)),
            ..Default::default()
        };
        assert!(matches!(
            filtered_indices(&ds, &params),
            Err(ConfigError::InvertedRange { name: "price", .. })
        ));
    }
}
