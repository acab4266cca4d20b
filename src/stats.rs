use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::MealDataset;

// ---------------------------------------------------------------------------
// Dataset summary
// ---------------------------------------------------------------------------

/// Aggregate figures over the RAW table (rated and unrated rows alike);
/// only ranking views exclude unrated meals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_meals: usize,
    pub rated_meals: usize,
    /// Mean rating over rated meals.
    pub mean_rating: f64,
    pub mean_review_count: f64,
    pub median_calories: f64,
    pub celebrity_chef_count: usize,
    /// Mean over known prices; `None` when every price is unknown.
    pub mean_price: Option<f64>,
    pub cuisine_count: usize,
    pub chef_count: usize,
}

/// Compute the summary in one pass over the table.
pub fn summarize(dataset: &MealDataset) -> DatasetSummary {
    let total = dataset.len();
    let rated = dataset.meals.iter().filter(|m| m.is_rated()).count();

    let review_sum: f64 = dataset
        .meals
        .iter()
        .map(|m| m.review_count as f64)
        .sum();

    let known_prices: Vec<f64> = dataset.meals.iter().filter_map(|m| m.price).collect();
    let mean_price = if known_prices.is_empty() {
        None
    } else {
        Some(known_prices.iter().sum::<f64>() / known_prices.len() as f64)
    };

    let chefs: std::collections::BTreeSet<&str> = dataset
        .meals
        .iter()
        .map(|m| m.chef_name.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    DatasetSummary {
        total_meals: total,
        rated_meals: rated,
        mean_rating: dataset.mean_rating,
        mean_review_count: if total == 0 {
            0.0
        } else {
            review_sum / total as f64
        },
        median_calories: median(dataset.meals.iter().map(|m| m.calories).collect()),
        celebrity_chef_count: dataset.meals.iter().filter(|m| m.is_celebrity_chef).count(),
        mean_price,
        cuisine_count: dataset.cuisines.len(),
        chef_count: chefs.len(),
    }
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Tag frequency
// ---------------------------------------------------------------------------

/// Occurrence count per cuisine tag, most common first (ties alphabetical).
pub fn cuisine_frequency(dataset: &MealDataset) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for meal in &dataset.meals {
        for tag in &meal.cuisines {
            *counts.entry(tag.as_str()).or_default() += 1;
        }
    }
    let mut freq: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, n)| (tag.to_string(), n))
        .collect();
    // BTreeMap iteration is alphabetical, and the sort is stable.
    freq.sort_by(|a, b| b.1.cmp(&a.1));
    freq
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One fixed-width histogram bucket: `[lo, hi)`, last bucket `[lo, hi]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Fixed-width histogram over the given values (rating and review-count
/// distributions in the shell).
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lo: min,
            hi: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lo: min + i as f64 * width,
            hi: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::model::{parse_tags, MealRecord};

    fn meal(id: u64, rating: f64, calories: f64, cuisines: &str) -> MealRecord {
        MealRecord {
            id,
            name: format!("meal-{id}"),
            description: String::new(),
            rating,
            review_count: (id * 10) as u32,
            price: if id % 2 == 0 { Some(10.0 + id as f64) } else { None },
            calories,
            cuisines: parse_tags(cuisines, ','),
            specifications: BTreeSet::new(),
            chef_name: format!("chef-{}", id % 2),
            is_celebrity_chef: id == 0,
            url: None,
        }
    }

    fn dataset() -> MealDataset {
        MealDataset::from_meals(
            vec![
                meal(0, 4.0, 300.0, "Italian"),
                meal(1, 0.0, 500.0, "Italian,Thai"),
                meal(2, 3.0, 700.0, "Thai"),
                meal(3, 5.0, 400.0, "Italian"),
            ],
            1,
        )
    }

    #[test]
    fn summary_covers_raw_table() {
        let summary = summarize(&dataset());
        assert_eq!(
            summary,
            DatasetSummary {
                total_meals: 4,
                rated_meals: 3,
                mean_rating: 4.0,
                mean_review_count: 15.0,
                median_calories: 450.0,
                celebrity_chef_count: 1,
                mean_price: Some(11.0), // meals 0 and 2: 10.0, 12.0
                cuisine_count: 2,
                chef_count: 2,
            }
        );
    }

    #[test]
    fn summary_of_empty_table() {
        let summary = summarize(&MealDataset::from_meals(Vec::new(), 0));
        assert_eq!(summary.total_meals, 0);
        assert_eq!(summary.mean_price, None);
        assert_eq!(summary.median_calories, 0.0);
    }

    #[test]
    fn cuisine_frequency_counts_most_common_first() {
        let freq = cuisine_frequency(&dataset());
        assert_eq!(
            freq,
            vec![("Italian".to_string(), 3), ("Thai".to_string(), 2)]
        );
    }

    #[test]
    fn histogram_spans_value_range() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 4.0];
        let bins = histogram(&values, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].count, 1); // [0, 1) holds only 0.0
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
        // Max values land in the last (inclusive) bucket.
        assert_eq!(bins[3].count, 4);
    }

    #[test]
    fn histogram_of_constant_values_is_a_single_bin() {
        let bins = histogram(&[2.5, 2.5, 2.5], 10);
        assert_eq!(
            bins,
            vec![HistogramBin {
                lo: 2.5,
                hi: 2.5,
                count: 3
            }]
        );
    }

    #[test]
    fn histogram_of_empty_input_is_empty() {
        assert!(histogram(&[], 10).is_empty());
    }
}
