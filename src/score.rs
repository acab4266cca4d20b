use crate::data::model::MealDataset;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Score parameters
// ---------------------------------------------------------------------------

/// Bounds accepted from the caller.
pub const PRIOR_MIN: f64 = 1.0;
pub const PRIOR_MAX: f64 = 5.0;
pub const WEIGHT_MIN: u32 = 1;
pub const WEIGHT_MAX: u32 = 2000;

/// Reviews at which the prior and the observed rating weigh equally.
pub const DEFAULT_WEIGHT: u32 = 100;

/// Validated parameters of the smoothed-rating formula.
///
/// Construction is the only validation point, so a held value is always
/// inside the accepted bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreParams {
    prior: f64,
    weight: u32,
}

impl ScoreParams {
    /// Build params, rejecting out-of-bounds values instead of coercing them.
    pub fn new(prior: f64, weight: u32) -> Result<Self, ConfigError> {
        if !prior.is_finite() || !(PRIOR_MIN..=PRIOR_MAX).contains(&prior) {
            return Err(ConfigError::PriorOutOfRange {
                value: prior,
                min: PRIOR_MIN,
                max: PRIOR_MAX,
            });
        }
        if !(WEIGHT_MIN..=WEIGHT_MAX).contains(&weight) {
            return Err(ConfigError::WeightOutOfRange {
                value: weight,
                min: WEIGHT_MIN,
                max: WEIGHT_MAX,
            });
        }
        Ok(ScoreParams { prior, weight })
    }

    /// Default parameters for a dataset: prior = mean rating over rated
    /// meals (clamped into the accepted range), weight = 100.
    pub fn for_dataset(dataset: &MealDataset) -> Self {
        ScoreParams {
            prior: dataset.mean_rating.clamp(PRIOR_MIN, PRIOR_MAX),
            weight: DEFAULT_WEIGHT,
        }
    }

    /// Prior belief C: the assumed rating for a meal with zero reviews.
    pub fn prior(&self) -> f64 {
        self.prior
    }

    /// Confidence weight m.
    pub fn weight(&self) -> u32 {
        self.weight
    }
}

// ---------------------------------------------------------------------------
// Score computation
// ---------------------------------------------------------------------------

/// Smoothed ("Bayesian") rating: `(v·R + m·C) / (v + m)`.
///
/// Pure. The result always lies between the observed rating and the prior;
/// with zero reviews it is exactly the prior.
pub fn bayesian_score(rating: f64, review_count: u32, params: &ScoreParams) -> f64 {
    let v = review_count as f64;
    let m = params.weight as f64;
    (v * rating + m * params.prior) / (v + m)
}

/// Score every row in one elementwise pass, in table order.
pub fn score_table(dataset: &MealDataset, params: &ScoreParams) -> Vec<f64> {
    dataset
        .meals
        .iter()
        .map(|meal| bayesian_score(meal.rating, meal.review_count, params))
        .collect()
}
