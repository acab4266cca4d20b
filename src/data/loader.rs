use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{parse_tags, MealDataset, MealRecord};

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// Knobs applied while ingesting a source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Prices below this are treated as unknown rather than real.
    /// The upstream export occasionally carries placeholder prices of a few
    /// currency units that no actual meal sells for.
    pub price_floor: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { price_floor: 7.0 }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a meal dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with the export's column names (recommended)
/// * `.json` – records-oriented array: `[{ "name": ..., "calories": ... }]`
///
/// Rows missing a required field (`name`, `calories`) or carrying malformed
/// values are skipped and counted in [`MealDataset::skipped_rows`]; loading
/// continues for the remaining rows.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<MealDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path, options),
        "json" => load_json(path, options),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} meals ({} rows skipped, {} cuisines, {} specifications)",
        dataset.len(),
        dataset.skipped_rows,
        dataset.cuisines.len(),
        dataset.specifications.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names.  `name` and `calories` columns
/// are required; everything else degrades to a default when absent.
/// `cuisines` is comma-separated, `specifications` pipe-separated.
fn load_csv(path: &Path, options: &LoadOptions) -> Result<MealDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &str| headers.iter().position(|h| h == name);

    let name_idx = col("name").context("CSV missing 'name' column")?;
    let calories_idx = col("calories").context("CSV missing 'calories' column")?;
    let id_idx = col("meal_id");
    let description_idx = col("description");
    let rating_idx = col("rating");
    let review_count_idx = col("review_count");
    let price_idx = col("price");
    let cuisines_idx = col("cuisines");
    let specifications_idx = col("specifications");
    let chef_name_idx = col("chef_name");
    let celebrity_idx = col("is_celebrity_chef");
    let url_idx = col("url");

    let mut meals = Vec::new();
    let mut skipped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Row {row_no}: unreadable ({e}), skipping");
                skipped += 1;
                continue;
            }
        };
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

        let name = field(Some(name_idx));
        if name.is_empty() {
            log::warn!("Row {row_no}: missing 'name', skipping");
            skipped += 1;
            continue;
        }

        let calories = match parse_calories(field(Some(calories_idx))) {
            Some(c) => c,
            None => {
                log::warn!("Row {row_no} ({name}): missing or invalid 'calories', skipping");
                skipped += 1;
                continue;
            }
        };

        let rating = match parse_rating(field(rating_idx)) {
            Some(r) => r,
            None => {
                log::warn!("Row {row_no} ({name}): rating outside [0, 5], skipping");
                skipped += 1;
                continue;
            }
        };

        let id = field(id_idx)
            .parse::<u64>()
            .unwrap_or(row_no as u64);

        meals.push(MealRecord {
            id,
            name: name.to_string(),
            description: field(description_idx).to_string(),
            rating,
            review_count: parse_count(field(review_count_idx)),
            price: normalize_price(parse_optional_f64(field(price_idx)), options.price_floor),
            calories,
            cuisines: parse_tags(field(cuisines_idx), ','),
            specifications: parse_tags(field(specifications_idx), '|'),
            chef_name: field(chef_name_idx).to_string(),
            is_celebrity_chef: parse_bool(field(celebrity_idx)),
            url: non_empty(field(url_idx)),
        });
    }

    Ok(MealDataset::from_meals(meals, skipped))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')` of the same table):
///
/// ```json
/// [
///   {
///     "meal_id": 17,
///     "name": "Chicken Tikka",
///     "rating": 4.6,
///     "review_count": 120,
///     "price": 11.95,
///     "calories": 540,
///     "cuisines": "Indian, Asian",
///     "specifications": "High Protein|Gluten Free"
///   },
///   ...
/// ]
/// ```
///
/// `cuisines` / `specifications` may also be arrays of strings.
fn load_json(path: &Path, options: &LoadOptions) -> Result<MealDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut meals = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for (row_no, rec) in records.iter().enumerate() {
        let obj = match rec.as_object() {
            Some(o) => o,
            None => {
                log::warn!("Row {row_no}: not a JSON object, skipping");
                skipped += 1;
                continue;
            }
        };

        let name = obj
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or("");
        if name.is_empty() {
            log::warn!("Row {row_no}: missing 'name', skipping");
            skipped += 1;
            continue;
        }

        let calories = match obj.get("calories").and_then(json_f64) {
            Some(c) if c.is_finite() && c >= 0.0 => c,
            _ => {
                log::warn!("Row {row_no} ({name}): missing or invalid 'calories', skipping");
                skipped += 1;
                continue;
            }
        };

        let rating = obj.get("rating").and_then(json_f64).unwrap_or(0.0);
        if !(0.0..=5.0).contains(&rating) {
            log::warn!("Row {row_no} ({name}): rating outside [0, 5], skipping");
            skipped += 1;
            continue;
        }

        let review_count = obj
            .get("review_count")
            .and_then(json_f64)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u32)
            .unwrap_or(0);

        let id = obj
            .get("meal_id")
            .and_then(|v| v.as_u64())
            .unwrap_or(row_no as u64);

        meals.push(MealRecord {
            id,
            name: name.to_string(),
            description: json_string(obj.get("description")),
            rating,
            review_count,
            price: normalize_price(obj.get("price").and_then(json_f64), options.price_floor),
            calories,
            cuisines: json_tags(obj.get("cuisines"), ','),
            specifications: json_tags(obj.get("specifications"), '|'),
            chef_name: json_string(obj.get("chef_name")),
            is_celebrity_chef: obj
                .get("is_celebrity_chef")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            url: obj
                .get("url")
                .and_then(|v| v.as_str())
                .and_then(|s| non_empty(s.trim())),
        });
    }

    Ok(MealDataset::from_meals(meals, skipped))
}

// -- JSON helpers --

fn json_f64(val: &JsonValue) -> Option<f64> {
    val.as_f64().filter(|v| v.is_finite())
}

fn json_string(val: Option<&JsonValue>) -> String {
    val.and_then(|v| v.as_str()).unwrap_or("").trim().to_string()
}

/// Tag fields come as a delimited string or an array of strings.
fn json_tags(val: Option<&JsonValue>, delimiter: char) -> BTreeSet<String> {
    match val {
        Some(JsonValue::String(s)) => parse_tags(s, delimiter),
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => BTreeSet::new(),
    }
}

// ---------------------------------------------------------------------------
// Field validation helpers
// ---------------------------------------------------------------------------

/// Below-floor prices become unknown, not zero and not an excluded row.
fn normalize_price(price: Option<f64>, floor: f64) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p >= floor)
}

fn parse_calories(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|c| c.is_finite() && *c >= 0.0)
}

/// Empty means unrated (0.0); a present value must be within [0, 5].
fn parse_rating(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(0.0);
    }
    s.parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && (0.0..=5.0).contains(r))
}

/// Review counts exported through a float column ("12.0") still parse.
fn parse_count(s: &str) -> u32 {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u32)
        .unwrap_or(0)
}

fn parse_optional_f64(s: &str) -> Option<f64> {
    if s.is_empty() {
        None
    } else {
        s.parse::<f64>().ok()
    }
}

/// Pandas-style booleans: `True` / `False` alongside `true` / `1`.
fn parse_bool(s: &str) -> bool {
    matches!(s, "true" | "True" | "TRUE" | "1")
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
