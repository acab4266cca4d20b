use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Result;

use crate::data::filter::{filtered_indices, FilterParams};
use crate::data::loader::{load_file, LoadOptions};
use crate::data::model::MealDataset;
use crate::error::ConfigError;
use crate::rank::{rank_by_score, rank_by_value, RankedMeal, ValueFilters, ValueMeal};
use crate::score::{score_table, ScoreParams};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// One ranking request: score parameters plus filter state.
///
/// Two queries are "the same request" exactly when they compare equal; the
/// session uses that to decide whether the cached pipeline output applies.
#[derive(Debug, Clone, PartialEq)]
pub struct RankQuery {
    pub score: ScoreParams,
    pub filter: FilterParams,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The backing file changes rarely; reload at most once an hour unless the
/// mtime moves.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cached score + filter output for the most recent query.
struct Memo {
    query: RankQuery,
    scores: Vec<f64>,
    indices: Vec<usize>,
}

/// Owns a loaded dataset and serves ranking requests against it.
///
/// The table is read-only shared state after load; every request is a short
/// synchronous score → filter → rank pass with no I/O. Repeating the exact
/// same query reuses the cached score/filter output.
pub struct Session {
    path: PathBuf,
    options: LoadOptions,
    ttl: Duration,
    loaded_at: SystemTime,
    mtime: Option<SystemTime>,
    dataset: MealDataset,
    memo: Option<Memo>,
}

impl Session {
    /// Load the source file once and keep the table in memory.
    pub fn open(path: &Path, options: LoadOptions) -> Result<Self> {
        let dataset = load_file(path, &options)?;
        Ok(Session {
            path: path.to_path_buf(),
            options,
            ttl: DEFAULT_TTL,
            loaded_at: SystemTime::now(),
            mtime: file_mtime(path),
            dataset,
            memo: None,
        })
    }

    /// Override the staleness window (mostly for tests and long-running
    /// shells).
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn source(&self) -> &Path {
        &self.path
    }

    pub fn dataset(&self) -> &MealDataset {
        &self.dataset
    }

    /// Default score parameters for the loaded table.
    pub fn default_score_params(&self) -> ScoreParams {
        ScoreParams::for_dataset(&self.dataset)
    }

    /// Reload when the staleness window elapsed or the file's mtime moved.
    /// Returns whether a reload happened; a reload drops the pipeline cache.
    pub fn refresh(&mut self) -> Result<bool> {
        let expired = self
            .loaded_at
            .elapsed()
            .map_or(true, |elapsed| elapsed >= self.ttl);
        let mtime = file_mtime(&self.path);
        if !expired && mtime == self.mtime {
            return Ok(false);
        }

        self.dataset = load_file(&self.path, &self.options)?;
        self.loaded_at = SystemTime::now();
        self.mtime = mtime;
        self.memo = None;
        log::info!("Reloaded {}", self.path.display());
        Ok(true)
    }

    /// Rating rank: score, filter, then stable-sort by smoothed score.
    pub fn rank(&mut self, query: &RankQuery) -> Result<Vec<RankedMeal<'_>>, ConfigError> {
        self.run_pipeline(query)?;
        let Some(memo) = &self.memo else {
            return Ok(Vec::new());
        };
        Ok(rank_by_score(&self.dataset, &memo.scores, &memo.indices))
    }

    /// Value rank over the same filtered subset, with the extra thresholds
    /// applied before ranking.
    pub fn value_rank(
        &mut self,
        query: &RankQuery,
        filters: &ValueFilters,
    ) -> Result<Vec<ValueMeal<'_>>, ConfigError> {
        self.run_pipeline(query)?;
        let Some(memo) = &self.memo else {
            return Ok(Vec::new());
        };
        Ok(rank_by_value(
            &self.dataset,
            &memo.scores,
            &memo.indices,
            filters,
        ))
    }

    /// Recompute the score column and filtered indices unless the cached
    /// output already answers this exact query.
    fn run_pipeline(&mut self, query: &RankQuery) -> Result<(), ConfigError> {
        if self.memo.as_ref().is_some_and(|m| m.query == *query) {
            log::debug!("pipeline cache hit");
            return Ok(());
        }
        let scores = score_table(&self.dataset, &query.score);
        let indices = filtered_indices(&self.dataset, &query.filter)?;
        self.memo = Some(Memo {
            query: query.clone(),
            scores,
            indices,
        });
        Ok(())
    }
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
