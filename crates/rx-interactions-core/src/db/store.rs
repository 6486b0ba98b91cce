//! The reference store seam used by the interaction engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;

use super::{AllergyRow, Database, DrugInteractionRow, FoodRow, QueryCategory, StoreResult};
use crate::cancel::CancelToken;
use crate::models::Drug;

/// Source of interaction rows.
///
/// Implementations are called from several threads at once, one call per
/// query branch. Each call must honour `cancel` and return
/// [`StoreError::Cancelled`](super::StoreError::Cancelled) once it observes it.
pub trait ReferenceStore: Send + Sync {
    /// Food interactions of `drug`.
    fn food_rows(&self, drug: &Drug, cancel: &CancelToken) -> StoreResult<Vec<FoodRow>>;

    /// Allergy interactions between `drug` and the given allergen groups.
    fn allergy_rows(
        &self,
        drug: &Drug,
        allergen_codes: &[i64],
        cancel: &CancelToken,
    ) -> StoreResult<Vec<AllergyRow>>;

    /// Drug-to-drug interactions between `drug` and other drugs, sorted
    /// ascending by `target_id`.
    fn drug_rows(
        &self,
        drug: &Drug,
        ingredient_ids: &[i64],
        drug_ids: &[i64],
        cancel: &CancelToken,
    ) -> StoreResult<Vec<DrugInteractionRow>>;
}

/// [`ReferenceStore`] over a SQLite reference file.
///
/// Every call opens its own read-only connection, so concurrent branches
/// never share a session.
#[derive(Debug, Clone)]
pub struct SqliteReferenceStore {
    path: PathBuf,
    query_timeout: Duration,
}

impl SqliteReferenceStore {
    /// Open a store, checking the file is readable and has the expected tables.
    pub fn open<P: AsRef<Path>>(path: P, query_timeout: Duration) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        Database::open_read_only(&path)?.verify_schema()?;
        Ok(Self {
            path,
            query_timeout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Check out a fresh read-only connection.
    pub fn session(&self) -> StoreResult<Database> {
        Database::open_read_only(&self.path)
    }

    fn run<T>(
        &self,
        category: QueryCategory,
        cancel: &CancelToken,
        query: impl FnOnce(&Database) -> rusqlite::Result<T>,
    ) -> StoreResult<T> {
        debug!("event=query_start module=store category={}", category);
        let db = self.session()?;
        db.guarded(category, cancel, self.query_timeout, query)
    }
}

impl ReferenceStore for SqliteReferenceStore {
    fn food_rows(&self, drug: &Drug, cancel: &CancelToken) -> StoreResult<Vec<FoodRow>> {
        self.run(QueryCategory::FoodInteractions, cancel, |db| {
            db.food_interaction_rows(drug.gcn_seqno())
        })
    }

    fn allergy_rows(
        &self,
        drug: &Drug,
        allergen_codes: &[i64],
        cancel: &CancelToken,
    ) -> StoreResult<Vec<AllergyRow>> {
        self.run(QueryCategory::AllergyInteractions, cancel, |db| {
            db.allergy_interaction_rows(drug.ingredient_id(), allergen_codes)
        })
    }

    fn drug_rows(
        &self,
        drug: &Drug,
        ingredient_ids: &[i64],
        drug_ids: &[i64],
        cancel: &CancelToken,
    ) -> StoreResult<Vec<DrugInteractionRow>> {
        self.run(QueryCategory::DrugInteractions, cancel, |db| {
            db.drug_interaction_rows(drug.ingredient_id(), ingredient_ids, drug_ids)
        })
    }
}
