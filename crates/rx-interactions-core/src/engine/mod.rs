//! Interaction discovery engine.
//!
//! Pipeline: Candidate set → three concurrent queries (food, allergy,
//! drug-to-drug) → merge-join for drug-to-drug rows → typed interactions.
//!
//! # Failure policy
//!
//! Fail-fast. The first branch to fail trips the shared [`CancelToken`], the
//! other branches stop at their next cancellation check, and the caller gets
//! that first error. A partial list is never returned.

mod assembler;
mod candidates;
mod fanout;
mod merge;

pub use assembler::*;
pub use candidates::*;
pub use merge::*;

use log::{debug, info};
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::db::{QueryCategory, ReferenceStore, StoreError, StoreResult};
use crate::models::{Drug, DrugInteraction, Patient};

use fanout::Branch;

/// Engine errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0} worker panicked")]
    WorkerPanicked(QueryCategory),
}

impl EngineError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, EngineError::Store(err) if err.is_cancellation())
    }

    /// Category of the query branch that failed.
    pub fn category(&self) -> Option<QueryCategory> {
        match self {
            EngineError::Store(err) => err.category(),
            EngineError::WorkerPanicked(category) => Some(*category),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Finds interactions for a drug being prescribed.
pub struct InteractionEngine<S> {
    store: S,
}

impl<S: ReferenceStore> InteractionEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All food, allergy and drug-to-drug interactions of `drug` for
    /// `patient`, queried concurrently.
    ///
    /// Interactions are grouped food, then allergy, then drug-to-drug; the
    /// drug-to-drug group is ascending by the other drug's id.
    pub fn find_interactions(
        &self,
        drug: &Drug,
        patient: &Patient,
    ) -> EngineResult<Vec<DrugInteraction>> {
        self.find_interactions_with_cancel(drug, patient, &CancelToken::new())
    }

    /// [`InteractionEngine::find_interactions`] with a caller-held token that
    /// can abort all three branches.
    pub fn find_interactions_with_cancel(
        &self,
        drug: &Drug,
        patient: &Patient,
        cancel: &CancelToken,
    ) -> EngineResult<Vec<DrugInteraction>> {
        let branches = vec![
            Branch::new(QueryCategory::FoodInteractions, |cancel: &CancelToken| {
                self.food_branch(drug, cancel)
            }),
            Branch::new(QueryCategory::AllergyInteractions, |cancel: &CancelToken| {
                self.allergy_branch(drug, patient, cancel)
            }),
            Branch::new(QueryCategory::DrugInteractions, |cancel: &CancelToken| {
                self.drug_branch(drug, patient, cancel)
            }),
        ];

        let interactions = fanout::run_all(branches, cancel)?;
        info!(
            "event=find_interactions module=engine status=ok patient={} drug={} interactions={}",
            patient.local_id,
            drug.id(),
            interactions.len()
        );
        Ok(interactions)
    }

    /// Foods that interact badly with `drug`.
    pub fn food_interactions(&self, drug: &Drug) -> EngineResult<Vec<DrugInteraction>> {
        Ok(self.food_branch(drug, &CancelToken::new())?)
    }

    /// Patient allergies triggered by `drug`.
    pub fn allergy_interactions(
        &self,
        drug: &Drug,
        patient: &Patient,
    ) -> EngineResult<Vec<DrugInteraction>> {
        Ok(self.allergy_branch(drug, patient, &CancelToken::new())?)
    }

    /// Interactions between `drug` and the drugs `patient` already takes.
    pub fn drug_interactions(
        &self,
        drug: &Drug,
        patient: &Patient,
    ) -> EngineResult<Vec<DrugInteraction>> {
        Ok(self.drug_branch(drug, patient, &CancelToken::new())?)
    }

    fn food_branch(&self, drug: &Drug, cancel: &CancelToken) -> StoreResult<Vec<DrugInteraction>> {
        let rows = self.store.food_rows(drug, cancel)?;
        Ok(rows.iter().map(|row| food_interaction(drug, row)).collect())
    }

    fn allergy_branch(
        &self,
        drug: &Drug,
        patient: &Patient,
        cancel: &CancelToken,
    ) -> StoreResult<Vec<DrugInteraction>> {
        if patient.allergies().is_empty() {
            debug!(
                "event=allergy_query module=engine status=skipped reason=no_allergies patient={}",
                patient.local_id
            );
            return Ok(Vec::new());
        }
        let rows = self
            .store
            .allergy_rows(drug, &patient.allergy_codes(), cancel)?;
        Ok(rows.iter().map(|row| allergy_interaction(drug, row)).collect())
    }

    fn drug_branch(
        &self,
        drug: &Drug,
        patient: &Patient,
        cancel: &CancelToken,
    ) -> StoreResult<Vec<DrugInteraction>> {
        let candidates = CandidateSet::from_patient(patient);
        if candidates.is_empty() {
            debug!(
                "event=drug_query module=engine status=skipped reason=no_prescriptions patient={}",
                patient.local_id
            );
            return Ok(Vec::new());
        }
        debug!(
            "event=drug_query module=engine status=start drug={} ingredients=[{}] drugs=[{}]",
            drug.id(),
            candidates.joined_ingredient_ids(),
            candidates.joined_drug_ids()
        );

        let rows = self.store.drug_rows(
            drug,
            &candidates.ingredient_ids(),
            &candidates.drug_ids(),
            cancel,
        )?;
        Ok(merge_join(candidates.drugs(), &rows)
            .into_iter()
            .map(|(other, row)| drug_to_drug_interaction(drug, other, row))
            .collect())
    }
}
