//! Prescriber facade: catalog lookup, interaction discovery and prescribing.

use log::info;

use crate::cancel::CancelToken;
use crate::config::PrescriberConfig;
use crate::db::SqliteReferenceStore;
use crate::engine::InteractionEngine;
use crate::models::{Allergy, Drug, DrugInteraction, Patient};
use crate::PrescriberError;

/// Gathers what is needed to make a prescription against a reference dataset.
pub struct Prescriber {
    config: PrescriberConfig,
    engine: InteractionEngine<SqliteReferenceStore>,
}

impl Prescriber {
    /// Validate `config` and open the reference dataset it names.
    pub fn open(config: PrescriberConfig) -> Result<Self, PrescriberError> {
        config.validate()?;
        let store = SqliteReferenceStore::open(&config.database_path, config.query_timeout())?;
        info!(
            "event=prescriber_open module=prescriber status=ok path={} page_size={} timeout_ms={}",
            config.database_path.display(),
            config.page_size,
            config.query_timeout_ms
        );
        Ok(Self {
            config,
            engine: InteractionEngine::new(store),
        })
    }

    pub fn config(&self) -> &PrescriberConfig {
        &self.config
    }

    pub fn engine(&self) -> &InteractionEngine<SqliteReferenceStore> {
        &self.engine
    }

    /// All drugs whose label name contains `pattern`.
    pub fn query_drugs(&self, pattern: &str) -> Result<Vec<Drug>, PrescriberError> {
        Ok(self.engine.store().session()?.query_drugs(pattern)?)
    }

    /// One page of [`Prescriber::query_drugs`], `page_size` rows per page.
    pub fn query_drugs_page(&self, pattern: &str, page: u32) -> Result<Vec<Drug>, PrescriberError> {
        Ok(self
            .engine
            .store()
            .session()?
            .query_drugs_page(pattern, page, self.config.page_size)?)
    }

    /// Allergen groups whose description starts with `prefix`.
    pub fn query_allergies(&self, prefix: &str) -> Result<Vec<Allergy>, PrescriberError> {
        Ok(self.engine.store().session()?.query_allergies(prefix)?)
    }

    pub fn find_interactions(
        &self,
        drug: &Drug,
        patient: &Patient,
    ) -> Result<Vec<DrugInteraction>, PrescriberError> {
        Ok(self.engine.find_interactions(drug, patient)?)
    }

    pub fn find_interactions_with_cancel(
        &self,
        drug: &Drug,
        patient: &Patient,
        cancel: &CancelToken,
    ) -> Result<Vec<DrugInteraction>, PrescriberError> {
        Ok(self.engine.find_interactions_with_cancel(drug, patient, cancel)?)
    }

    pub fn food_interactions(&self, drug: &Drug) -> Result<Vec<DrugInteraction>, PrescriberError> {
        Ok(self.engine.food_interactions(drug)?)
    }

    pub fn allergy_interactions(
        &self,
        drug: &Drug,
        patient: &Patient,
    ) -> Result<Vec<DrugInteraction>, PrescriberError> {
        Ok(self.engine.allergy_interactions(drug, patient)?)
    }

    pub fn drug_interactions(
        &self,
        drug: &Drug,
        patient: &Patient,
    ) -> Result<Vec<DrugInteraction>, PrescriberError> {
        Ok(self.engine.drug_interactions(drug, patient)?)
    }

    /// Add `drug` to the patient's prescriptions. Returns `false` if it was
    /// already prescribed.
    pub fn prescribe_drug(&self, drug: Drug, patient: &mut Patient) -> bool {
        let drug_id = drug.id();
        let added = patient.add_drug(drug);
        info!(
            "event=prescribe module=prescriber patient={} drug={} added={}",
            patient.local_id, drug_id, added
        );
        added
    }
}
