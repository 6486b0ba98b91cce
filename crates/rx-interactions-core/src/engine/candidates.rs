//! Candidate set: the drugs a patient already takes, prepared for the
//! drug-to-drug lookup.

use crate::models::{Drug, Patient};

/// Prescribed drugs sorted ascending by id with duplicate ids removed, plus
/// the two join keys the drug-to-drug query needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSet {
    drugs: Vec<Drug>,
}

impl CandidateSet {
    /// Build from the patient's prescribed drugs.
    pub fn from_patient(patient: &Patient) -> Self {
        Self::from_drugs(patient.prescribed_drugs().iter().cloned())
    }

    /// Build from drugs in any order.
    pub fn from_drugs<I: IntoIterator<Item = Drug>>(drugs: I) -> Self {
        let mut drugs: Vec<Drug> = drugs.into_iter().collect();
        drugs.sort();
        drugs.dedup();
        Self { drugs }
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    /// Drugs in ascending id order.
    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    /// Ingredient-class ids, in the same order as [`CandidateSet::drugs`].
    pub fn ingredient_ids(&self) -> Vec<i64> {
        self.drugs.iter().map(Drug::ingredient_id).collect()
    }

    /// Drug ids, ascending.
    pub fn drug_ids(&self) -> Vec<i64> {
        self.drugs.iter().map(Drug::id).collect()
    }

    /// Comma-joined ingredient-class ids, for diagnostics.
    pub fn joined_ingredient_ids(&self) -> String {
        join(&self.ingredient_ids())
    }

    /// Comma-joined drug ids, for diagnostics.
    pub fn joined_drug_ids(&self) -> String {
        join(&self.drug_ids())
    }
}

fn join(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
