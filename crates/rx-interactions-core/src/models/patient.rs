//! Patient models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Allergy, Drug};

/// A patient being prescribed to.
///
/// Prescribed drugs are kept in a `BTreeSet`, so iteration is always in
/// ascending drug id order with duplicate ids collapsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Local UUID, used to correlate log lines
    pub local_id: String,
    drugs: BTreeSet<Drug>,
    allergies: Vec<Allergy>,
}

impl Patient {
    /// Create a patient with no drugs and no allergies.
    pub fn new() -> Self {
        Self {
            local_id: uuid::Uuid::new_v4().to_string(),
            drugs: BTreeSet::new(),
            allergies: Vec::new(),
        }
    }

    /// Add a drug to the prescribed set.
    ///
    /// Returns `false` if a drug with the same id was already prescribed.
    pub fn add_drug(&mut self, drug: Drug) -> bool {
        self.drugs.insert(drug)
    }

    /// Record an allergy. Returns `false` if the allergen code is already known.
    pub fn add_allergy(&mut self, allergy: Allergy) -> bool {
        if self.allergies.iter().any(|a| a.code() == allergy.code()) {
            return false;
        }
        self.allergies.push(allergy);
        true
    }

    pub fn prescribed_drugs(&self) -> &BTreeSet<Drug> {
        &self.drugs
    }

    pub fn allergies(&self) -> &[Allergy] {
        &self.allergies
    }

    /// Allergen-group codes in insertion order.
    pub fn allergy_codes(&self) -> Vec<i64> {
        self.allergies.iter().map(Allergy::code).collect()
    }
}

impl Default for Patient {
    fn default() -> Self {
        Self::new()
    }
}
