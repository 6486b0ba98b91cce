//! Row-to-interaction conversion.

use crate::db::{AllergyRow, DrugInteractionRow, FoodRow};
use crate::models::{Allergy, Drug, DrugInteraction};

/// Food interaction for the drug being prescribed.
pub fn food_interaction(drug: &Drug, row: &FoodRow) -> DrugInteraction {
    DrugInteraction::drug_to_food(drug.clone(), &row.result)
}

/// Allergy interaction, rebuilding the allergy from the matched allergen group.
pub fn allergy_interaction(drug: &Drug, row: &AllergyRow) -> DrugInteraction {
    let name = row
        .allergen_desc
        .as_deref()
        .or(row.hic_desc.as_deref())
        .unwrap_or_default();
    let allergy = Allergy::new(row.allergen_code, name);
    DrugInteraction::drug_to_allergy(allergy, drug.clone())
}

/// Drug-to-drug interaction for a merge-join match.
pub fn drug_to_drug_interaction(
    drug: &Drug,
    other: &Drug,
    row: &DrugInteractionRow,
) -> DrugInteraction {
    DrugInteraction::drug_to_drug(drug.clone(), other.clone(), &row.effect)
}
