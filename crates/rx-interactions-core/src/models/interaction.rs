//! Interaction models.

use std::fmt;

use serde::Serialize;

use super::{Allergy, Drug};

/// Category of an interaction.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    DrugToDrug,
    DrugToFood,
    DrugToAllergy,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InteractionKind::DrugToDrug => "drug-to-drug",
            InteractionKind::DrugToFood => "drug-to-food",
            InteractionKind::DrugToAllergy => "drug-to-allergy",
        };
        f.write_str(label)
    }
}

/// Who takes part in an interaction.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Participants {
    /// The drug being prescribed and a drug the patient already takes.
    DrugToDrug { drug: Drug, other: Drug },
    /// The drug being prescribed and a food it reacts with.
    DrugToFood { drug: Drug, food: String },
    /// A patient allergy triggered by the drug being prescribed.
    DrugToAllergy { allergy: Allergy, drug: Drug },
}

/// A harmful interaction found for a drug being prescribed.
///
/// Built only by the interaction assembler from query rows; there is no
/// public constructor and no mutation after construction.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct DrugInteraction {
    participants: Participants,
    description: String,
}

impl DrugInteraction {
    pub(crate) fn drug_to_drug(drug: Drug, other: Drug, effect: &str) -> Self {
        let description = format!("{} {} {}", drug.name(), effect.trim(), other.name());
        Self {
            participants: Participants::DrugToDrug { drug, other },
            description,
        }
    }

    pub(crate) fn drug_to_food(drug: Drug, food: &str) -> Self {
        let food = food.trim().to_string();
        Self {
            description: food.clone(),
            participants: Participants::DrugToFood { drug, food },
        }
    }

    pub(crate) fn drug_to_allergy(allergy: Allergy, drug: Drug) -> Self {
        let description = format!("{} triggers allergy {}", drug.name(), allergy.name());
        Self {
            participants: Participants::DrugToAllergy { allergy, drug },
            description,
        }
    }

    pub fn kind(&self) -> InteractionKind {
        match self.participants {
            Participants::DrugToDrug { .. } => InteractionKind::DrugToDrug,
            Participants::DrugToFood { .. } => InteractionKind::DrugToFood,
            Participants::DrugToAllergy { .. } => InteractionKind::DrugToAllergy,
        }
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    /// Human-readable description of the interaction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The drug being prescribed.
    pub fn drug(&self) -> &Drug {
        match &self.participants {
            Participants::DrugToDrug { drug, .. }
            | Participants::DrugToFood { drug, .. }
            | Participants::DrugToAllergy { drug, .. } => drug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prenatal() -> Drug {
        Drug::new(2100, 10, 100, "PRENATAL/POSTPARTUM VIT/MIN")
    }

    #[test]
    fn test_drug_to_drug_description() {
        let other = Drug::new(2300, 30, 300, "CARDIOQUIN 275MG TABLET");
        let interaction =
            DrugInteraction::drug_to_drug(prenatal(), other, "Mixed effects of the latter drug   ");

        assert_eq!(interaction.kind(), InteractionKind::DrugToDrug);
        assert_eq!(
            interaction.description(),
            "PRENATAL/POSTPARTUM VIT/MIN Mixed effects of the latter drug CARDIOQUIN 275MG TABLET"
        );
        assert_eq!(interaction.drug().id(), 2100);
    }

    #[test]
    fn test_food_description_is_trimmed() {
        let interaction = DrugInteraction::drug_to_food(prenatal(), "Avoid dairy   ");
        assert_eq!(interaction.kind(), InteractionKind::DrugToFood);
        assert_eq!(interaction.description(), "Avoid dairy");
        match interaction.participants() {
            Participants::DrugToFood { food, .. } => assert_eq!(food, "Avoid dairy"),
            other => panic!("unexpected participants: {:?}", other),
        }
    }

    #[test]
    fn test_allergy_description() {
        let allergy = Allergy::new(900, "Quinine Derivatives");
        let drug = Drug::new(2300, 30, 300, "CARDIOQUIN 275MG TABLET");
        let interaction = DrugInteraction::drug_to_allergy(allergy, drug);
        assert_eq!(interaction.kind(), InteractionKind::DrugToAllergy);
        assert_eq!(
            interaction.description(),
            "CARDIOQUIN 275MG TABLET triggers allergy Quinine Derivatives"
        );
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let interaction = DrugInteraction::drug_to_food(prenatal(), "Avoid dairy");
        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["participants"]["kind"], "drug_to_food");
        assert_eq!(json["description"], "Avoid dairy");
    }
}
