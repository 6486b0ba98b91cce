//! Allergy models.

use serde::{Deserialize, Deserializer, Serialize};

/// An allergen group from the reference dataset.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct Allergy {
    /// Allergen-group code (DAM_ALRGN_GRP)
    code: i64,
    /// Allergen-group description, trimmed
    name: String,
}

impl Allergy {
    pub fn new(code: i64, name: &str) -> Self {
        Self {
            code,
            name: name.trim().to_string(),
        }
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<'de> Deserialize<'de> for Allergy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Record {
            code: i64,
            name: String,
        }

        let record = Record::deserialize(deserializer)?;
        Ok(Allergy::new(record.code, &record.name))
    }
}
