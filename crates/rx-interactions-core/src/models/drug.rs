//! Drug models.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize};

/// A drug from the reference dataset.
///
/// Identity is the drug identification number alone: two `Drug` values built
/// from different rows compare equal when their `id` matches. The ordering by
/// `id` is what the drug-to-drug merge-join walks.
#[derive(Debug, Clone, Serialize)]
pub struct Drug {
    /// Unique drug identification number (DIN)
    id: i64,
    /// Ingredient-class identifier (HICL_SEQNO)
    ingredient_id: i64,
    /// Ingredient sequence identifier (GCN_SEQNO)
    gcn_seqno: i64,
    /// Label name, trimmed
    name: String,
}

impl Drug {
    /// Create a drug. The label name is trimmed of fixed-width padding.
    pub fn new(id: i64, ingredient_id: i64, gcn_seqno: i64, name: &str) -> Self {
        Self {
            id,
            ingredient_id,
            gcn_seqno,
            name: name.trim().to_string(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn ingredient_id(&self) -> i64 {
        self.ingredient_id
    }

    pub fn gcn_seqno(&self) -> i64 {
        self.gcn_seqno
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<'de> Deserialize<'de> for Drug {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Record {
            id: i64,
            ingredient_id: i64,
            gcn_seqno: i64,
            name: String,
        }

        let record = Record::deserialize(deserializer)?;
        Ok(Drug::new(
            record.id,
            record.ingredient_id,
            record.gcn_seqno,
            &record.name,
        ))
    }
}

impl PartialEq for Drug {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Drug {}

impl PartialOrd for Drug {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Drug {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Drug {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
