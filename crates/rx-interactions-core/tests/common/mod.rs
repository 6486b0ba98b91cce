//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rx_interactions_core::db::{AllergyRow, DrugInteractionRow, FoodRow, StoreResult};
use rx_interactions_core::{
    CancelToken, Database, Drug, DrugInteraction, Prescriber, PrescriberConfig, QueryCategory,
    ReferenceStore, StoreError,
};
use tempfile::TempDir;

/// Label names are stored fixed width, like the reference export.
const REFERENCE_DATA: &str = r#"
INSERT INTO RLBLRCA1 VALUES (1, 'PHARMA INC'), (2, 'APOTEX');

INSERT INTO RGCNSEQ4 VALUES
    (100, 10), (200, 20), (300, 30), (400, 31), (500, 50), (600, 60);

INSERT INTO RICAIDC1 (DIN, LN, GCN_SEQNO, ILBLRID) VALUES
    (2100, 'PRENATAL/POSTPARTUM VIT/MIN             ', 100, 1),
    (2200, 'BIO BALANCED CALC/MAG TAB               ', 200, 1),
    (2300, 'CARDIOQUIN 275MG TABLET                 ', 300, 1),
    (2350, 'QUINIDINE SULFATE 200MG TAB             ', 300, 2),
    (2400, 'APO-QUIN-G 325 MG TABLET                ', 400, 2),
    (2500, 'ADDERALL XR 10 MG CAPSULE               ', 500, 1),
    (2600, 'TYLENOL WITH CODEINE ELIXIR             ', 600, 1);

INSERT INTO RADIMSL1 VALUES ('1', 'Contraindicated'), ('2', 'Moderate'), ('3', 'Minor');

INSERT INTO RADIMGC4 VALUES
    (100, 1001), (100, 1002), (200, 2001), (200, 2002),
    (300, 3001), (400, 4001), (500, 5001), (600, 6001);

INSERT INTO RADIMMA5 VALUES
    (1001, 7001, 'Multivitamins/Quinidine', '2'),
    (1002, 7002, 'Multivitamins/Calcium', '3'),
    (2001, 7001, 'Calcium/Multivitamins', '2'),
    (2002, 7002, 'Calcium/Multivitamins', '3'),
    (3001, 7001, 'Quinidine/Multivitamins', '2'),
    (4001, 7001, 'Quinidine/Multivitamins', '2'),
    (5001, 7005, 'Amphetamines/MAOIs', '1'),
    (6001, 7006, 'Opioids/CNS Depressants', '2');

INSERT INTO RADIMIE4 VALUES
    (1001, 'MIX'), (1002, 'DEC'), (2001, 'INC'), (2002, 'INC'),
    (3001, 'INC'), (4001, 'INC'), (5001, 'HTN'), (6001, 'CNS');

INSERT INTO RADIMEF0 VALUES
    ('MIX', 'Mixed effects of the latter drug        '),
    ('DEC', 'Decreased effect of the former drug     '),
    ('INC', 'Increased effect of the latter drug     '),
    ('HTN', 'Hypertensive crisis                     '),
    ('CNS', 'Additive CNS depression                 ');

INSERT INTO RDFIMMA0 VALUES
    (1, 'Take with food to reduce stomach upset  '),
    (2, 'Avoid grapefruit juice                  '),
    (3, 'Avoid alcohol                           ');
INSERT INTO RDFIMGC0 VALUES (100, 1), (300, 2), (600, 3);

INSERT INTO RDAMAGD1 VALUES
    (900, 'Quinine Derivatives           '),
    (901, 'Opioid Analgesics             '),
    (902, 'Penicillins                   ');
INSERT INTO RDAMGHC0 VALUES (900, 50), (901, 60);
INSERT INTO RHICL1 VALUES (30, 50, 'Q1A'), (31, 50, 'Q1A'), (60, 60, 'H3A');
INSERT INTO RHICD5 VALUES (50, 'quinidine'), (60, 'codeine');
"#;

/// A reference dataset in a temporary file.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reference.sqlite");
        let db = Database::open(&path).unwrap();
        db.conn().execute_batch(REFERENCE_DATA).unwrap();
        Self { _dir: dir, path }
    }

    pub fn prescriber(&self) -> Prescriber {
        Prescriber::open(PrescriberConfig::for_database(&self.path)).unwrap()
    }
}

/// First drug whose name contains `name`.
pub fn drug(prescriber: &Prescriber, name: &str) -> Drug {
    prescriber
        .query_drugs(name)
        .unwrap()
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no drug named {}", name))
}

/// Count interactions, ignoring order.
pub fn multiset(interactions: &[DrugInteraction]) -> HashMap<DrugInteraction, usize> {
    let mut counts = HashMap::new();
    for interaction in interactions {
        *counts.entry(interaction.clone()).or_insert(0) += 1;
    }
    counts
}

/// In-memory store with per-branch delays and optional failure.
pub struct MockStore {
    pub food: Vec<FoodRow>,
    pub allergy: Vec<AllergyRow>,
    pub drug: Vec<DrugInteractionRow>,
    pub delays: [Duration; 3],
    pub fail: Option<QueryCategory>,
    pub food_calls: AtomicUsize,
    pub allergy_calls: AtomicUsize,
    pub drug_calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            food: vec![FoodRow {
                result: "Avoid alcohol   ".into(),
            }],
            allergy: vec![AllergyRow {
                ingredient_id: 30,
                hic_seqn: 50,
                hic: Some("Q1A".into()),
                hic_desc: Some("quinidine".into()),
                allergen_code: 900,
                allergen_desc: Some("Quinine Derivatives".into()),
            }],
            drug: vec![
                DrugInteractionRow {
                    target_id: 2200,
                    effect: "Decreased effect of the former drug".into(),
                },
                DrugInteractionRow {
                    target_id: 2200,
                    effect: "Mixed effects of the latter drug".into(),
                },
                DrugInteractionRow {
                    target_id: 2300,
                    effect: "Increased effect of the latter drug".into(),
                },
                DrugInteractionRow {
                    target_id: 2400,
                    effect: "Mixed effects of the latter drug".into(),
                },
            ],
            delays: [Duration::ZERO; 3],
            fail: None,
            food_calls: AtomicUsize::new(0),
            allergy_calls: AtomicUsize::new(0),
            drug_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delays(mut self, delays: [Duration; 3]) -> Self {
        self.delays = delays;
        self
    }

    pub fn failing(mut self, category: QueryCategory) -> Self {
        self.fail = Some(category);
        self
    }

    fn pause(&self, category: QueryCategory, delay: Duration, cancel: &CancelToken) -> StoreResult<()> {
        let start = Instant::now();
        while start.elapsed() < delay {
            if cancel.is_cancelled() {
                return Err(StoreError::Cancelled { category });
            }
            thread::sleep(Duration::from_millis(1));
        }
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled { category });
        }
        if self.fail == Some(category) {
            return Err(StoreError::query(category, rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }
}

impl ReferenceStore for MockStore {
    fn food_rows(&self, _drug: &Drug, cancel: &CancelToken) -> StoreResult<Vec<FoodRow>> {
        self.food_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(QueryCategory::FoodInteractions, self.delays[0], cancel)?;
        Ok(self.food.clone())
    }

    fn allergy_rows(
        &self,
        _drug: &Drug,
        allergen_codes: &[i64],
        cancel: &CancelToken,
    ) -> StoreResult<Vec<AllergyRow>> {
        self.allergy_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(QueryCategory::AllergyInteractions, self.delays[1], cancel)?;
        Ok(self
            .allergy
            .iter()
            .filter(|row| allergen_codes.contains(&row.allergen_code))
            .cloned()
            .collect())
    }

    fn drug_rows(
        &self,
        _drug: &Drug,
        _ingredient_ids: &[i64],
        _drug_ids: &[i64],
        cancel: &CancelToken,
    ) -> StoreResult<Vec<DrugInteractionRow>> {
        self.drug_calls.fetch_add(1, Ordering::SeqCst);
        self.pause(QueryCategory::DrugInteractions, self.delays[2], cancel)?;
        Ok(self.drug.clone())
    }
}
