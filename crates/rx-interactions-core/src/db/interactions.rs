//! Interaction queries against the reference dataset.
//!
//! Variable-length key lists are bound through the `rarray()` table-valued
//! function, so no caller-supplied value is ever spliced into SQL text.

use std::rc::Rc;

use rusqlite::types::Value;
use rusqlite::vtab::array::Array;
use rusqlite::params;

use super::Database;

/// A food interaction row.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRow {
    /// Interaction result text, fixed width
    pub result: String,
}

/// An allergy interaction row.
#[derive(Debug, Clone, PartialEq)]
pub struct AllergyRow {
    pub ingredient_id: i64,
    pub hic_seqn: i64,
    pub hic: Option<String>,
    pub hic_desc: Option<String>,
    /// Allergen-group code matched
    pub allergen_code: i64,
    /// Allergen-group description, fixed width
    pub allergen_desc: Option<String>,
}

/// A drug-to-drug interaction row: "the drug being prescribed interacts with
/// drug `target_id` with this effect".
#[derive(Debug, Clone, PartialEq)]
pub struct DrugInteractionRow {
    pub target_id: i64,
    /// Clinical effect text, fixed width
    pub effect: String,
}

const FOOD_INTERACTIONS_SQL: &str = r#"
    SELECT DISTINCT t2.RESULT
    FROM RDFIMGC0 AS t1
    JOIN RDFIMMA0 AS t2 ON (t1.FDCDE = t2.FDCDE)
    WHERE t1.GCN_SEQNO = ?1
    ORDER BY t2.RESULT
"#;

const ALLERGY_INTERACTIONS_SQL: &str = r#"
    SELECT t3.HICL_SEQNO, t3.HIC_SEQN, t3.HIC, t4.HIC_DESC,
           t1.DAM_ALRGN_GRP, t2.DAM_ALRGN_GRP_DESC
    FROM RDAMGHC0 AS t1
    LEFT JOIN RDAMAGD1 AS t2 ON (t1.DAM_ALRGN_GRP = t2.DAM_ALRGN_GRP)
    LEFT JOIN RHICL1 AS t3 ON (t1.HIC_SEQN = t3.HIC_SEQN)
    LEFT JOIN RHICD5 AS t4 ON (t3.HIC_SEQN = t4.HIC_SEQN)
    WHERE t3.HICL_SEQNO = ?1
      AND t1.DAM_ALRGN_GRP IN rarray(?2)
    ORDER BY t1.DAM_ALRGN_GRP, t3.HIC_SEQN
"#;

// Pairs every interaction code of the prescribed drug's ingredient class with
// the codes of the patient's drugs that share a monograph. Rows come back
// ordered by DIN, which the merge-join relies on.
const DRUG_INTERACTIONS_SQL: &str = r#"
    SELECT DISTINCT t2.DIN, f0.ADI_EFFTXT
    FROM (
        SELECT DISTINCT gcn.HICL_SEQNO AS HICL1, c4.DDI_CODEX AS CODEX1,
                        a5.DDI_MONOX AS MONOX1, a5.DDI_SL AS SL1
        FROM RGCNSEQ4 AS gcn
        JOIN RADIMGC4 AS c4 ON (gcn.GCN_SEQNO = c4.GCN_SEQNO)
        JOIN RADIMMA5 AS a5 ON (c4.DDI_CODEX = a5.DDI_CODEX)
        WHERE gcn.HICL_SEQNO = ?1
    ) AS t1
    CROSS JOIN (
        SELECT DISTINCT gcn.HICL_SEQNO AS HICL2, ric.DIN AS DIN,
                        c4.DDI_CODEX AS CODEX2, a5.DDI_MONOX AS MONOX2
        FROM RGCNSEQ4 AS gcn
        LEFT JOIN RICAIDC1 AS ric ON (ric.GCN_SEQNO = gcn.GCN_SEQNO)
        LEFT JOIN RADIMGC4 AS c4 ON (gcn.GCN_SEQNO = c4.GCN_SEQNO)
        LEFT JOIN RADIMMA5 AS a5 ON (c4.DDI_CODEX = a5.DDI_CODEX)
        WHERE gcn.HICL_SEQNO IN rarray(?2)
          AND ric.DIN IN rarray(?3)
    ) AS t2
    JOIN RADIMIE4 AS e4 ON (t1.CODEX1 = e4.DDI_CODEX)
    JOIN RADIMEF0 AS f0 ON (e4.ADI_EFFTC = f0.ADI_EFFTC)
    JOIN RADIMSL1 AS l1 ON (t1.SL1 = l1.DDI_SL)
    WHERE t1.MONOX1 = t2.MONOX2
      AND t1.CODEX1 != t2.CODEX2
    ORDER BY t2.DIN, f0.ADI_EFFTXT
"#;

impl Database {
    /// Food interactions for an ingredient sequence.
    pub(crate) fn food_interaction_rows(&self, gcn_seqno: i64) -> rusqlite::Result<Vec<FoodRow>> {
        let mut stmt = self.conn.prepare_cached(FOOD_INTERACTIONS_SQL)?;
        let rows = stmt.query_map([gcn_seqno], |row| {
            Ok(FoodRow {
                result: row.get(0)?,
            })
        })?;
        rows.collect()
    }

    /// Allergy interactions between an ingredient class and allergen groups.
    pub(crate) fn allergy_interaction_rows(
        &self,
        ingredient_id: i64,
        allergen_codes: &[i64],
    ) -> rusqlite::Result<Vec<AllergyRow>> {
        let mut stmt = self.conn.prepare_cached(ALLERGY_INTERACTIONS_SQL)?;
        let rows = stmt.query_map(params![ingredient_id, id_array(allergen_codes)], |row| {
            Ok(AllergyRow {
                ingredient_id: row.get(0)?,
                hic_seqn: row.get(1)?,
                hic: row.get(2)?,
                hic_desc: row.get(3)?,
                allergen_code: row.get(4)?,
                allergen_desc: row.get(5)?,
            })
        })?;
        rows.collect()
    }

    /// Drug-to-drug interactions between an ingredient class and the given
    /// drugs, ordered ascending by target DIN.
    pub(crate) fn drug_interaction_rows(
        &self,
        ingredient_id: i64,
        other_ingredient_ids: &[i64],
        other_drug_ids: &[i64],
    ) -> rusqlite::Result<Vec<DrugInteractionRow>> {
        let mut stmt = self.conn.prepare_cached(DRUG_INTERACTIONS_SQL)?;
        let rows = stmt.query_map(
            params![
                ingredient_id,
                id_array(other_ingredient_ids),
                id_array(other_drug_ids),
            ],
            |row| {
                Ok(DrugInteractionRow {
                    target_id: row.get(0)?,
                    effect: row.get(1)?,
                })
            },
        )?;
        rows.collect()
    }
}

fn id_array(ids: &[i64]) -> Array {
    Rc::new(ids.iter().copied().map(Value::from).collect())
}
