//! Drug and allergy catalog lookups.

use rusqlite::params;

use super::{Database, QueryCategory, StoreError, StoreResult};
use crate::models::{Allergy, Drug};

const DRUG_SELECT: &str = r#"
    SELECT t1.LN, t3.HICL_SEQNO, t1.GCN_SEQNO, t1.DIN
    FROM RICAIDC1 AS t1
    JOIN RLBLRCA1 AS t2 ON (t1.ILBLRID = t2.ILBLRID)
    JOIN RGCNSEQ4 AS t3 ON (t1.GCN_SEQNO = t3.GCN_SEQNO)
    WHERE t1.LN LIKE ?1 ESCAPE '\'
    ORDER BY t1.LN, t1.DIN
"#;

impl Database {
    /// All drugs whose label name contains `pattern`, ordered by name.
    pub fn query_drugs(&self, pattern: &str) -> StoreResult<Vec<Drug>> {
        self.select_drugs(DRUG_SELECT, params![contains_pattern(pattern)])
            .map_err(|err| StoreError::query(QueryCategory::DrugLookup, err))
    }

    /// One page of [`Database::query_drugs`]; pages are numbered from zero.
    pub fn query_drugs_page(
        &self,
        pattern: &str,
        page: u32,
        page_size: u32,
    ) -> StoreResult<Vec<Drug>> {
        let sql = format!("{} LIMIT ?2 OFFSET ?3", DRUG_SELECT);
        let offset = i64::from(page) * i64::from(page_size);
        self.select_drugs(
            &sql,
            params![contains_pattern(pattern), i64::from(page_size), offset],
        )
        .map_err(|err| StoreError::query(QueryCategory::DrugLookup, err))
    }

    /// Allergen groups whose description starts with `prefix`.
    pub fn query_allergies(&self, prefix: &str) -> StoreResult<Vec<Allergy>> {
        let run = || -> rusqlite::Result<Vec<Allergy>> {
            let mut stmt = self.conn.prepare_cached(
                r#"
                SELECT DAM_ALRGN_GRP, DAM_ALRGN_GRP_DESC
                FROM RDAMAGD1
                WHERE DAM_ALRGN_GRP_DESC LIKE ?1 ESCAPE '\'
                ORDER BY DAM_ALRGN_GRP_DESC
                "#,
            )?;
            let rows = stmt.query_map([format!("{}%", escape_like(prefix))], |row| {
                let name: String = row.get(1)?;
                Ok(Allergy::new(row.get(0)?, &name))
            })?;
            rows.collect()
        };
        run().map_err(|err| StoreError::query(QueryCategory::AllergyLookup, err))
    }

    fn select_drugs(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> rusqlite::Result<Vec<Drug>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params, |row| {
            let name: String = row.get(0)?;
            Ok(Drug::new(row.get(3)?, row.get(1)?, row.get(2)?, &name))
        })?;
        rows.collect()
    }
}

fn contains_pattern(pattern: &str) -> String {
    format!("%{}%", escape_like(pattern))
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
