//! Ordered merge-join of interaction rows against the candidate set.

use crate::db::DrugInteractionRow;
use crate::models::Drug;

/// Pair each row with the candidate whose id equals the row's `target_id`.
///
/// Both inputs must be sorted ascending by id. The candidate cursor only
/// moves forward and only while `candidate.id < row.target_id`, so several
/// rows with the same target (one drug, several effects) all pair with the
/// same candidate. Rows without a matching candidate are skipped. Output
/// follows row order.
pub fn merge_join<'c, 'r>(
    candidates: &'c [Drug],
    rows: &'r [DrugInteractionRow],
) -> Vec<(&'c Drug, &'r DrugInteractionRow)> {
    let mut matches = Vec::new();
    let mut cursor = candidates.iter();
    let Some(mut current) = cursor.next() else {
        return matches;
    };

    for row in rows {
        while current.id() < row.target_id {
            match cursor.next() {
                Some(next) => current = next,
                None => break,
            }
        }
        if current.id() == row.target_id {
            matches.push((current, row));
        }
    }
    matches
}
