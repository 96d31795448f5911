//src/sequences.rs

use ahash::AHashMap;
use std::fmt::Write as FmtWrite;

use crate::error::DeblurError;
use crate::normalize::FeatureIdMap;
use crate::table::FeatureTable;

/// One representative sequence: the id it carries in the feature table plus
/// the raw nucleotide sequence it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: String,
}

/// The representative sequences paired with a denoised table.
///
/// Built from the exact feature-id mapping that renamed the table, and
/// validated against the table's feature axis before it can be consumed:
/// every table feature id appears exactly once here and vice versa.
/// Consumption is lazy single-pass iteration; re-iterating starts over.
#[derive(Debug, Clone)]
pub struct RepSequences {
    records: Vec<SequenceRecord>,
}

impl RepSequences {
    /// Pairs `fid_map` (original sequence -> table feature id) against the
    /// renamed table, checking referential integrity eagerly.
    pub fn paired(table: &FeatureTable, fid_map: &FeatureIdMap) -> Result<Self, DeblurError> {
        let mut by_id: AHashMap<&str, &str> = AHashMap::with_capacity(fid_map.len());
        for (sequence, id) in fid_map {
            // Duplicate map entries for one id must agree (the hash policy
            // collapses identical sequences onto one digest).
            if let Some(prev) = by_id.insert(id.as_str(), sequence.as_str()) {
                if prev != sequence.as_str() {
                    return Err(DeblurError::FeatureIdMismatch(format!(
                        "id {id:?} maps to two different sequences"
                    )));
                }
            }
        }

        if by_id.len() != table.n_observations() {
            return Err(DeblurError::FeatureIdMismatch(format!(
                "{} paired sequences vs {} table features",
                by_id.len(),
                table.n_observations()
            )));
        }

        let mut records = Vec::with_capacity(table.n_observations());
        for id in table.observation_ids() {
            let Some(sequence) = by_id.get(id.as_str()) else {
                return Err(DeblurError::FeatureIdMismatch(format!(
                    "table feature {id:?} has no paired sequence"
                )));
            };
            records.push(SequenceRecord {
                id: id.clone(),
                sequence: sequence.to_string(),
            });
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lazy pass over the records; restart by calling again.
    pub fn iter(&self) -> impl Iterator<Item = &SequenceRecord> {
        self.records.iter()
    }

    /// FASTA text generated on demand.
    pub fn to_fasta(&self) -> String {
        let mut out = String::new();
        for rec in &self.records {
            writeln!(out, ">{}\n{}", rec.id, rec.sequence).unwrap();
        }
        out
    }
}

impl IntoIterator for RepSequences {
    type Item = SequenceRecord;
    type IntoIter = std::vec::IntoIter<SequenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
