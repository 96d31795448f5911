//src/normalize.rs

use ahash::AHashMap;

use crate::error::DeblurError;
use crate::table::FeatureTable;

/// Delimiter deblur uses when it tacks per-file suffixes onto sample names.
const SAMPLE_ID_DELIMITER: char = '_';

/// Ordered mapping from original feature id (the raw sequence) to the id it
/// carries in the returned table. Drives both the table rename and the
/// representative-sequence pairing, so the two outputs can never disagree.
pub type FeatureIdMap = Vec<(String, String)>;

/// Strips the per-file suffixes deblur appends to sample names: everything
/// from the first `_` on is dropped, so `S1_001.fastq`-derived `S1_001`
/// becomes plain `S1`.
pub fn clean_sample_ids(table: &mut FeatureTable) {
    let sid_map: AHashMap<String, String> = table
        .sample_ids()
        .iter()
        .map(|id| {
            let head = id
                .split(SAMPLE_ID_DELIMITER)
                .next()
                .unwrap_or(id)
                .to_string();
            (id.clone(), head)
        })
        .collect();
    table.update_sample_ids(&sid_map);
}

/// Replaces every feature id with the MD5 hex digest of the sequence's
/// UTF-8 bytes, in place, and returns the sequence -> digest mapping.
///
/// A digest shared by two distinct sequences would make the pairing
/// ambiguous, so it is rejected before the table is touched.
pub fn hash_feature_ids(table: &mut FeatureTable) -> Result<FeatureIdMap, DeblurError> {
    let mut by_digest: AHashMap<String, String> = AHashMap::new();
    let mut fid_map: FeatureIdMap = Vec::with_capacity(table.n_observations());

    for id in table.observation_ids() {
        let digest = format!("{:x}", md5::compute(id.as_bytes()));
        if let Some(prev) = by_digest.get(&digest) {
            if prev != id {
                return Err(DeblurError::HashCollision {
                    a: prev.clone(),
                    b: id.clone(),
                    digest,
                });
            }
        } else {
            by_digest.insert(digest.clone(), id.clone());
        }
        fid_map.push((id.clone(), digest));
    }

    let rename: AHashMap<String, String> = fid_map.iter().cloned().collect();
    table.update_observation_ids(&rename);
    Ok(fid_map)
}

/// Identity policy: feature ids stay the raw sequences. The mapping is
/// still materialized so pairing runs off the same code path either way.
pub fn identity_feature_ids(table: &FeatureTable) -> FeatureIdMap {
    table
        .observation_ids()
        .iter()
        .map(|id| (id.clone(), id.clone()))
        .collect()
}
