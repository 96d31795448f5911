//src/table.rs

use ahash::AHashMap;
use std::fmt::Write as FmtWrite;

/// In-memory sparse feature table: (observation, sample) -> count.
///
/// Observations are the feature axis (deblur emits the raw nucleotide
/// sequence as the feature id); samples are the per-source axis. Both axes
/// keep their original order. Zero cells are not stored.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    observation_ids: Vec<String>,
    sample_ids: Vec<String>,
    /// (observation index, sample index) -> count
    data: AHashMap<(usize, usize), f64>,
}

impl FeatureTable {
    /// Assembles a table from its axes and sparse (obs, sample, count)
    /// triples. Duplicate triples for the same cell are summed.
    pub fn from_parts(
        observation_ids: Vec<String>,
        sample_ids: Vec<String>,
        triples: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        let mut data = AHashMap::new();
        for (obs, sample, count) in triples {
            *data.entry((obs, sample)).or_insert(0.0) += count;
        }
        Self {
            observation_ids,
            sample_ids,
            data,
        }
    }

    pub fn observation_ids(&self) -> &[String] {
        &self.observation_ids
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn n_observations(&self) -> usize {
        self.observation_ids.len()
    }

    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// A table with no features. Still carries its sample axis.
    pub fn is_empty(&self) -> bool {
        self.observation_ids.is_empty()
    }

    /// Count for a (feature, sample) pair, 0.0 if the cell is absent or
    /// either id is unknown.
    pub fn get(&self, observation_id: &str, sample_id: &str) -> f64 {
        let obs = self.observation_ids.iter().position(|i| i == observation_id);
        let sample = self.sample_ids.iter().position(|i| i == sample_id);
        match (obs, sample) {
            (Some(o), Some(s)) => self.data.get(&(o, s)).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Renames the sample axis through `id_map`. Ids missing from the map
    /// keep their old name.
    pub fn update_sample_ids(&mut self, id_map: &AHashMap<String, String>) {
        let (new_ids, index_map) = remap_axis(&self.sample_ids, id_map);
        self.data = self
            .data
            .drain()
            .fold(AHashMap::new(), |mut acc, ((o, s), count)| {
                *acc.entry((o, index_map[s])).or_insert(0.0) += count;
                acc
            });
        self.sample_ids = new_ids;
    }

    /// Renames the observation (feature) axis through `id_map`. Ids missing
    /// from the map keep their old name.
    ///
    /// When two old ids map to the same new id the rows are merged and
    /// their counts summed: content-addressed ids collapse duplicates by
    /// construction, so merging is the behavior callers get.
    pub fn update_observation_ids(&mut self, id_map: &AHashMap<String, String>) {
        let (new_ids, index_map) = remap_axis(&self.observation_ids, id_map);
        self.data = self
            .data
            .drain()
            .fold(AHashMap::new(), |mut acc, ((o, s), count)| {
                *acc.entry((index_map[o], s)).or_insert(0.0) += count;
                acc
            });
        self.observation_ids = new_ids;
    }

    /// Tab-separated rendering, observations as rows, samples as columns.
    /// Generated on demand, same as the text getters elsewhere.
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("#OTU ID");
        for sid in &self.sample_ids {
            out.push('\t');
            out.push_str(sid);
        }
        out.push('\n');
        for (o, oid) in self.observation_ids.iter().enumerate() {
            out.push_str(oid);
            for s in 0..self.sample_ids.len() {
                let count = self.data.get(&(o, s)).copied().unwrap_or(0.0);
                write!(out, "\t{count}").unwrap();
            }
            out.push('\n');
        }
        out
    }
}

/// Applies an id mapping to one axis, keeping first-occurrence order, and
/// returns the new axis plus old-index -> new-index translation. Collapsed
/// ids are logged since they mean rows/columns are about to merge.
fn remap_axis(
    ids: &[String],
    id_map: &AHashMap<String, String>,
) -> (Vec<String>, Vec<usize>) {
    let mut new_ids: Vec<String> = Vec::with_capacity(ids.len());
    let mut seen: AHashMap<String, usize> = AHashMap::with_capacity(ids.len());
    let mut index_map = Vec::with_capacity(ids.len());

    for old in ids {
        let new = id_map.get(old).unwrap_or(old).clone();
        let next = new_ids.len();
        let idx = *seen.entry(new.clone()).or_insert_with(|| {
            new_ids.push(new.clone());
            next
        });
        if idx != next {
            log::warn!("axis ids {old:?} collapsed into {new:?}, counts will merge");
        }
        index_map.push(idx);
    }
    (new_ids, index_map)
}
