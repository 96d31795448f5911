//src/biom.rs

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::DeblurError;
use crate::table::FeatureTable;

/// One entry on a BIOM axis. Metadata is carried by the format but unused
/// here; deblur puts the raw sequence in `id` and nothing we need elsewhere.
#[derive(Debug, Deserialize)]
struct BiomAxisEntry {
    id: String,
}

/// The subset of a BIOM 1.0 (JSON) file this crate reads. `rows` are
/// observations (features), `columns` are samples.
#[derive(Debug, Deserialize)]
struct BiomFile {
    matrix_type: String,
    shape: [usize; 2],
    rows: Vec<BiomAxisEntry>,
    columns: Vec<BiomAxisEntry>,
    data: Vec<Vec<f64>>,
}

/// Loads the table deblur left at `path`.
///
/// A missing file is [`DeblurError::MissingOutput`] (deblur exited 0 but
/// did not write what we expect, usually a version mismatch); anything
/// unparseable or internally inconsistent is [`DeblurError::InvalidTable`].
pub fn load_table(path: &Path) -> Result<FeatureTable, DeblurError> {
    let file = File::open(path).map_err(|source| DeblurError::MissingOutput {
        path: path.to_path_buf(),
        source,
    })?;

    let biom: BiomFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| DeblurError::InvalidTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let invalid = |reason: String| DeblurError::InvalidTable {
        path: path.to_path_buf(),
        reason,
    };

    let [n_obs, n_samples] = biom.shape;
    if biom.rows.len() != n_obs || biom.columns.len() != n_samples {
        return Err(invalid(format!(
            "shape {:?} does not match axes ({} rows, {} columns)",
            biom.shape,
            biom.rows.len(),
            biom.columns.len()
        )));
    }

    let observation_ids: Vec<String> = biom.rows.into_iter().map(|r| r.id).collect();
    let sample_ids: Vec<String> = biom.columns.into_iter().map(|c| c.id).collect();

    let mut triples = Vec::new();
    match biom.matrix_type.as_str() {
        "sparse" => {
            // Each entry is [row, column, value].
            for cell in &biom.data {
                let &[obs, sample, count] = cell.as_slice() else {
                    return Err(invalid(format!("sparse entry has {} fields", cell.len())));
                };
                let (obs, sample) = (obs as usize, sample as usize);
                if obs >= n_obs || sample >= n_samples {
                    return Err(invalid(format!("sparse index ({obs}, {sample}) out of range")));
                }
                triples.push((obs, sample, count));
            }
        }
        "dense" => {
            if biom.data.len() != n_obs {
                return Err(invalid(format!("dense data has {} rows", biom.data.len())));
            }
            for (obs, row) in biom.data.iter().enumerate() {
                if row.len() != n_samples {
                    return Err(invalid(format!("dense row {obs} has {} columns", row.len())));
                }
                for (sample, &count) in row.iter().enumerate() {
                    if count != 0.0 {
                        triples.push((obs, sample, count));
                    }
                }
            }
        }
        other => return Err(invalid(format!("unsupported matrix_type {other:?}"))),
    }

    log::debug!(
        "loaded {} features x {} samples from {}",
        n_obs,
        n_samples,
        path.display()
    );
    Ok(FeatureTable::from_parts(observation_ids, sample_ids, triples))
}
