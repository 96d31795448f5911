//src/command.rs

use std::path::Path;

use crate::types::DenoiseParams;

/// Name of the external denoising executable, resolved through PATH.
pub const DEBLUR_EXECUTABLE: &str = "deblur";

/// Table deblur writes into the output directory; the only artifact we read.
pub const OUTPUT_TABLE_FILENAME: &str = "reference-hit.biom";

/// Builds the full argv for one `deblur workflow` run.
///
/// Every parameter maps to exactly one `--flag value` pair. The positive
/// filtering reference is optional: when `reference_seqs` is `None` the
/// `--pos-ref-fp` flag is omitted entirely (deblur rejects an empty value).
/// `-w` asks deblur to keep the reference-hit outputs we consume.
///
/// No validation happens here; malformed values are rejected upstream by
/// the types in [`DenoiseParams`].
pub fn build_workflow_argv(
    demultiplexed_seqs: &Path,
    output_dir: &Path,
    reference_seqs: Option<&Path>,
    trim_length: i32,
    params: &DenoiseParams,
) -> Vec<String> {
    let mut argv = vec![
        DEBLUR_EXECUTABLE.to_string(),
        "workflow".to_string(),
        "--seqs-fp".to_string(),
        demultiplexed_seqs.display().to_string(),
        "--output-dir".to_string(),
        output_dir.display().to_string(),
        "--mean-error".to_string(),
        params.mean_error.to_string(),
        "--indel-prob".to_string(),
        params.indel_prob.to_string(),
        "--indel-max".to_string(),
        params.indel_max.to_string(),
        "--trim-length".to_string(),
        trim_length.to_string(),
        "--min-reads".to_string(),
        params.min_reads.to_string(),
        "--min-size".to_string(),
        params.min_size.to_string(),
        "--jobs-to-start".to_string(),
        params.jobs_to_start.to_string(),
        "-w".to_string(),
    ];

    if let Some(ref_fp) = reference_seqs {
        argv.push("--pos-ref-fp".to_string());
        argv.push(ref_fp.display().to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn flag_value<'a>(argv: &'a [String], flag: &str) -> Option<&'a str> {
        argv.iter()
            .position(|t| t == flag)
            .and_then(|i| argv.get(i + 1))
            .map(|s| s.as_str())
    }

    #[test]
    fn every_parameter_has_a_flag() {
        let argv = build_workflow_argv(
            &PathBuf::from("/data/demux"),
            &PathBuf::from("/tmp/scratch"),
            None,
            150,
            &DenoiseParams::default(),
        );

        assert_eq!(argv[0], "deblur");
        assert_eq!(argv[1], "workflow");
        assert_eq!(flag_value(&argv, "--seqs-fp"), Some("/data/demux"));
        assert_eq!(flag_value(&argv, "--output-dir"), Some("/tmp/scratch"));
        assert_eq!(flag_value(&argv, "--mean-error"), Some("0.005"));
        assert_eq!(flag_value(&argv, "--indel-prob"), Some("0.01"));
        assert_eq!(flag_value(&argv, "--indel-max"), Some("3"));
        assert_eq!(flag_value(&argv, "--trim-length"), Some("150"));
        assert_eq!(flag_value(&argv, "--min-reads"), Some("10"));
        assert_eq!(flag_value(&argv, "--min-size"), Some("2"));
        assert_eq!(flag_value(&argv, "--jobs-to-start"), Some("1"));
        assert!(argv.iter().any(|t| t == "-w"));
    }

    #[test]
    fn reference_flag_omitted_when_absent() {
        let argv = build_workflow_argv(
            &PathBuf::from("seqs"),
            &PathBuf::from("out"),
            None,
            100,
            &DenoiseParams::default(),
        );
        assert!(!argv.iter().any(|t| t == "--pos-ref-fp"));
    }

    #[test]
    fn reference_flag_present_when_given() {
        let argv = build_workflow_argv(
            &PathBuf::from("seqs"),
            &PathBuf::from("out"),
            Some(&PathBuf::from("/refs/gg.fasta")),
            100,
            &DenoiseParams::default(),
        );
        assert_eq!(flag_value(&argv, "--pos-ref-fp"), Some("/refs/gg.fasta"));
    }

    #[test]
    fn no_trim_sentinel_forwarded_verbatim() {
        let argv = build_workflow_argv(
            &PathBuf::from("seqs"),
            &PathBuf::from("out"),
            None,
            crate::types::NO_TRIM,
            &DenoiseParams::default(),
        );
        assert_eq!(flag_value(&argv, "--trim-length"), Some("-1"));
    }
}
