use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::exit;

use q2_deblur_rs::types::DenoiseParams;
use q2_deblur_rs::{denoise_16s, denoise_other};

fn usage() -> ! {
    eprintln!(
        "usage: q2-deblur-rs <demux-dir> <trim-length> [reference.fasta]\n\
         \n\
         Runs `deblur workflow` on the demultiplexed FASTQ directory and\n\
         writes feature-table.tsv and representative-seqs.fasta to the\n\
         current directory. Pass a reference FASTA to positive-filter\n\
         against it instead of deblur's 16S default. trim-length -1\n\
         disables trimming."
    );
    exit(2);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        usage();
    }
    let demux_dir = PathBuf::from(&args[0]);
    let trim_length: i32 = match args[1].parse() {
        Ok(n) => n,
        Err(_) => usage(),
    };
    let reference = args.get(2).map(PathBuf::from);

    let params = DenoiseParams::default();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message("Running deblur workflow...");

    let result = match &reference {
        Some(ref_fp) => denoise_other(&demux_dir, ref_fp, trim_length, &params),
        None => denoise_16s(&demux_dir, trim_length, &params),
    };

    let (table, rep_seqs) = match result {
        Ok(outputs) => outputs,
        Err(e) => {
            spinner.finish_with_message("Denoising failed.");
            eprintln!("error: {e}");
            exit(1);
        }
    };
    spinner.finish_with_message(format!(
        "Denoised {} features across {} samples.",
        table.n_observations(),
        table.n_samples()
    ));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template("{spinner:.yellow} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message("Writing output files...");

    fs::write("feature-table.tsv", table.to_tsv())
        .expect("Could not write feature-table.tsv");

    fs::write("representative-seqs.fasta", rep_seqs.to_fasta())
        .expect("Could not write representative-seqs.fasta");

    spinner.finish_with_message("Output files created.");
}
