use std::path::{Path, PathBuf};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use pdf::{DocumentResult, MergeMode, OutlineOptions};
use tokio::task::JoinError;

use crate::prelude::{println, *};

#[derive(Debug, Clone, clap::Args)]
pub struct OutlineArgs {
    /// A PDF file, or a directory whose `*.pdf` files are processed in name order
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory receiving one `<name>.json` per input (prints to stdout when omitted)
    #[arg(short, long, env = "PDFSCOPE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Pages extracted and merged together
    #[arg(long, env = "PDFSCOPE_CHUNK_SIZE", default_value = "5")]
    pub chunk_size: usize,

    /// Stop scanning once more than this many heading patterns were seen
    #[arg(long, env = "PDFSCOPE_EARLY_STOP", default_value = "30")]
    pub early_stop: usize,

    /// Merge heading fragments split over three or more spans
    #[arg(long, env = "PDFSCOPE_CHAIN_MERGE")]
    pub chain_merge: bool,
}

impl OutlineArgs {
    fn options(&self) -> OutlineOptions {
        OutlineOptions {
            chunk_size: self.chunk_size,
            early_stop_matches: self.early_stop,
            merge: if self.chain_merge {
                MergeMode::Chain
            } else {
                MergeMode::Pairwise
            },
        }
    }
}

pub async fn run(args: OutlineArgs, global: crate::Global) -> Result<()> {
    let inputs = collect_inputs(&args.input)?;
    let options = args.options();

    if global.verbose {
        println!("Outlining {} file(s) with {:?}", inputs.len(), options);
    }

    let Some(output_dir) = args.output.clone() else {
        for path in inputs {
            let result = outline_blocking(path, options.clone()).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        return Ok(());
    };

    std::fs::create_dir_all(&output_dir).map_err(|source| Error::OutputDir {
        path: output_dir.clone(),
        source,
    })?;

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut summary = Vec::with_capacity(inputs.len());
    for path in inputs {
        progress.set_message(file_name(&path));
        let result = outline_blocking(path.clone(), options.clone()).await;
        let written = write_result(&output_dir, &path, &result)?;
        info!("wrote {}", written.display());
        summary.push((path, result));
        progress.inc(1);
    }
    progress.finish_and_clear();

    output_summary(&summary);
    Ok(())
}

async fn outline_blocking(path: PathBuf, options: OutlineOptions) -> DocumentResult {
    let name = file_name(&path);
    let joined = tokio::task::spawn_blocking(move || outline_file(&path, &options)).await;
    settle(&name, joined)
}

/// A panicked or cancelled extraction becomes the extraction-error result so
/// the rest of the batch still runs.
fn settle(name: &str, joined: std::result::Result<DocumentResult, JoinError>) -> DocumentResult {
    joined.unwrap_or_else(|e| {
        warn!("extraction of {name} aborted: {e}");
        DocumentResult::extraction_failed()
    })
}

/// PDF files to process: the file itself, or the sorted `*.pdf` entries of a
/// directory.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(Error::InputNotFound(input.to_path_buf()).into());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(input)
        .with_context(|| format!("Failed to read directory {}", input.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        return Err(Error::NoPdfFiles(input.to_path_buf()).into());
    }
    files.sort();
    Ok(files)
}

/// Outline one file. A file that cannot be read yields the processing-error
/// result; a file that cannot be parsed yields the extraction-error result.
pub fn outline_file(path: &Path, options: &OutlineOptions) -> DocumentResult {
    match std::fs::read(path) {
        Ok(bytes) => pdf::outline_with(&bytes, options),
        Err(e) => {
            warn!("cannot read {}: {e}", path.display());
            DocumentResult::processing_error(e)
        }
    }
}

/// Write `result` as `<output_dir>/<stem>.json`.
pub fn write_result(output_dir: &Path, input: &Path, result: &DocumentResult) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let path = output_dir.join(format!("{stem}.json"));
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, json).map_err(|source| Error::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    Ok(path)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn output_summary(summary: &[(PathBuf, DocumentResult)]) {
    let mut table = new_table();
    table.add_row(prettytable::row!["File", "Title", "Headings", "Status"]);

    for (path, result) in summary {
        let status = if result.is_error() {
            "error".red().to_string()
        } else {
            "ok".green().to_string()
        };
        table.add_row(prettytable::row![
            file_name(path),
            result.title,
            result.outline.len(),
            status
        ]);
    }

    table.printstd();
    let failed = summary.iter().filter(|(_, r)| r.is_error()).count();
    println!(
        "\n{} processed, {} failed",
        summary.len().to_string().bold(),
        failed.to_string().bold()
    );
}
