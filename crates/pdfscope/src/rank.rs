use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;
use log::{info, warn};
use pdfscope_core::config::InputConfig;
use pdfscope_core::rank::{build_report, Page, RankOptions, RankReport, RankedDocument, Ranker, Strategy};

use crate::prelude::{eprintln, println, *};

#[derive(Debug, Clone, clap::Args)]
pub struct RankArgs {
    /// JSON file with documents, persona and job to be done
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Directory holding the documents (defaults to the config's directory)
    #[arg(short, long, env = "PDFSCOPE_DOCUMENTS")]
    pub documents: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long, env = "PDFSCOPE_RANK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Scoring strategy: tfidf or lexical
    #[arg(long, env = "PDFSCOPE_STRATEGY", default_value = "tfidf")]
    pub strategy: Strategy,

    /// Pages read per document
    #[arg(long, env = "PDFSCOPE_MAX_PAGES", default_value = "10")]
    pub max_pages: usize,
}

impl RankArgs {
    fn options(&self) -> RankOptions {
        RankOptions {
            strategy: self.strategy,
            max_pages: self.max_pages,
            ..RankOptions::default()
        }
    }

    fn documents_dir(&self) -> PathBuf {
        self.documents.clone().unwrap_or_else(|| {
            self.config
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

pub async fn run(args: RankArgs, global: crate::Global) -> Result<()> {
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    let config = InputConfig::from_json(&raw).map_err(|e| eyre!(e))?;

    if global.verbose {
        println!(
            "Ranking {} document(s) for {:?} with {}",
            config.documents.len(),
            config.persona.role,
            args.strategy
        );
    }

    let documents_dir = args.documents_dir();
    let options = args.options();
    let report = tokio::task::spawn_blocking(move || rank_collection(&config, &documents_dir, options))
        .await?;

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            eprintln!(
                "{} {} sections in {:.1}s -> {}",
                "✓".green(),
                report.extracted_sections.len(),
                report.metadata.total_processing_time,
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Read, chunk and rank every configured document found under
/// `documents_dir`. Documents that cannot be read or parsed are skipped.
pub fn rank_collection(config: &InputConfig, documents_dir: &Path, options: RankOptions) -> RankReport {
    rank_collection_with(config, documents_dir, options, read_pages)
}

fn rank_collection_with<R>(
    config: &InputConfig,
    documents_dir: &Path,
    options: RankOptions,
    read: R,
) -> RankReport
where
    R: Fn(&Path, usize) -> Option<Vec<Page>>,
{
    let started_at = chrono::Utc::now();
    let start = Instant::now();
    let query = config.query();
    let max_pages = options.max_pages;
    let mut ranker = Ranker::new(options);

    let mut ranked = Vec::with_capacity(config.documents.len());
    for document in &config.documents {
        let path = documents_dir.join(&document.filename);
        let Some(sections) = isolate(&document.filename, || {
            let pages = read(&path, max_pages)?;
            Some(ranker.rank_document(&path.to_string_lossy(), &pages, &query))
        }) else {
            continue;
        };
        info!("{}: {} sections", document.filename, sections.len());
        ranked.push(RankedDocument {
            filename: document.filename.clone(),
            sections,
        });
    }

    build_report(
        config,
        &ranked,
        ranker.options(),
        started_at,
        start.elapsed().as_secs_f64(),
    )
}

/// Run one document's work; a panic skips the document instead of ending the
/// batch.
fn isolate<T>(name: &str, work: impl FnOnce() -> Option<T>) -> Option<T> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(work)) {
        Ok(result) => result,
        Err(_) => {
            warn!("skipping {name}: extraction panicked");
            None
        }
    }
}

fn read_pages(path: &Path, max_pages: usize) -> Option<Vec<Page>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("skipping {}: {e}", path.display());
            return None;
        }
    };
    match pdf::page_texts(&bytes, max_pages) {
        Ok(texts) => Some(texts.into_iter().map(|t| Page::new(t.page, t.text)).collect()),
        Err(e) => {
            warn!("skipping {}: {e}", path.display());
            None
        }
    }
}
