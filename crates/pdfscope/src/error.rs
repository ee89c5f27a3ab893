use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("No PDF files found in {0}")]
    NoPdfFiles(PathBuf),

    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Cannot write to output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
