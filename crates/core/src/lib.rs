//! Core library for pdfscope
//!
//! This crate is the **Functional Core** of pdfscope: pure transformations
//! with zero I/O. The `pdfscope` binary crate reads files, extracts page text
//! through the `pdf` crate and hands plain data to the functions here.
//!
//! # Module Organization
//!
//! - [`config`]: The ranker's JSON input (documents, persona, job to be done)
//! - [`rank`]: Sentence segmentation, section chunking, relevance scoring,
//!   key-point extraction and report assembly
//!
//! Every function can be tested with fixture data alone: page text goes in,
//! ranked sections come out.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use pdfscope_core::rank::{Page, RankOptions, Ranker};
//!
//! let pages = vec![Page::new(1, "1. Nightlife\nClubs open late along the coast.")];
//! let mut ranker = Ranker::new(RankOptions::default());
//! let ranked = ranker.rank_document("guide.pdf", &pages, "nightlife clubs");
//! assert_eq!(ranked[0].title, "1. Nightlife");
//! ```

pub mod config;
pub mod rank;
