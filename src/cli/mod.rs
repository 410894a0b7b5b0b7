// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the tzfanim command-line interface.
//!
//! Three subcommands: `search` to find a phrase and its letter-substitution
//! variants in a corpus file, `variants` to list what a phrase expands to
//! without searching, and `inspect` to summarize a corpus file.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tzfanim::Engine;

#[derive(Parser)]
#[command(
    name = "tzfanim",
    about = "Letter-substitution cipher search over a verse corpus",
    version
)]
pub struct Cli {
    /// TOML config file; unset keys keep their defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a corpus for a phrase and its variants
    Search {
        /// Corpus file: book headers followed by `{N}text` verse lines
        #[arg(short, long)]
        corpus: PathBuf,

        /// Phrase to search for
        phrase: String,

        /// Search engine: automaton or indexed
        #[arg(short, long, default_value = "automaton")]
        engine: Engine,

        /// Restrict the search to one book
        #[arg(short, long)]
        book: Option<String>,

        /// Allow matches inside longer words
        #[arg(long)]
        loose: bool,

        /// Number of worker threads (overrides the config file)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Stop waiting for slow partitions after this many seconds
        #[arg(long)]
        deadline: Option<u64>,

        /// Maximum number of variants to display
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print the response as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// List the variants generated for a phrase
    Variants {
        /// Phrase to expand
        phrase: String,

        /// Variant budget (defaults to the configured maximum)
        #[arg(short, long)]
        max: Option<usize>,

        /// Maximum number of variants to display
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Print the variants as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a corpus file
    Inspect {
        /// Corpus file
        #[arg(short, long)]
        corpus: PathBuf,
    },
}
