//! CLI module for clipsift
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// clipsift - playback compatibility checks and highlight selection for
/// downloaded videos
///
/// Assesses codec compatibility, merges detector output into clips and
/// removes near-duplicate scenes.
#[derive(Parser, Debug)]
#[command(name = "clipsift")]
#[command(about = "Codec compatibility checks and highlight selection for downloaded videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: String,

    /// Configuration file (default: ./clipsift.toml when present)
    #[arg(long, global = true, env = "CLIPSIFT_CONFIG")]
    pub config: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess playback compatibility of one file or of given codecs
    Assess(args::AssessArgs),
    /// Assess every media file in a folder and summarize
    Batch(args::BatchArgs),
    /// Merge timestamped detections into clips
    Merge(args::MergeArgs),
    /// Flag near-duplicate scenes by perceptual hash
    Dedupe(args::DedupeArgs),
    /// List unique, classified scenes worth saving
    Candidates(args::CandidatesArgs),
}
