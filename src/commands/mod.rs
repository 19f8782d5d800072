use crate::commands::convert::{BatchCommand, ConvertCommand};
use clap::{Parser, Subcommand};

pub mod convert;

/// CLI for converting BIN/CUE disc image sets into IMG/CCD/SUB image sets.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Convert(ConvertCommand),
    Batch(BatchCommand),
}
