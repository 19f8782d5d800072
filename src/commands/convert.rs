use clap::Parser;
use std::path::PathBuf;

/// Converts a .bin/.cue pair into an IMG/CCD/SUB image set.
#[derive(Parser, Debug, Clone)]
pub struct ConvertCommand {
    /// Input cue sheet describing the disc layout
    #[arg(value_name = "INPUT_CUE")]
    pub input_cue: PathBuf,

    /// Output directory for the generated image set
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Data files referenced by the cue sheet, resolved next to the cue sheet when omitted
    #[arg(long, short = 'd', value_name = "DATA")]
    pub data: Vec<PathBuf>,

    /// Force overwrite of the output image if it already exists
    #[arg(long, short = 'f', value_name = "FORCE", default_value_t = false)]
    pub force: bool,
}

/// Converts multiple cue sheets into image sets in one run.
#[derive(Parser, Debug, Clone)]
pub struct BatchCommand {
    /// Input cue sheets, converted in order
    #[arg(value_name = "INPUT_CUE", required = true)]
    pub input_cues: Vec<PathBuf>,

    /// Output directory shared by all conversions
    #[arg(long, short = 'o', value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Force overwrite of output images that already exist
    #[arg(long, short = 'f', value_name = "FORCE", default_value_t = false)]
    pub force: bool,
}
