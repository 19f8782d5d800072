use crate::img::error::ImgResult;
use log::debug;
use std::path::{Path, PathBuf};

pub const SUBCHANNEL_EXTENSION: &str = "sub";

/// Copies the companion subchannel file sitting next to the cue sheet, if
/// there is one, into the output directory under the same base name.
/// Absence is not an error.
pub async fn copy_if_present(cue_path: &Path, output_dir: &Path) -> ImgResult<Option<PathBuf>> {
    let source = cue_path.with_extension(SUBCHANNEL_EXTENSION);

    match tokio::fs::metadata(&source).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("No subchannel file at {:?}", source);
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    }

    let destination = match source.file_name() {
        Some(name) => output_dir.join(name),
        None => return Ok(None),
    };
    tokio::fs::copy(&source, &destination).await?;

    debug!("Copied subchannel file to {:?}", destination);

    Ok(Some(destination))
}
