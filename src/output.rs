use crate::error::SoftFailure;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// JPEG 2000, the wavelet format the catalog serves imagery in.
pub const IMAGE_EXTENSION: &str = "jp2";

/// `out` becomes `out.jp2`; an existing extension is kept, as in `scene.v2` -> `scene.v2.jp2`.
pub fn image_path<P: AsRef<Path>>(output: P) -> PathBuf {
    let mut path = output.as_ref().as_os_str().to_owned();
    path.push(".");
    path.push(IMAGE_EXTENSION);
    PathBuf::from(path)
}

fn write_image(dst: &Path, bytes: &[u8]) -> std::io::Result<()> {
    // Make parent directories as necessary
    if let Some(parent_dir) = dst.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }

    let mut partial = dst.as_os_str().to_owned();
    partial.push(".partial");
    let partial = PathBuf::from(partial);

    let written = fs::File::create(&partial).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&partial, dst)) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }
    Ok(())
}

/// Write the image next to `output` with the `.jp2` extension.
///
/// A failed write is logged and reported as `None` rather than an error.
pub fn save_image<P: AsRef<Path>>(output: P, bytes: &[u8], verbose: bool) -> Option<PathBuf> {
    let dst = image_path(output);
    if verbose {
        info!("Saving file {}...", dst.display());
    } else {
        debug!("Saving file {}...", dst.display());
    }
    match write_image(&dst, bytes) {
        Ok(()) => Some(dst),
        Err(source) => {
            let failure = SoftFailure::PersistenceFailed { path: dst, source };
            warn!("{failure}");
            None
        }
    }
}
