use anyhow::Context;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub bytes_written: usize,
}

fn staging_path(out_path: &Path) -> PathBuf {
    let mut name = out_path
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push(".writing");
    out_path.with_file_name(name)
}

/// Writes `contents` next to `out_path` and renames it into place, so the
/// destination is either the complete new file or whatever was there before.
pub fn write_csv(out_path: &Path, contents: &str) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let tmp = staging_path(out_path);
    if let Err(e) = write_and_sync(&tmp, contents) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    if let Err(e) = std::fs::rename(&tmp, out_path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e).with_context(|| {
            format!("failed to move export into {}", out_path.to_string_lossy())
        });
    }

    Ok(ExportSummary {
        path: out_path.to_path_buf(),
        bytes_written: contents.len(),
    })
}

fn write_and_sync(path: &Path, contents: &str) -> anyhow::Result<()> {
    let mut f = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.to_string_lossy()))?;
    f.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", path.to_string_lossy()))?;
    f.flush().context("failed to flush export")?;
    f.sync_all().context("failed to sync export")?;
    Ok(())
}
