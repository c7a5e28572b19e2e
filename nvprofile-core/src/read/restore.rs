use crate::descriptor::DESCRIPTOR_NAME;
use crate::domain::RestoreSummary;
use crate::error::{ProfileError, Result};
use crate::pack::writer::create_with_summary;
use crate::read::archive::Opened;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestoreStrategy {
    /// Delete the target, recreate it, extract in place. A failure after the delete leaves the
    /// target empty or partially populated.
    #[default]
    Replace,
    /// Extract into a temporary sibling, then rename it over the target. The old tree is put
    /// back if the final rename fails.
    Staged,
}

#[derive(Clone, Debug, Default)]
pub struct RestoreOptions {
    pub strategy: RestoreStrategy,
    /// Archive the current target here before anything is removed.
    pub backup_current: Option<PathBuf>,
}

/// Replaces `target` with the content entries of `archive`.
pub fn restore(archive: &Path, target: &Path) -> Result<()> {
    restore_with(archive, target, &RestoreOptions::default()).map(|_| ())
}

pub fn restore_with(
    archive: &Path,
    target: &Path,
    opts: &RestoreOptions,
) -> Result<RestoreSummary> {
    // validated before anything is touched
    let mut opened = Opened::open(archive)?;
    let mut summary = RestoreSummary::default();

    if let Some(backup) = &opts.backup_current {
        if target.is_dir() {
            if is_within(backup, target) {
                return Err(std::io::Error::new(
                    ErrorKind::InvalidInput,
                    format!(
                        "backup path {} lies inside the directory being replaced",
                        backup.display()
                    ),
                )
                .into());
            }
            let (_, b) = create_with_summary(target, backup)?;
            info!(backup = %backup.display(), files = b.files, "current profile archived");
            summary.backup = Some(backup.clone());
        }
    }

    match opts.strategy {
        RestoreStrategy::Replace => {
            remove_target(target)?;
            fs::create_dir_all(target)?;
            extract_into(&mut opened, target, &mut summary)?;
        }
        RestoreStrategy::Staged => swap_in(&mut opened, target, &mut summary)?,
    }

    info!(
        archive = %archive.display(),
        target = %target.display(),
        files = summary.files,
        bytes = summary.bytes,
        "profile restored"
    );
    Ok(summary)
}

fn remove_target(target: &Path) -> Result<()> {
    let removed = match fs::symlink_metadata(target) {
        Ok(md) if md.is_dir() => fs::remove_dir_all(target),
        Ok(_) => fs::remove_file(target),
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };
    removed.map_err(|source| ProfileError::CleanupFailed {
        path: target.to_path_buf(),
        source,
    })?;
    debug!(target = %target.display(), "removed previous contents");
    Ok(())
}

fn extract_into(opened: &mut Opened, dest: &Path, summary: &mut RestoreSummary) -> Result<()> {
    for i in 0..opened.zip.len() {
        let mut entry = opened
            .zip
            .by_index(i)
            .map_err(|e| ProfileError::invalid(&opened.path, format!("entry {i}: {e}")))?;
        if entry.name() == DESCRIPTOR_NAME {
            continue;
        }
        let rel = entry.enclosed_name().map(Path::to_path_buf).ok_or_else(|| {
            ProfileError::invalid(&opened.path, format!("unsafe entry path: {}", entry.name()))
        })?;
        let outp = dest.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&outp)?;
            continue;
        }
        if let Some(parent) = outp.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(File::create(&outp)?);
        let n = std::io::copy(&mut entry, &mut out)?;
        out.flush()?;
        debug!(entry = %rel.display(), bytes = n, "extracted");

        summary.files += 1;
        summary.bytes += n;
    }
    Ok(())
}

fn swap_in(opened: &mut Opened, target: &Path, summary: &mut RestoreSummary) -> Result<()> {
    let parent = parent_dir(target);
    fs::create_dir_all(&parent)?;
    let label = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "profile".to_string());
    let work = tempfile::Builder::new()
        .prefix(&format!(".{label}.restore-"))
        .tempdir_in(&parent)?;

    let staged = work.path().join("new");
    fs::create_dir(&staged)?;
    // target is untouched until extraction has fully succeeded
    extract_into(opened, &staged, summary)?;

    let aside = work.path().join("old");
    let had_old = match fs::symlink_metadata(target) {
        Ok(_) => {
            fs::rename(target, &aside).map_err(|source| ProfileError::CleanupFailed {
                path: target.to_path_buf(),
                source,
            })?;
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = fs::rename(&staged, target) {
        if had_old {
            if let Err(back) = fs::rename(&aside, target) {
                warn!(
                    kept = %aside.display(),
                    error = %back,
                    "could not put the previous profile back"
                );
                // keep the old tree on disk for manual recovery
                let _ = work.keep();
            }
        }
        return Err(e.into());
    }

    let leftover = work.path().to_path_buf();
    if let Err(e) = work.close() {
        warn!(path = %leftover.display(), error = %e, "previous profile left on disk");
    }
    Ok(())
}

fn parent_dir(p: &Path) -> PathBuf {
    match p.parent() {
        Some(par) if !par.as_os_str().is_empty() => par.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn is_within(p: &Path, dir: &Path) -> bool {
    match (std::path::absolute(p), std::path::absolute(dir)) {
        (Ok(p), Ok(d)) => p.starts_with(d),
        _ => false,
    }
}
