use crate::descriptor::{self, DESCRIPTOR_NAME, ProfileDescriptor};
use crate::domain::BackupSummary;
use crate::error::{ProfileError, Result, from_zip_write};
use crate::pack::walker::{SourceFile, collect_files};
use crate::settings::Identity;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archives `source` into `out` and returns the descriptor written as its first entry.
pub fn create(source: &Path, out: &Path) -> Result<ProfileDescriptor> {
    create_with_summary(source, out).map(|(d, _)| d)
}

pub fn create_with_summary(
    source: &Path,
    out: &Path,
) -> Result<(ProfileDescriptor, BackupSummary)> {
    create_as(source, out, &Identity::from_env(), descriptor::now())
}

/// Like [`create_with_summary`] with an explicit identity and timestamp.
pub fn create_as(
    source: &Path,
    out: &Path,
    identity: &Identity,
    now: OffsetDateTime,
) -> Result<(ProfileDescriptor, BackupSummary)> {
    // must fail before `out` is created or truncated
    if !source.is_dir() {
        return Err(ProfileError::SourceNotFound(source.to_path_buf()));
    }
    let source_abs = std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf());
    let desc = ProfileDescriptor::capture(&source_abs, identity, now);
    let files = collect_files(source)?;

    let mut zip = ZipWriter::new(BufWriter::new(File::create(out)?));
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(DESCRIPTOR_NAME, opts).map_err(from_zip_write)?;
    zip.write_all(&desc.to_json()?)?;

    let mut summary = BackupSummary::default();
    for f in &files {
        if f.name == DESCRIPTOR_NAME {
            warn!(path = %f.path.display(), "source file uses the reserved descriptor name; skipped");
            summary.skipped.push(f.name.clone());
            continue;
        }
        if is_same_file(f, out) {
            debug!(path = %f.path.display(), "skipping the archive being written");
            summary.skipped.push(f.name.clone());
            continue;
        }

        let large = f.len >= u64::from(u32::MAX);
        zip.start_file(f.name.as_str(), opts.large_file(large))
            .map_err(from_zip_write)?;
        let mut src = File::open(&f.path)?;
        let n = std::io::copy(&mut src, &mut zip)?;
        debug!(entry = %f.name, bytes = n, "added");

        summary.files += 1;
        summary.bytes += n;
    }

    let mut w = zip.finish().map_err(from_zip_write)?;
    w.flush()?;

    info!(
        archive = %out.display(),
        source = %source.display(),
        files = summary.files,
        bytes = summary.bytes,
        "backup written"
    );
    Ok((desc, summary))
}

fn is_same_file(f: &SourceFile, out: &Path) -> bool {
    if f.path.file_name() != out.file_name() {
        return false;
    }
    match (fs::canonicalize(&f.path), fs::canonicalize(out)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
