use crate::error::Result;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found under the source root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// `/`-separated path relative to the source root.
    pub name: String,
    pub len: u64,
}

/// Every regular file under `root`, sorted by archive name.
///
/// Directories are not returned; they are implied by the names. Symlinks are not followed.
pub fn collect_files(root: &Path) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for e in WalkDir::new(root).follow_links(false) {
        let e = e.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        if !e.file_type().is_file() {
            continue;
        }
        let p = e.path();
        let rel = p
            .strip_prefix(root)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let len = e
            .metadata()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
            .len();
        files.push(SourceFile {
            path: p.to_path_buf(),
            name: archive_name(rel)?,
            len,
        });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Joins the normal components of `rel` with `/`, whatever the host separator.
///
/// Names that are not valid UTF-8 are rejected: a lossy conversion could map two distinct
/// files onto the same entry name.
pub fn archive_name(rel: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for c in rel.components() {
        if let Component::Normal(s) = c {
            let part = s.to_str().ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("file name is not valid UTF-8: {}", rel.display()),
                )
            })?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn names_are_relative_slash_separated_and_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("addons/foo")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("settings.ini"), b"[speech]").unwrap();
        fs::write(root.join("addons/foo/plugin.py"), b"pass").unwrap();
        fs::write(root.join("addons/a.txt"), b"").unwrap();

        let names: Vec<_> = collect_files(root)
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            vec!["addons/a.txt", "addons/foo/plugin.py", "settings.ini"]
        );
    }

    #[test]
    fn reports_sizes() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.bin"), vec![7u8; 1234]).unwrap();
        let files = collect_files(tmp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].len, 1234);
        assert_eq!(files[0].path, tmp.path().join("a.bin"));
    }

    #[test]
    fn archive_name_drops_dot_components() {
        assert_eq!(archive_name(Path::new("./a/b.ini")).unwrap(), "a/b.ini");
        assert_eq!(
            archive_name(&Path::new("x").join("y").join("z")).unwrap(),
            "x/y/z"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join(OsStr::from_bytes(b"a\xff.ini")), b"one").unwrap();
        fs::write(root.join(OsStr::from_bytes(b"a\xfe.ini")), b"two").unwrap();

        let err = collect_files(root).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::IoFailure);
        assert!(err.to_string().contains("UTF-8"), "{err}");
    }
}
