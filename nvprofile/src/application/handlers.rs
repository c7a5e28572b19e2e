use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use nvprofile_core::error::{ProfileError, Result};
use nvprofile_core::settings::{Locations, with_profile_extension};
use nvprofile_core::{
    ListingTree, ProfileDescriptor, RestoreOptions, RestoreStrategy, create_with_summary, inspect,
    list, restore_with,
};
use tracing::debug;

fn config_dir(explicit: Option<PathBuf>, flag: &str) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p);
    }
    let loc = Locations::discover().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("cannot determine the NVDA configuration directory; pass {flag}"),
        )
    })?;
    debug!(dir = %loc.config_dir.display(), "using configuration directory");
    Ok(loc.config_dir)
}

fn or_na(s: &str) -> &str {
    if s.is_empty() { "N/A" } else { s }
}

pub(crate) fn describe(d: &ProfileDescriptor) -> String {
    format!(
        "Username: {}\nComputer: {}\nCreated: {}\nOriginal Path: {}",
        or_na(&d.username),
        or_na(&d.computer_name),
        or_na(&d.created_at),
        or_na(&d.source_path)
    )
}

/// Prints the destructive-restore warning to `out` and reads a yes/no answer from `input`.
pub(crate) fn confirm(
    target: &Path,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> std::io::Result<bool> {
    write!(
        out,
        "This will DELETE the current NVDA folder at:\n{}\n\nand replace it with the backup. This cannot be undone!\n\nContinue? [y/N] ",
        target.display()
    )?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

pub fn handle_create(out: PathBuf, source: Option<PathBuf>) -> Result<()> {
    let source = config_dir(source, "--source")?;
    let out = with_profile_extension(&out);
    let (desc, summary) = create_with_summary(&source, &out)?;
    for s in &summary.skipped {
        eprintln!("create: skipped {s}");
    }
    println!(
        "Created profile: {} ({} files, {} bytes)",
        out.display(),
        summary.files,
        summary.bytes
    );
    println!("{}", describe(&desc));
    Ok(())
}

pub fn handle_inspect(archive: PathBuf, json: bool) -> Result<()> {
    let i = inspect(&archive)?;
    if json {
        let doc = serde_json::json!({
            "descriptor": i.descriptor,
            "files": i.tree.file_paths(),
        });
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        println!("{text}");
        return Ok(());
    }
    println!("{}", describe(&i.descriptor));
    println!();
    print!("{}", contents(&i.tree));
    Ok(())
}

pub(crate) fn contents(tree: &ListingTree) -> String {
    if tree.is_empty() {
        return "Profile Contents: empty profile\n".to_string();
    }
    format!(
        "Profile Contents ({} files):\n{}",
        tree.file_count(),
        tree.render()
    )
}

pub fn handle_list(archive: PathBuf) -> Result<()> {
    for name in list(&archive)? {
        println!("{name}");
    }
    Ok(())
}

pub fn handle_restore(
    archive: PathBuf,
    target: Option<PathBuf>,
    staged: bool,
    backup_current: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let target = config_dir(target, "--target")?;
    if !yes {
        let stdin = std::io::stdin();
        let ok = confirm(&target, &mut stdin.lock(), &mut std::io::stderr())?;
        if !ok {
            eprintln!("restore: cancelled");
            return Ok(());
        }
    }

    let opts = RestoreOptions {
        strategy: if staged {
            RestoreStrategy::Staged
        } else {
            RestoreStrategy::Replace
        },
        backup_current: backup_current.map(|p| with_profile_extension(&p)),
    };
    let summary = restore_with(&archive, &target, &opts).map_err(|e| {
        if let ProfileError::CleanupFailed { .. } = e {
            eprintln!(
                "restore: {} may be partially removed; close NVDA and run restore again",
                target.display()
            );
        }
        e
    })?;

    if let Some(b) = &summary.backup {
        println!("Previous profile saved to {}", b.display());
    }
    println!(
        "Profile restored successfully into {} ({} files).",
        target.display(),
        summary.files
    );
    println!("Please restart NVDA.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn describe_fills_blanks() {
        let d = ProfileDescriptor {
            username: "alice".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            ..Default::default()
        };
        assert_eq!(
            describe(&d),
            "Username: alice\nComputer: N/A\nCreated: 2024-01-01T00:00:00Z\nOriginal Path: N/A"
        );
    }

    #[test]
    fn contents_of_empty_and_populated_trees() {
        let empty = ListingTree::from_names(std::iter::empty::<&str>());
        assert_eq!(contents(&empty), "Profile Contents: empty profile\n");

        let t = ListingTree::from_names(["addons/x.py", "nvda.ini"]);
        assert_eq!(
            contents(&t),
            "Profile Contents (2 files):\naddons/\n  x.py\nnvda.ini\n"
        );
    }

    #[test]
    fn confirm_accepts_only_yes() {
        let t = Path::new("/home/u/.config/nvda");
        let cases = [
            ("y\n", true),
            ("YES\n", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
        ];
        for (answer, want) in cases {
            let mut out = Vec::new();
            let got = confirm(t, &mut Cursor::new(answer), &mut out).unwrap();
            assert_eq!(got, want, "answer {answer:?}");
            assert!(String::from_utf8(out).unwrap().contains("/home/u/.config/nvda"));
        }
    }

    #[test]
    fn create_then_restore_through_handlers() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("nvda");
        std::fs::create_dir_all(src.join("addons")).unwrap();
        std::fs::write(src.join("addons/x.py"), b"x").unwrap();

        handle_create(tmp.path().join("b"), Some(src.clone())).unwrap();
        let archive = tmp.path().join("b.nvdaprofile");
        assert!(archive.is_file());

        let target = tmp.path().join("live");
        handle_restore(archive, Some(target.clone()), true, None, true).unwrap();
        assert_eq!(std::fs::read(target.join("addons/x.py")).unwrap(), b"x");
    }
}
