use crate::descriptor::{DESCRIPTOR_NAME, ProfileDescriptor};
use crate::error::{ProfileError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

/// An opened `.nvdaprofile` that is known to carry a descriptor entry.
pub struct Opened {
    pub path: PathBuf,
    pub zip: ZipArchive<BufReader<File>>,
}

impl Opened {
    pub fn open(path: &Path) -> Result<Self> {
        let f = File::open(path)
            .map_err(|e| ProfileError::invalid(path, format!("cannot open: {e}")))?;
        let mut zip = ZipArchive::new(BufReader::new(f))
            .map_err(|e| ProfileError::invalid(path, format!("not a zip container: {e}")))?;
        match zip.by_name(DESCRIPTOR_NAME) {
            Ok(_) => {}
            Err(ZipError::FileNotFound) => {
                return Err(ProfileError::invalid(
                    path,
                    format!("missing {DESCRIPTOR_NAME}"),
                ));
            }
            Err(e) => return Err(ProfileError::invalid(path, e.to_string())),
        }
        Ok(Self {
            path: path.to_path_buf(),
            zip,
        })
    }

    pub fn descriptor(&mut self) -> Result<ProfileDescriptor> {
        let mut buf = Vec::new();
        {
            let mut e = self
                .zip
                .by_name(DESCRIPTOR_NAME)
                .map_err(|e| ProfileError::invalid(&self.path, e.to_string()))?;
            e.read_to_end(&mut buf)
                .map_err(|e| ProfileError::invalid(&self.path, format!("descriptor read: {e}")))?;
        }
        ProfileDescriptor::from_json(&buf, &self.path)
    }

    /// Raw entry names in archive order, descriptor included.
    pub fn entry_names(&mut self) -> Result<Vec<String>> {
        (0..self.zip.len())
            .map(|i| {
                self.zip
                    .by_index_raw(i)
                    .map(|e| e.name().to_string())
                    .map_err(|e| ProfileError::invalid(&self.path, format!("entry {i}: {e}")))
            })
            .collect()
    }
}

