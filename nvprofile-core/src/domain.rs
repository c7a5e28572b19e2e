// nvprofile_core/src/domain.rs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackupSummary {
    pub files: u64,
    pub bytes: u64,
    /// Source files left out of the archive, by archive name.
    pub skipped: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub files: u64,
    pub bytes: u64,
    /// Where the previous contents were archived before being replaced.
    pub backup: Option<std::path::PathBuf>,
}
