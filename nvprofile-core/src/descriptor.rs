use crate::error::{ProfileError, Result};
use crate::settings::Identity;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Reserved entry name; always the first entry of a profile archive.
pub const DESCRIPTOR_NAME: &str = "profile_descriptor.json";

/// Who made a backup, where, when and from which directory.
///
/// Field names on disk are fixed by existing `.nvdaprofile` files. Older writers emitted `null`
/// for an unset user or host, so every field reads `null` or a missing key as empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDescriptor {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub computer_name: String,
    /// ISO-8601 timestamp.
    #[serde(rename = "created_date", default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    /// Absolute source directory at backup time. Informational only.
    #[serde(rename = "nvda_path", default, deserialize_with = "null_as_empty")]
    pub source_path: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

impl ProfileDescriptor {
    pub fn capture(source: &Path, identity: &Identity, now: OffsetDateTime) -> Self {
        Self {
            username: identity.username.clone(),
            computer_name: identity.computer_name.clone(),
            // Rfc3339 only fails for offsets/years it cannot represent
            created_at: now.format(&Rfc3339).unwrap_or_else(|_| now.to_string()),
            source_path: source.display().to_string(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e).into())
    }

    pub fn from_json(bytes: &[u8], archive: &Path) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| ProfileError::invalid(archive, format!("descriptor decode: {e}")))
    }
}

/// Current time with the local offset when the platform can report it, else UTC.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn identity() -> Identity {
        Identity {
            username: "alice".into(),
            computer_name: "DESKTOP-1".into(),
        }
    }

    #[test]
    fn json_uses_legacy_keys() {
        let d = ProfileDescriptor::capture(
            Path::new("/home/alice/.config/nvda"),
            &identity(),
            datetime!(2024-03-01 10:20:30 UTC),
        );
        let v: serde_json::Value = serde_json::from_slice(&d.to_json().unwrap()).unwrap();
        assert_eq!(v["username"], "alice");
        assert_eq!(v["computer_name"], "DESKTOP-1");
        assert_eq!(v["created_date"], "2024-03-01T10:20:30Z");
        assert_eq!(v["nvda_path"], "/home/alice/.config/nvda");
    }

    #[test]
    fn decodes_what_it_encodes() {
        let d = ProfileDescriptor::capture(
            Path::new("C:\\Users\\bob\\AppData\\Roaming\\nvda"),
            &identity(),
            datetime!(2023-12-31 23:59:59 +01:00),
        );
        let back = ProfileDescriptor::from_json(&d.to_json().unwrap(), Path::new("x")).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn tolerates_nulls_and_missing_keys() {
        let raw = br#"{"username": null, "created_date": "2024-01-01T12:00:00.000001"}"#;
        let d = ProfileDescriptor::from_json(raw, Path::new("old.nvdaprofile")).unwrap();
        assert_eq!(d.username, "");
        assert_eq!(d.computer_name, "");
        assert_eq!(d.created_at, "2024-01-01T12:00:00.000001");
    }

    #[test]
    fn rejects_non_object() {
        let err = ProfileDescriptor::from_json(b"[1, 2]", Path::new("bad")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArchive);
        let err = ProfileDescriptor::from_json(b"not json", Path::new("bad")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArchive);
    }
}
