//! Decoding of batch result archives.
//!
//! A finished batch publishes a `.tar.gz` whose regular files each hold a
//! JSON array of operation results:
//!
//! ```text
//! [{"status_code": 200, "operation_id": "l7", "response": "{\"members\": [...]}"}]
//! ```
//!
//! The `response` field is itself a JSON document encoded as a string.

use std::io::Read;

use flate2::read::GzDecoder;
use serde::Deserialize;
use tar::Archive;

use crate::error::AppError;

/// One regular file extracted from an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: String,
    pub contents: Vec<u8>,
}

/// One operation result inside an archive file.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationResult {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Absent on entries that carry no payload.
    #[serde(default)]
    pub response: Option<String>,
}

/// Decoded `response` of a click-members operation.
#[derive(Debug, Clone, Deserialize)]
pub struct MembersPage {
    #[serde(default)]
    pub members: Vec<MemberClicks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberClicks {
    pub email_address: String,
    pub clicks: u64,
}

/// Visits every regular file of a gzip-compressed tar archive, in order.
///
/// Entries are decompressed one at a time and handed to `visit` by value, so
/// only the current entry is held in memory. Directories, links and other
/// special entries are skipped.
///
/// # Errors
///
/// Returns [`AppError::Archive`] if the bytes are not a valid `.tar.gz`.
/// Entries before the corrupt point have already been visited.
pub fn for_each_file_entry<F>(bytes: &[u8], mut visit: F) -> Result<(), AppError>
where
    F: FnMut(ArchiveEntry),
{
    let mut archive = Archive::new(GzDecoder::new(bytes));

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path()?.to_string_lossy().into_owned();
        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut contents)?;
        visit(ArchiveEntry { path, contents });
    }

    Ok(())
}

/// Parses an archive file as a list of operation results.
///
/// # Errors
///
/// Returns the JSON error if the file is not such a list.
pub fn parse_operation_results(contents: &[u8]) -> Result<Vec<OperationResult>, serde_json::Error> {
    serde_json::from_slice(contents)
}

/// Parses the string-encoded `response` of one operation.
///
/// # Errors
///
/// Returns the JSON error if the payload is not a members page.
pub fn parse_members(response: &str) -> Result<MembersPage, serde_json::Error> {
    serde_json::from_str(response)
}
