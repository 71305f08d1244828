//! Batch result archives: download and decoding.
//!
//! - [`HttpArchiveSource`] - [`crate::domain::gateways::ArchiveSource`] over plain HTTP
//! - [`reader`] - `.tar.gz` extraction and operation result parsing

mod http_source;
pub mod reader;

pub use http_source::HttpArchiveSource;
pub use reader::{
    ArchiveEntry, MemberClicks, MembersPage, OperationResult, for_each_file_entry,
    parse_members, parse_operation_results,
};
