pub mod credits;
pub mod extractor;
pub mod file_magic;
pub mod jwt;
pub mod month;
pub mod parameter_error_handler;
pub mod password;
pub mod payouts;
pub mod random_code;
pub mod recurrence;
pub mod sql;
pub mod validate;

pub use extractor::{SafeDocumentIdI64, SafeGuardianIdI64, SafeIDI64, SafePayoutIdI64};
pub use file_magic::{detect_document_mime, file_extension};
pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};
pub use sql::{escape_like_pattern, like_contains};
