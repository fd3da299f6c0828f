mod batch;
mod record_parser;

pub use batch::Batch;
pub use record_parser::{FieldViolation, RecordParser, ValidationFailure, FIELD_COUNT};
