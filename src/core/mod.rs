pub mod error;
pub mod types;
pub mod value;

pub use error::{BoardError, Result};
pub use types::{Fields, ID_FIELD, Record, RecordId, RecordMeta};
pub use value::{as_number, compare_values, display_form, is_blank};
