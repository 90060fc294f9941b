mod document;
pub mod dump;

pub use document::ByteBuffer;
pub use dump::{format_rows, render_text, DumpRow, BYTES_PER_ROW};

use thiserror::Error;

/// バッファ操作のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("Row {0} is out of range ({1} rows)")]
    RowOutOfRange(usize, usize),
    #[error("No edit is open")]
    NoOpenEdit,
    #[error("Edit targets row {0}, which no longer exists")]
    StaleEdit(usize),
}
