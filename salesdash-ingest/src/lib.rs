//! salesdash-ingest: raw ledger rows (CSV file or sheet export) and the record normalizer.

pub mod csv_source;
pub mod error;
pub mod normalize;
pub mod raw;
pub mod sheet;

pub use error::{DataIntegrityError, IngestError};
pub use normalize::{NormalizeReport, Normalizer, QuantityPolicy, parse_money, parse_quantity};
pub use raw::{RawRow, columns};
