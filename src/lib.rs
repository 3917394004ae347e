//! # `esm-endian`
//!
//! A schema-driven converter for Xbox 360 (big-endian) Bethesda ESM/ESP/ESL
//! plugin files, rewriting them to PC (little-endian) format in a single
//! length-preserving pass.
//!
//! ## Quick Start
//!
//! ```no_run
//! use esm_endian::converter::{convert, ConvertOptions};
//!
//! let input = std::fs::read("plugin.esm")?;
//! let (output, stats) = convert(&input, &ConvertOptions::default())?;
//! std::fs::write("plugin.pc.esm", output)?;
//! println!("converted {} records", stats.records_converted);
//! # Ok::<(), esm_endian::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `esm-endian` command-line binary

pub mod binary;
pub mod converter;
pub mod error;
pub mod model;
pub mod parser;
pub mod scanner;
pub mod schema;
pub mod subrecord;

pub use error::{Error, Result};

/// Common imports for library consumers.
pub mod prelude {
    pub use crate::converter::{convert, ConvertOptions, Stats};
    pub use crate::error::{Error, Result};
    pub use crate::model::{FileHeader, GrupHeader, RecordDescriptor, RecordHeader, SubrecordView};
    pub use crate::scanner::scan_records;
    pub use crate::subrecord::parse_subrecords;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "cli")]
pub mod cli;
