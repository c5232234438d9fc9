//! Read path for an ORC-family columnar file format.
//!
//! The crate recovers the self-describing trailer (postscript, footer,
//! metadata), rebuilds the typed schema, and materializes per-stripe column
//! readers that decode the run-length-encoded streams into caller-owned
//! columnar batches.
//!
//! ```no_run
//! use orclite::io::source::read_local_file;
//! use orclite::reader::{open, ReaderOptions};
//!
//! # fn main() -> orclite::Result<()> {
//! let source = read_local_file("data.orc")?;
//! let mut reader = open(Box::new(source), ReaderOptions::default())?;
//! let mut batch = reader.create_row_batch(1024)?;
//! while reader.next(&mut batch)? {
//!     println!("{batch}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod column;
pub mod error;
pub mod io;
pub mod proto;
pub mod reader;
pub mod rle;
pub mod schema;
pub mod stats;
pub mod vector;

pub use error::{OrcError, Result};
pub use reader::{open, Reader, ReaderOptions, StripeInformation};
pub use schema::{Type, TypeKind};
pub use vector::{BatchContent, ColumnVectorBatch};
