//! File I/O: finding, reading and writing documents

pub mod reader;
pub mod resolver;
pub mod writer;

pub use reader::DocumentReader;
pub use resolver::{is_eligible, is_eligible_path, FileResolver, ResolvedFile, ResolverConfig};
pub use writer::{DocumentWriter, WriteOptions, WriteResult, WriterConfig};
