//! Reading and writing primitives shared by the coders.

mod reader;
mod writer;
pub mod text;

pub use reader::ByteReader;
pub use writer::ByteWriter;
