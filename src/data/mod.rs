//! Input data handling

pub mod cnl;
pub mod reader;

pub use reader::InputFile;
