pub mod check;
pub mod cli;
pub mod convert;
pub mod dictionary;
pub mod error;
pub mod format;
pub mod io;
pub mod library;
pub mod model;

pub use error::{Result, ToolError};
