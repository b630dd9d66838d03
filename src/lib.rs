//! Core library for the `ags4_cli` command line application.
//!
//! The command line front end lives in [`ags4::tools::cli`] and talks to the
//! format machinery only through the [`Ags4Library`] trait. The bundled
//! [`NativeLibrary`] wires that trait to the AGS4 text codec and spreadsheet
//! adapters under [`ags4::tools::io`], the TYPE-driven number formatting in
//! [`ags4::tools::format`], and the rule checks in [`ags4::tools::check`].

pub mod ags4;

pub use ags4::tools::{
    Result, ToolError, check, cli, convert, dictionary, error, format, io, library, model,
};
pub use ags4::tools::library::{Ags4Library, NativeLibrary};
