//! Core library for the gametext command line application.
//!
//! The library converts game localization text between an editable Excel
//! workbook and a version-control-friendly structured store while keeping
//! record identities stable across edit cycles. Modules are structured to
//! keep responsibilities narrow and composable: workbook IO adapters live
//! under [`gametext::tools::io`], data representations inside
//! [`gametext::tools::model`], store persistence in
//! [`gametext::tools::store`], and the conversion orchestration under
//! [`gametext::tools::sync`].

pub mod gametext;

pub use gametext::tools::{Result, ToolError, config, error, fsutil, io, model, store, sync};
