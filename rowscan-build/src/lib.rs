//! Row-scanning code generator.
//!
//! This crate reads Rust source files, extracts top-level struct
//! definitions and generates a module of functions that populate those
//! structs from `sqlx` Postgres rows. With extra helpers enabled it also
//! emits select, insert and update functions for each struct.
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     rowscan_build::scan_generator()
//!         .scan_path("src/models/")
//!         .output_file(format!("{}/scans.rs", std::env::var("OUT_DIR").unwrap()))
//!         .extra_helpers(true)
//!         .run()
//!         .expect("Failed to generate row scanners");
//!
//!     println!("cargo:rerun-if-changed=src/models/");
//! }
//! ```
//!
//! and in `src/models/mod.rs`:
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/scans.rs"));
//! ```

pub mod classify;
mod discovery;
mod error;
mod generator;
pub mod naming;
mod render;
mod scanner;

pub use classify::{TypeExpr, classify};
pub use discovery::find_files;
pub use error::{Error, Result};
pub use generator::{
    GeneratedUnit, GenerationOutcome, GenerationRequest, ScanGenerator, default_unit_name,
    function_names, generate, generate_with_outcome, render,
};
pub use naming::FunctionNames;
pub use render::{FunctionKind, GeneratedFunction};
pub use scanner::{
    FieldDescriptor, RecordDescriptor, Whitelist, extract, extract_all, extract_source,
};

/// Create a new generator with default settings.
///
/// # Example
///
/// ```ignore
/// rowscan_build::scan_generator()
///     .scan_path("src/")
///     .output_file("src/generated/scans.rs")
///     .run()
///     .expect("Failed to generate row scanners");
/// ```
pub fn scan_generator() -> ScanGenerator {
    ScanGenerator::new()
}
