//! Code generator for row-scanning modules.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use proc_macro2::TokenStream;
use quote::quote;
use syn::visit::Visit;
use syn::{Ident, ItemFn};

use crate::discovery::find_files;
use crate::error::{Error, Result};
use crate::render::{GeneratedFunction, RecordContext, parse_ident};
use crate::scanner::{RecordDescriptor, Whitelist, extract_all};

/// Everything needed to render and write one generated unit.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// File the generated module is written to
    pub output_path: PathBuf,
    /// Name of the generated `pub mod`
    pub unit_name: String,
    /// Lower-case the scan family and restrict it to `pub(super)`
    pub unexport: bool,
    /// Also emit the select/insert/update helpers
    pub extra_helpers: bool,
    /// Path glob-imported in place of `super::*`
    pub import_path: Option<String>,
    pub records: Vec<RecordDescriptor>,
}

/// Structured form of a generated unit, before formatting.
#[derive(Clone)]
pub struct GeneratedUnit {
    unit: Ident,
    import: syn::Path,
    extra_helpers: bool,
    functions: Vec<GeneratedFunction>,
}

impl GeneratedUnit {
    /// Build the declarations for every record, in record-major order.
    pub fn build(request: &GenerationRequest) -> Result<Self> {
        if request.records.is_empty() {
            return Err(Error::input("no records to generate"));
        }

        let unit = parse_ident(&request.unit_name)?;
        let import = import_path(request.import_path.as_deref())?;

        let mut functions = Vec::new();
        for record in &request.records {
            let ctx = RecordContext::new(record, request.unexport)?;
            functions.extend(ctx.render(request.extra_helpers)?);
        }

        Ok(Self {
            unit,
            import,
            extra_helpers: request.extra_helpers,
            functions,
        })
    }

    /// The `pub mod` item. The file holds no inner attributes so it can be
    /// pulled into a parent module with `include!`.
    pub fn to_tokens(&self) -> TokenStream {
        let unit = &self.unit;
        let import = &self.import;
        let functions = self.functions.iter().map(|f| &f.tokens);
        let arguments = if self.extra_helpers {
            quote! { use ::sqlx::Arguments as _; }
        } else {
            TokenStream::new()
        };

        quote! {
            /// Row-scanning functions generated by rowscan. Do not edit manually.
            #[allow(non_snake_case, dead_code, unused_imports, unused_variables)]
            pub mod #unit {
                use #import::*;
                use ::sqlx::Row as _;
                #arguments

                #(#functions)*
            }
        }
    }

    /// Parse the rendered tokens back as a Rust file.
    pub fn validate(&self) -> Result<syn::File> {
        syn::parse2(self.to_tokens()).map_err(Error::Generation)
    }

    /// Validated and formatted source text.
    pub fn to_source(&self) -> Result<String> {
        let syntax_tree = self.validate()?;
        Ok(prettyplease::unparse(&syntax_tree))
    }
}

/// Result of a successful [`generate_with_outcome`] call.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Generated function names in declaration order
    pub functions: Vec<String>,
    /// False when the file already held identical content
    pub written: bool,
}

/// Render the request to formatted source without touching the filesystem.
pub fn render(request: &GenerationRequest) -> Result<String> {
    GeneratedUnit::build(request)?.to_source()
}

/// Render, validate and write the generated unit.
pub fn generate(request: &GenerationRequest) -> Result<()> {
    generate_with_outcome(request).map(|_| ())
}

pub fn generate_with_outcome(request: &GenerationRequest) -> Result<GenerationOutcome> {
    let unit = GeneratedUnit::build(request)?;
    if request.output_path.as_os_str().is_empty() {
        return Err(Error::EmptyOutputPath);
    }

    let code = unit.to_source()?;
    let written = write_output(&request.output_path, &code)?;
    if written {
        info!(
            "generated {} with {} record(s)",
            request.output_path.display(),
            request.records.len()
        );
    } else {
        debug!("{} is up to date", request.output_path.display());
    }

    Ok(GenerationOutcome {
        functions: unit.functions.iter().map(|f| f.name.clone()).collect(),
        written,
    })
}

/// Names of all functions declared in a file, in declaration order.
pub fn function_names(file: &syn::File) -> Vec<String> {
    struct Collector(Vec<String>);

    impl<'ast> Visit<'ast> for Collector {
        fn visit_item_fn(&mut self, item: &'ast ItemFn) {
            self.0.push(item.sig.ident.to_string());
            syn::visit::visit_item_fn(self, item);
        }
    }

    let mut collector = Collector(Vec::new());
    collector.visit_file(file);
    collector.0
}

fn import_path(import: Option<&str>) -> Result<syn::Path> {
    let import = match import.map(str::trim) {
        Some(import) if !import.is_empty() => import,
        _ => "super",
    };

    let path = syn::parse_str::<syn::Path>(import)
        .map_err(|_| Error::input(format!("import path `{import}` is not a Rust path")))?;
    if path.segments.iter().any(|segment| !segment.arguments.is_none()) {
        return Err(Error::input(format!(
            "import path `{import}` must not carry generic arguments"
        )));
    }

    Ok(path)
}

/// Write `code` to `path` unless it already holds the same content.
///
/// The content goes to a sibling temporary file first and is renamed into
/// place, so a failed write never leaves a truncated unit behind.
fn write_output(path: &Path, code: &str) -> Result<bool> {
    if let Ok(existing) = fs::read_to_string(path)
        && existing == code
    {
        return Ok(false);
    }

    let output_error = |source: std::io::Error| Error::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(output_error)?;
    }

    let mut temp_name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    temp_name.push(".rowscan-tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, code).map_err(output_error)?;
    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(output_error(source));
    }

    Ok(true)
}

/// Builder for running discovery, extraction and generation in one call.
pub struct ScanGenerator {
    scan_paths: Vec<PathBuf>,
    output_file: PathBuf,
    unit_name: Option<String>,
    whitelist: Whitelist,
    unexport: bool,
    extra_helpers: bool,
    import_path: Option<String>,
}

impl ScanGenerator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            scan_paths: Vec::new(),
            output_file: PathBuf::from("src/generated/scans.rs"),
            unit_name: None,
            whitelist: Whitelist::default(),
            unexport: false,
            extra_helpers: false,
            import_path: None,
        }
    }

    /// Add a file or directory to scan for records.
    ///
    /// Can be called multiple times; files are processed in the order given.
    pub fn scan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_paths.push(path.into());
        self
    }

    /// Set the output file path.
    ///
    /// Default: `src/generated/scans.rs`
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    /// Set the generated module name.
    ///
    /// Default: the output file stem
    pub fn unit_name(mut self, name: impl Into<String>) -> Self {
        self.unit_name = Some(name.into());
        self
    }

    /// Only generate for the named records (comma-separated).
    pub fn whitelist(mut self, list: &str) -> Self {
        self.whitelist = Whitelist::parse(list);
        self
    }

    pub fn unexport(mut self, unexport: bool) -> Self {
        self.unexport = unexport;
        self
    }

    /// Emit the select/insert/update helper family.
    pub fn extra_helpers(mut self, extra_helpers: bool) -> Self {
        self.extra_helpers = extra_helpers;
        self
    }

    /// Glob-import this path instead of `super::*`.
    pub fn import_path(mut self, path: impl Into<String>) -> Self {
        self.import_path = Some(path.into());
        self
    }

    /// Run the generator.
    pub fn run(self) -> Result<GenerationOutcome> {
        // Default to scanning "src/" if no paths specified
        let scan_paths = if self.scan_paths.is_empty() {
            vec![PathBuf::from("src/")]
        } else {
            self.scan_paths
        };

        let files = find_files(&scan_paths)?;
        // The output may live inside a scanned directory; never read it back.
        let files: Vec<PathBuf> = files
            .into_iter()
            .filter(|file| !same_file(file, &self.output_file))
            .collect();
        let records = extract_all(&files, &self.whitelist)?;

        let unit_name = self.unit_name.unwrap_or_else(|| default_unit_name(&self.output_file));

        generate_with_outcome(&GenerationRequest {
            output_path: self.output_file,
            unit_name,
            unexport: self.unexport,
            extra_helpers: self.extra_helpers,
            import_path: self.import_path,
            records,
        })
    }
}

impl Default for ScanGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Module name derived from an output file: `src/generated/scans.rs` -> `scans`.
pub fn default_unit_name(output: &Path) -> String {
    output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.replace(['-', '.', ' '], "_"))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "scans".to_string())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FieldDescriptor;

    fn request(records: Vec<RecordDescriptor>) -> GenerationRequest {
        GenerationRequest {
            output_path: PathBuf::from("unused.rs"),
            unit_name: "scans".to_string(),
            unexport: true,
            extra_helpers: false,
            import_path: None,
            records,
        }
    }

    #[test]
    fn test_import_path() {
        assert!(import_path(None).unwrap().is_ident("super"));
        assert!(import_path(Some("  ")).unwrap().is_ident("super"));

        let models = import_path(Some("crate::models")).unwrap();
        let segments: Vec<_> = models.segments.iter().map(|s| s.ident.to_string()).collect();
        assert_eq!(segments, ["crate", "models"]);

        assert!(import_path(Some("testsvc/storage/user")).is_err());
        assert!(import_path(Some("crate::Models<T>")).is_err());
    }

    #[test]
    fn test_empty_records_rejected() {
        assert!(matches!(render(&request(vec![])), Err(Error::Input { .. })));
    }

    #[test]
    fn test_bad_unit_name_rejected() {
        let mut req = request(vec![RecordDescriptor::new("A", vec![])]);
        req.unit_name = "not-a-module".to_string();
        assert!(matches!(render(&req), Err(Error::Input { .. })));
    }

    #[test]
    fn test_empty_record_scans() {
        let code = render(&request(vec![RecordDescriptor::new("Empty", vec![])])).unwrap();
        let file = syn::parse_file(&code).unwrap();
        assert_eq!(function_names(&file), ["scanEmpty", "scanEmptys"]);
        assert!(code.contains("Empty {}"));
    }

    #[test]
    fn test_unit_can_be_included() {
        let post = RecordDescriptor::new(
            "Post",
            vec![
                FieldDescriptor::new("id", "i64", false),
                FieldDescriptor::new("title", "String", false),
            ],
        );
        let code = render(&request(vec![post])).unwrap();

        let file = syn::parse_file(&code).unwrap();
        assert!(file.attrs.is_empty());
        assert!(file.shebang.is_none());
        let syn::Item::Mod(unit) = &file.items[0] else {
            panic!("expected a module item");
        };
        assert!(unit.attrs.iter().any(|attr| attr.path().is_ident("doc")));

        // Pasting the file into a parent module is what `include!` does.
        let parent =
            format!("mod models {{ pub struct Post {{ id: i64, title: String }} {code} }}");
        let parent: syn::ItemMod = syn::parse_str(&parent).unwrap();
        let (_, items) = parent.content.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_import_override_rendered() {
        let field = FieldDescriptor::new("x", "i32", false);
        let mut req = request(vec![RecordDescriptor::new("A", vec![field])]);
        let default = render(&req).unwrap();
        assert!(default.contains("use super::*;"));

        req.import_path = Some("crate::storage::user".to_string());
        let overridden = render(&req).unwrap();
        assert!(overridden.contains("use crate::storage::user::*;"));
        assert!(!overridden.contains("use super::*;"));
    }

    #[test]
    fn test_default_unit_name() {
        assert_eq!(default_unit_name(Path::new("src/generated/scans.rs")), "scans");
        assert_eq!(default_unit_name(Path::new("row-scans.rs")), "row_scans");
        assert_eq!(default_unit_name(Path::new("")), "scans");
    }
}
