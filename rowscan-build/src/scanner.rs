//! Source file scanner extracting record definitions.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Serialize;
use syn::{Fields, Item, ItemStruct};

use crate::classify::classify;
use crate::error::{Error, Result};

/// One named field of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name as declared (raw identifiers keep their `r#` prefix)
    pub name: String,
    /// Normalized type, e.g. `i64`, `Option<String>`, `Vec<u8>`
    pub type_name: String,
    /// True for `Vec<T>`, `[T]` and `[T; N]`
    pub is_array: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, is_array: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_array,
        }
    }

    /// Column name used by the SQL helpers.
    pub fn column(&self) -> &str {
        self.name.strip_prefix("r#").unwrap_or(&self.name)
    }
}

/// A struct and its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Exact-match filter on record names.
///
/// Built from a comma-separated list. An empty whitelist retains every
/// record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    names: BTreeSet<String>,
}

impl Whitelist {
    pub fn parse(list: &str) -> Self {
        let names = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn allows(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }
}

impl From<&str> for Whitelist {
    fn from(list: &str) -> Self {
        Self::parse(list)
    }
}

/// Read a Rust source file and return its top-level records.
pub fn extract(path: impl AsRef<Path>, whitelist: &Whitelist) -> Result<Vec<RecordDescriptor>> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::EmptySourcePath);
    }

    let content = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = extract_source(&content, whitelist).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("{}: {} record(s)", path.display(), records.len());
    Ok(records)
}

/// Extract from several files, concatenating results in the given order.
pub fn extract_all<P: AsRef<Path>>(
    paths: &[P],
    whitelist: &Whitelist,
) -> Result<Vec<RecordDescriptor>> {
    let mut records = Vec::new();
    for path in paths {
        records.extend(extract(path, whitelist)?);
    }
    Ok(records)
}

/// Extract records from source text.
pub fn extract_source(content: &str, whitelist: &Whitelist) -> syn::Result<Vec<RecordDescriptor>> {
    let syntax = syn::parse_file(content)?;

    let records = syntax
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Struct(item_struct) => record_from_struct(item_struct),
            _ => None,
        })
        .filter(|record| whitelist.allows(&record.name))
        .collect();

    Ok(records)
}

fn record_from_struct(item: &ItemStruct) -> Option<RecordDescriptor> {
    let name = item.ident.to_string();
    if !item.generics.params.is_empty() {
        debug!("skipping generic struct {name}");
        return None;
    }

    let fields = match &item.fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|field| {
                let ident = field.ident.as_ref()?;
                let (type_name, is_array) = classify(&field.ty);
                Some(FieldDescriptor::new(ident.to_string(), type_name, is_array))
            })
            .collect(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            debug!("skipping tuple struct {name}");
            return None;
        }
    };

    Some(RecordDescriptor::new(name, fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist_parse() {
        let whitelist = Whitelist::parse("Exported, unexported,,");
        assert!(whitelist.allows("Exported"));
        assert!(whitelist.allows("unexported"));
        assert!(!whitelist.allows("exported"));
        assert!(!whitelist.allows("Export"));
        assert!(Whitelist::parse("").allows("Anything"));
        assert!(Whitelist::parse(" , ").is_empty());
    }

    #[test]
    fn test_extract_source_keeps_order() {
        let code = r#"
            struct B { z: i32, a: String }
            enum NotARecord { One }
            fn helper() {}
            struct A { m: Vec<u8>, n: Option<bool> }
        "#;

        let records = extract_source(code, &Whitelist::default()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);

        let fields: Vec<_> = records[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, ["z", "a"]);

        assert_eq!(records[1].fields[0], FieldDescriptor::new("m", "Vec<u8>", true));
        assert_eq!(records[1].fields[1], FieldDescriptor::new("n", "Option<bool>", false));
    }

    #[test]
    fn test_unit_and_tuple_structs() {
        let code = "struct Marker; struct Pair(i32, i32); struct Empty {}";
        let records = extract_source(code, &Whitelist::default()).unwrap();
        assert_eq!(
            records,
            vec![RecordDescriptor::new("Marker", vec![]), RecordDescriptor::new("Empty", vec![])]
        );
    }

    #[test]
    fn test_generic_structs_skipped() {
        let code = r#"
            struct Page<T> { items: Vec<T> }
            struct Borrowed<'a> { name: &'a str }
            struct Sized<const N: usize> { bytes: [u8; N] }
            struct Plain { id: i64 }
        "#;
        let records = extract_source(code, &Whitelist::default()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Plain"]);
    }

    #[test]
    fn test_nested_structs_ignored() {
        let code = "mod inner { pub struct Hidden { a: i32 } } struct Top { a: i32 }";
        let records = extract_source(code, &Whitelist::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Top");
    }

    #[test]
    fn test_raw_identifier_column() {
        let code = "struct Item { r#type: String }";
        let records = extract_source(code, &Whitelist::default()).unwrap();
        assert_eq!(records[0].fields[0].name, "r#type");
        assert_eq!(records[0].fields[0].column(), "type");
    }

    #[test]
    fn test_invalid_source() {
        assert!(extract_source("struct {", &Whitelist::default()).is_err());
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(extract("", &Whitelist::default()), Err(Error::EmptySourcePath)));
    }
}
