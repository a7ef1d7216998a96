//! Identifier derivation for generated functions.

/// Lower-case the first character when `unexport` is set.
pub fn base_name(name: &str, unexport: bool) -> String {
    if unexport { lower_first(name) } else { name.to_string() }
}

/// Record name with its first character upper-cased. Used for the helper
/// family, which is always exported.
pub fn exported_name(name: &str) -> String {
    upper_first(name)
}

/// Plural form: a single trailing `s`, nothing more.
pub fn pluralize(name: &str) -> String {
    format!("{name}s")
}

/// Convert PascalCase to snake_case.
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Every function name generated for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNames {
    pub scan: String,
    pub scan_plural: String,
    pub select: String,
    pub select_plural: String,
    pub slice: String,
    pub insert: String,
    pub update: String,
}

impl FunctionNames {
    pub fn new(record: &str, unexport: bool) -> Self {
        let exported = exported_name(record);
        let scan = base_name(&format!("Scan{exported}"), unexport);
        let select = format!("Select{exported}");

        Self {
            scan_plural: pluralize(&scan),
            scan,
            select_plural: pluralize(&select),
            select,
            slice: format!("slice{exported}"),
            insert: format!("Insert{exported}"),
            update: format!("Update{exported}"),
        }
    }

    /// Names in emission order.
    pub fn ordered(&self, extra_helpers: bool) -> Vec<&str> {
        let mut names = vec![self.scan.as_str(), self.scan_plural.as_str()];
        if extra_helpers {
            names.extend([
                self.select.as_str(),
                self.select_plural.as_str(),
                self.slice.as_str(),
                self.insert.as_str(),
                self.update.as_str(),
            ]);
        }
        names
    }
}
