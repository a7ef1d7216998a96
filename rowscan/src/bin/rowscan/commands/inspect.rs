use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use rowscan_build::{RecordDescriptor, Whitelist, extract, find_files};
use serde::Serialize;

use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, themed_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Inspect Records",
    commands: &[
        "rowscan inspect src/models               # List structs and field types",
        "rowscan inspect src/models -w Post --format json",
    ],
}];

#[derive(Args, Debug, Default)]
pub struct InspectArgs {
    /// Files or directories to scan (defaults to `paths` in rowscan.toml)
    pub paths: Vec<PathBuf>,

    /// Only show these comma-separated struct names
    #[arg(short = 'w', long)]
    pub whitelist: Option<String>,
}

/// Records found in one source file
#[derive(Debug, Serialize)]
pub struct FileRecords {
    pub file: PathBuf,
    pub records: Vec<RecordDescriptor>,
}

impl TableDisplay for Vec<FileRecords> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options, &["File", "Record", "#", "Field", "Type", "Array"]);

        for entry in self {
            for record in &entry.records {
                if record.fields.is_empty() {
                    table.add_row(vec![
                        Cell::new(entry.file.display()),
                        Cell::new(&record.name),
                        Cell::new("-"),
                        Cell::new(""),
                        Cell::new(""),
                        Cell::new(""),
                    ]);
                }
                for (ordinal, field) in record.fields.iter().enumerate() {
                    table.add_row(vec![
                        Cell::new(entry.file.display()),
                        Cell::new(&record.name),
                        Cell::new(ordinal),
                        Cell::new(&field.name),
                        Cell::new(&field.type_name),
                        Cell::new(if field.is_array { "yes" } else { "" }),
                    ]);
                }
            }
        }

        table
    }

    fn to_compact(&self) -> String {
        self.iter()
            .flat_map(|entry| &entry.records)
            .map(|record| {
                let fields: Vec<String> = record
                    .fields
                    .iter()
                    .map(|field| format!("{}: {}", field.name, field.type_name))
                    .collect();
                format!("{}({})", record.name, fields.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn handle_inspect(
    args: InspectArgs,
    ctx: &ProjectContext,
    output: &OutputManager,
) -> Result<()> {
    let paths = if args.paths.is_empty() {
        ctx.config.generate.paths.iter().map(|path| ctx.resolve(path)).collect()
    } else {
        args.paths
    };
    let whitelist = Whitelist::parse(
        args.whitelist
            .as_deref()
            .or(ctx.config.generate.whitelist.as_deref())
            .unwrap_or_default(),
    );

    let files = find_files(&paths).context("Failed to locate input files")?;

    let mut report = Vec::with_capacity(files.len());
    for file in files {
        let records = extract(&file, &whitelist)
            .with_context(|| format!("Failed to extract records from {}", file.display()))?;
        if !records.is_empty() {
            report.push(FileRecords { file, records });
        }
    }

    let total: usize = report.iter().map(|entry| entry.records.len()).sum();
    output.display(&report)?;
    output.key_value("Records", &total.to_string());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowscan_build::FieldDescriptor;

    fn report() -> Vec<FileRecords> {
        vec![FileRecords {
            file: PathBuf::from("src/models/post.rs"),
            records: vec![
                RecordDescriptor::new(
                    "Post",
                    vec![
                        FieldDescriptor::new("id", "i64", false),
                        FieldDescriptor::new("tags", "Vec<String>", true),
                    ],
                ),
                RecordDescriptor::new("Marker", vec![]),
            ],
        }]
    }

    #[test]
    fn test_compact() {
        assert_eq!(report().to_compact(), "Post(id: i64, tags: Vec<String>)\nMarker()");
    }

    #[test]
    fn test_table_lists_fields() {
        let options = GlobalOptions {
            no_color: true,
            ..Default::default()
        };
        let rendered = report().to_table(&options).to_string();
        assert!(rendered.contains("Vec<String>"));
        assert!(rendered.contains("Marker"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json[0]["records"][0]["fields"][1]["is_array"], true);
        assert_eq!(json[0]["records"][0]["name"], "Post");
    }
}
