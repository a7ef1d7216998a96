use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rowscan_build::{
    GenerationRequest, Whitelist, default_unit_name, extract, find_files, generate_with_outcome,
};

use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Scan Functions",
        commands: &[
            "rowscan generate src/models              # Write scans.rs for every struct",
            "rowscan generate src/models -o src/models/scans.rs -u",
        ],
    },
    ExampleGroup {
        title: "SQL Helpers",
        commands: &[
            "rowscan generate src/models -f           # Add Select/Insert/Update helpers",
            "rowscan generate src/models -f -w Post,Comment -i crate::models",
        ],
    },
];

const DEFAULT_OUTPUT: &str = "scans.rs";

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Files or directories to scan (defaults to `paths` in rowscan.toml)
    pub paths: Vec<PathBuf>,

    /// Output file
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Name of the generated module (defaults to the output file stem)
    #[arg(short = 'p', long = "unit")]
    pub unit: Option<String>,

    /// Generate lower-case scan functions visible to the parent module only
    #[arg(short = 'u', long)]
    pub unexport: bool,

    /// Also generate Select, Insert and Update helpers
    #[arg(short = 'f', long)]
    pub funcs: bool,

    /// Only generate for these comma-separated struct names
    #[arg(short = 'w', long)]
    pub whitelist: Option<String>,

    /// Glob-import this path instead of `super::*`
    #[arg(short = 'i', long = "import")]
    pub import: Option<String>,
}

/// Command-line flags merged over the config file.
#[derive(Debug, PartialEq)]
pub struct ResolvedSettings {
    pub paths: Vec<PathBuf>,
    pub output: PathBuf,
    pub unit: String,
    pub unexport: bool,
    pub funcs: bool,
    pub whitelist: String,
    pub import: Option<String>,
}

impl GenerateArgs {
    pub fn resolve(self, ctx: &ProjectContext) -> ResolvedSettings {
        let settings = &ctx.config.generate;

        let paths = if self.paths.is_empty() {
            settings.paths.iter().map(|path| ctx.resolve(path)).collect()
        } else {
            self.paths
        };

        let output = self
            .out
            .or_else(|| settings.output.as_deref().map(|path| ctx.resolve(path)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let unit = self
            .unit
            .or_else(|| settings.unit.clone())
            .unwrap_or_else(|| default_unit_name(&output));

        ResolvedSettings {
            paths,
            output,
            unit,
            unexport: self.unexport || settings.unexport,
            funcs: self.funcs || settings.funcs,
            whitelist: self.whitelist.or_else(|| settings.whitelist.clone()).unwrap_or_default(),
            import: self.import.or_else(|| settings.import.clone()),
        }
    }
}

pub fn handle_generate(
    args: GenerateArgs,
    ctx: &ProjectContext,
    output: &OutputManager,
) -> Result<()> {
    let settings = args.resolve(ctx);

    let files = find_files(&settings.paths).context("Failed to locate input files")?;
    let files: Vec<PathBuf> = files
        .into_iter()
        .filter(|file| !is_output(file, &settings.output))
        .collect();

    let whitelist = Whitelist::parse(&settings.whitelist);
    let mut records = Vec::new();
    for file in &files {
        let found = extract(file, &whitelist)
            .with_context(|| format!("Failed to extract records from {}", file.display()))?;
        output.verbose(&format!("{}: {} record(s)", file.display(), found.len()));
        records.extend(found);
    }

    if records.is_empty() {
        output.warning("No structs matched; nothing to generate.");
        if !whitelist.is_empty() {
            output.info(&format!("Whitelist in effect: {}", settings.whitelist));
        }
        anyhow::bail!("no records found in {} file(s)", files.len());
    }

    let request = GenerationRequest {
        output_path: settings.output.clone(),
        unit_name: settings.unit,
        unexport: settings.unexport,
        extra_helpers: settings.funcs,
        import_path: settings.import,
        records,
    };

    let outcome = generate_with_outcome(&request)
        .with_context(|| format!("Failed to generate {}", settings.output.display()))?;

    if outcome.written {
        output.success(&format!(
            "Generated {} ({} functions for {} records)",
            settings.output.display(),
            outcome.functions.len(),
            request.records.len()
        ));
    } else {
        output.info(&format!("{} is up to date", settings.output.display()));
    }

    for name in &outcome.functions {
        output.verbose(name);
    }

    Ok(())
}

fn is_output(file: &Path, output: &Path) -> bool {
    match (file.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => file == output,
    }
}
