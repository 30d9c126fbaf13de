#![deny(missing_docs)]

//! # Enrich Command
//!
//! Loads an OpenAPI document, the host manifest and the XML documentation files,
//! merges the comments into the document and writes it back out.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use xmldoc_core::{
    enrich_document, parse_document, render_document, ApiManifest, AppError, AppResult,
    CommentIndex, CrefDisplay, DocumentFormat, EnrichReport, HumanizeOptions,
};

/// Arguments for the enrich command.
#[derive(clap::Args, Debug, Clone)]
pub struct EnrichArgs {
    /// OpenAPI document to enrich (JSON or YAML).
    #[clap(long, env = "XMLDOC_OPENAPI")]
    pub openapi: PathBuf,

    /// Manifest binding operations to action methods (JSON or YAML).
    #[clap(long, env = "XMLDOC_MANIFEST")]
    pub manifest: PathBuf,

    /// XML documentation file. Repeatable; later files win for shared members.
    #[clap(long = "xml")]
    pub xml: Vec<PathBuf>,

    /// Directory searched recursively for `*.xml` documentation files.
    #[clap(long, env = "XMLDOC_XML_DIR")]
    pub xml_dir: Option<PathBuf>,

    /// Output file. Format follows its extension. Prints to stdout when omitted.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// How `cref` references render: `qualified` or `short`.
    #[clap(long, env = "XMLDOC_CREF_DISPLAY", default_value_t = CrefDisplay::Qualified)]
    pub cref_display: CrefDisplay,
}

/// Executes the enrich command.
pub fn execute(args: &EnrichArgs) -> AppResult<EnrichReport> {
    require_file(&args.openapi, "OpenAPI document")?;
    require_file(&args.manifest, "Manifest")?;

    let xml_files = collect_xml_files(&args.xml, args.xml_dir.as_deref())?;
    if xml_files.is_empty() {
        return Err(AppError::General(
            "No XML documentation files given (use --xml or --xml-dir)".into(),
        ));
    }

    let index = CommentIndex::load_all(&xml_files)?;
    let manifest = ApiManifest::load(&args.manifest)?;

    let input_format = DocumentFormat::from_path(&args.openapi);
    let text = fs::read_to_string(&args.openapi)?;
    let mut document = parse_document(&text, input_format)?;

    let options = HumanizeOptions {
        cref_display: args.cref_display,
    };
    let report = enrich_document(&mut document, &manifest, &index, &options)?;

    match &args.output {
        Some(output) => {
            let rendered = render_document(&document, DocumentFormat::from_path(output))?;
            fs::write(output, rendered).map_err(|e| {
                AppError::General(format!("Failed to write {:?}: {}", output, e))
            })?;
            println!(
                "Enriched {} operation(s), described {} tag(s) -> {:?}",
                report.enriched, report.tagged, output
            );
            for unmatched in &report.unmatched {
                println!("  not found: {}", unmatched);
            }
        }
        None => print!("{}", render_document(&document, input_format)?),
    }

    Ok(report)
}

fn require_file(path: &Path, what: &str) -> AppResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AppError::General(format!("{} not found: {:?}", what, path)))
    }
}

/// Explicit files first, then `*.xml` under `dir` in sorted order.
fn collect_xml_files(explicit: &[PathBuf], dir: Option<&Path>) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in explicit {
        require_file(path, "XML documentation file")?;
        files.push(path.clone());
    }

    if let Some(dir) = dir {
        if !dir.is_dir() {
            return Err(AppError::General(format!(
                "XML directory not found: {:?}",
                dir
            )));
        }
        let mut discovered = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| AppError::General(e.to_string()))?;
            let path = entry.path();
            let is_xml = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
            if entry.file_type().is_file() && is_xml {
                discovered.push(path.to_path_buf());
            }
        }
        discovered.sort();
        tracing::debug!(dir = %dir.display(), count = discovered.len(), "discovered XML files");
        files.extend(discovered.into_iter().filter(|p| !explicit.contains(p)));
    }
    Ok(files)
}
