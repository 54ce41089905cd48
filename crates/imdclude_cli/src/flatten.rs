//! `imdclude -f FILE`: flattens a document's includes in place.
//!
//! The pipeline:
//!
//! 1. Open and parse the document
//! 2. Optionally back it up, before anything is changed
//! 3. Resolve includes against the lookup directory
//! 4. Write the result to `--output`, or back over the document

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use imdclude_document::{Document, Resolver};
use imdclude_source::DiskFs;

use crate::settings::Settings;

/// Arguments specific to flattening.
#[derive(Debug)]
pub struct FlattenArgs {
    /// The document to flatten.
    pub file: PathBuf,
    /// Destination; the document itself when `None`.
    pub output: Option<PathBuf>,
    /// Back up the document first.
    pub backup: bool,
}

/// Runs the flatten pipeline, reporting progress to `out`.
///
/// A document that fails to resolve is not written: every include error is
/// returned together and the original stays untouched.
pub fn run(
    args: &FlattenArgs,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    let fs = DiskFs;
    let mut doc = Document::load(&fs, &args.file, &settings.reader)?;
    tracing::debug!(
        "[{}] parsed {} line(s), {} include(s)",
        doc.name(),
        doc.lines().len(),
        doc.includes().len()
    );

    if args.backup {
        let result = settings.store.backup(doc.name(), doc.path(), doc.lines());
        let (location, status) = match result {
            Ok(ref receipt) => (receipt.path.display().to_string(), "SUCCESS"),
            Err(_) => (settings.store.dir().display().to_string(), "FAILED"),
        };
        writeln!(
            out,
            "Backed up {} to {}: {}",
            args.file.display(),
            location,
            status
        )?;
        let receipt = result?;
        writeln!(out, "backup ID: {}", receipt.id)?;
    }

    let resolver = Resolver::new(&fs, &settings.lookup_dir).with_options(settings.reader);
    resolver.resolve(&mut doc)?;
    doc.close();

    let target = args.output.as_ref().unwrap_or(&args.file);
    let mut writer = BufWriter::new(File::create(target)?);
    let written = doc.write_to(&mut writer)?;
    tracing::info!("wrote {} bytes to {}", written, target.display());
    Ok(0)
}
