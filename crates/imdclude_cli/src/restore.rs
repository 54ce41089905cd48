//! `imdclude --restore ID`: writes a backup back over its original document.

use std::io::Write;

use crate::settings::Settings;

/// Restores the backup with `id`, reporting progress to `out`.
pub fn run(
    id: &str,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    let record = settings.store.find(id)?;
    writeln!(
        out,
        "restoring backup {} to {}",
        record.id,
        record.original_path.display()
    )?;
    settings.store.restore_record(&record)?;
    Ok(0)
}
