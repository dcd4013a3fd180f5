// src/data/write.rs

use anyhow::{Context, Result};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{fs::File, path::Path};
use tracing::info;

use super::NameTable;

/// Write the cleaned table as a single Snappy-compressed Parquet file.
pub fn write_parquet(table: &NameTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let batch = table.batch();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for name table")?;
    writer.write(batch).context("writing name table batch")?;
    writer.close().context("closing name table writer")?;

    info!(rows = batch.num_rows(), path = %path.display(), "wrote cleaned table");
    Ok(())
}
