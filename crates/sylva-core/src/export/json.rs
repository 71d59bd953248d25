//! Raw buffer dump as JSON

use crate::Result;
use crate::pipeline::TreeOutput;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write every buffer and the stats of a tree as pretty-printed JSON
pub fn export_json(tree: &TreeOutput, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, tree)?;
    writer.flush()?;
    Ok(())
}
