//! OBJ file export

#![allow(clippy::uninlined_format_args)]

use crate::Result;
use crate::geometry::{GeometryData, bake_leaf_instances};
use crate::pipeline::TreeOutput;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export a tree to OBJ format
///
/// Branches and leaves are written as separate groups; instanced leaves are
/// baked into concrete geometry.
pub fn export_obj(tree: &TreeOutput, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let leaves = tree
        .leaf_geometry
        .as_ref()
        .map(|shape| bake_leaf_instances(shape, &tree.leaf_instances))
        .unwrap_or_default();

    // Header
    writeln!(writer, "# Sylva OBJ Export")?;
    writeln!(writer, "# Segments: {}", tree.stats.segment_count)?;
    writeln!(writer, "# Leaves: {}", tree.stats.leaf_count)?;
    writeln!(writer, "# Triangles: {}", tree.stats.triangle_count)?;
    writeln!(writer)?;

    write_group(&mut writer, "branches", &tree.branch_geometry, 0)?;
    write_group(
        &mut writer,
        "leaves",
        &leaves,
        tree.branch_geometry.vertex_count() as u32,
    )?;

    writer.flush()?;
    Ok(())
}

fn write_group<W: Write>(
    writer: &mut W,
    name: &str,
    geometry: &GeometryData,
    index_base: u32,
) -> Result<()> {
    if geometry.is_empty() {
        return Ok(());
    }

    writeln!(writer, "o {}", name)?;

    for p in geometry.positions.chunks_exact(3) {
        writeln!(writer, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for uv in geometry.uvs.chunks_exact(2) {
        writeln!(writer, "vt {} {}", uv[0], uv[1])?;
    }
    for n in geometry.normals.chunks_exact(3) {
        writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
    }

    // Faces (OBJ uses 1-based indexing)
    for tri in geometry.indices.chunks_exact(3) {
        let i0 = tri[0] + index_base + 1;
        let i1 = tri[1] + index_base + 1;
        let i2 = tri[2] + index_base + 1;
        writeln!(
            writer,
            "f {}/{}/{} {}/{}/{} {}/{}/{}",
            i0, i0, i0, i1, i1, i1, i2, i2, i2
        )?;
    }
    writeln!(writer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryData;

    #[test]
    fn leaf_faces_are_offset_past_branch_vertices() {
        let quad = GeometryData {
            positions: vec![0.0; 9],
            normals: vec![0.0; 9],
            uvs: vec![0.0; 6],
            indices: vec![0, 1, 2],
        };
        let mut buffer = Vec::new();
        write_group(&mut buffer, "leaves", &quad, 12).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("o leaves\n"));
        assert!(text.contains("f 13/13/13 14/14/14 15/15/15"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
    }

    #[test]
    fn empty_group_writes_nothing() {
        let mut buffer = Vec::new();
        write_group(&mut buffer, "leaves", &GeometryData::new(), 0).unwrap();
        assert!(buffer.is_empty());
    }
}
