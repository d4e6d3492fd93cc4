//! Wavefront-style text dump of generated spheres, for inspecting geometry
//! in external viewers. Write-only.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::spheres::SphereGeometry;

/// Write `geometry` as `v`, `vn` and `f v//n` records with 1-based indices.
pub fn write_obj<W: Write>(geometry: &SphereGeometry, mut out: W) -> io::Result<()> {
    writeln!(
        out,
        "# starmesh dump: {} vertices, {} normals, {} faces",
        geometry.vertices.len(),
        geometry.normals.len(),
        geometry.faces.len()
    )?;
    for v in &geometry.vertices {
        writeln!(out, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for n in &geometry.normals {
        writeln!(out, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
    }
    for f in &geometry.faces {
        writeln!(
            out,
            "f {}//{} {}//{} {}//{}",
            f.v[0] + 1,
            f.n[0] + 1,
            f.v[1] + 1,
            f.n[1] + 1,
            f.v[2] + 1,
            f.n[2] + 1
        )?;
    }
    out.flush()
}

/// Write `geometry` to a file at `path`, replacing it if it exists.
pub fn dump_obj(geometry: &SphereGeometry, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    write_obj(geometry, BufWriter::new(File::create(path)?))?;
    log::debug!("wrote {} faces to {}", geometry.faces.len(), path.display());
    Ok(())
}
