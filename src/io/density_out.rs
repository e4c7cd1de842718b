use anyhow::Context;

use crate::model::histogram::DensityPoint;

/// Writes `center density` pairs, one bin per line, no header. Values are
/// printed in shortest round-trip form so reading the file back is lossless.
pub fn write_density<W: std::io::Write>(mut out: W, points: &[DensityPoint]) -> anyhow::Result<()> {
    for p in points {
        writeln!(out, "{} {}", p.center, p.density)?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_density_file(
    path: impl AsRef<std::path::Path>,
    points: &[DensityPoint],
) -> anyhow::Result<std::path::PathBuf> {
    let path = path.as_ref().to_path_buf();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).context("create output dir failed")?;
    }
    let f = std::fs::File::create(&path)
        .with_context(|| format!("create density file failed (path={:?})", path))?;
    write_density(std::io::BufWriter::new(f), points)?;
    Ok(path)
}
