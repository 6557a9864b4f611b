//! Artifact checksums (SHA-256), computed on demand for validation reports.
//!
//! Never inline with the pipeline itself; hashing a directory of grid maps
//! is only worth paying for when the operator asks for it.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded; grid maps can be large.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}

/// Digests the named artifacts inside `dir`, in the given order. Absent
/// files are reported as `None` rather than failing the whole listing.
pub fn digest_artifacts(dir: &Path, names: &[String]) -> Result<Vec<(String, Option<String>)>> {
    let mut digests = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(name);
        let digest = if path.is_file() {
            Some(sha256_path(&path)?)
        } else {
            None
        };
        digests.push((name.clone(), digest));
    }
    Ok(digests)
}
