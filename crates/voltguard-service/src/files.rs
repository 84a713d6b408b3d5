//! Certification document blob storage.
//!
//! The store keeps only metadata (`file_url`, `content_hash`); the bytes
//! live behind this trait. [`LocalFileStorage`] writes them under a root
//! directory keyed by org and asset.

use std::{future::Future, path::PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;
use voltguard_core::{Error, Result};

/// Where a stored blob ended up.
#[derive(Debug, Clone)]
pub struct StoredFile {
  pub file_url:     String,
  /// SHA-256 of the contents, lowercase hex.
  pub content_hash: String,
}

pub trait FileStorage: Send + Sync {
  fn put<'a>(
    &'a self,
    org_id: Uuid,
    asset_id: Uuid,
    file_name: &'a str,
    contents: &'a [u8],
  ) -> impl Future<Output = Result<StoredFile>> + Send + 'a;
}

/// Blob storage on the local filesystem, laid out as
/// `<root>/<org_id>/<asset_id>/<file_name>`.
pub struct LocalFileStorage {
  root: PathBuf,
}

impl LocalFileStorage {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }
}

impl FileStorage for LocalFileStorage {
  async fn put(
    &self,
    org_id: Uuid,
    asset_id: Uuid,
    file_name: &str,
    contents: &[u8],
  ) -> Result<StoredFile> {
    let name = sanitize_file_name(file_name)?;

    let dir = self.root.join(org_id.to_string()).join(asset_id.to_string());
    tokio::fs::create_dir_all(&dir)
      .await
      .map_err(|e| Error::Store(format!("create document dir: {e}")))?;

    let path = dir.join(&name);
    tokio::fs::write(&path, contents)
      .await
      .map_err(|e| Error::Store(format!("write document: {e}")))?;

    Ok(StoredFile {
      file_url:     format!("{org_id}/{asset_id}/{name}"),
      content_hash: content_hash(contents),
    })
  }
}

pub fn content_hash(contents: &[u8]) -> String {
  hex::encode(Sha256::digest(contents))
}

/// Reduce a client-supplied name to its final path component and refuse
/// empty or dot-only names.
pub fn sanitize_file_name(file_name: &str) -> Result<String> {
  let name = file_name
    .rsplit(['/', '\\'])
    .next()
    .unwrap_or(file_name)
    .trim();
  if name.is_empty() || name == "." || name == ".." {
    return Err(Error::Validation(format!(
      "invalid document file name {file_name:?}"
    )));
  }
  Ok(name.to_string())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sanitize_strips_directories() {
    assert_eq!(sanitize_file_name("cert.pdf").unwrap(), "cert.pdf");
    assert_eq!(sanitize_file_name("a/b/cert.pdf").unwrap(), "cert.pdf");
    assert_eq!(sanitize_file_name("..\\cert.pdf").unwrap(), "cert.pdf");
    assert!(sanitize_file_name("").is_err());
    assert!(sanitize_file_name("docs/..").is_err());
  }

  #[test]
  fn hash_is_sha256_hex() {
    assert_eq!(
      content_hash(b"abc"),
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
    );
  }
}
