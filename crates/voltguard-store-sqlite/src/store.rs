//! [`SqliteStore`] — the SQLite implementation of [`AssetStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use voltguard_core::{
  asset::Asset, document::CertificationDocument, store::AssetStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAsset, RawDocument, encode_applied_to, encode_asset_class, encode_date,
    encode_dt, encode_glove_color, encode_glove_size, encode_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Column lists ────────────────────────────────────────────────────────────

const ASSET_COLUMNS: &str = "asset_id, org_id, serial_number, asset_class, \
                             glove_size, glove_color, assigned_user_id, \
                             issue_date, last_certification_date, \
                             next_certification_date, status, failure_date, \
                             failure_reason, testing_start_date, created_at";

const DOCUMENT_COLUMNS: &str = "document_id, asset_id, org_id, file_name, \
                                file_url, content_hash, upload_date, \
                                uploaded_by, applied_to_assets";

fn read_asset_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAsset> {
  Ok(RawAsset {
    asset_id:                row.get(0)?,
    org_id:                  row.get(1)?,
    serial_number:           row.get(2)?,
    asset_class:             row.get(3)?,
    glove_size:              row.get(4)?,
    glove_color:             row.get(5)?,
    assigned_user_id:        row.get(6)?,
    issue_date:              row.get(7)?,
    last_certification_date: row.get(8)?,
    next_certification_date: row.get(9)?,
    status:                  row.get(10)?,
    failure_date:            row.get(11)?,
    failure_reason:          row.get(12)?,
    testing_start_date:      row.get(13)?,
    created_at:              row.get(14)?,
  })
}

fn read_document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDocument> {
  Ok(RawDocument {
    document_id:       row.get(0)?,
    asset_id:          row.get(1)?,
    org_id:            row.get(2)?,
    file_name:         row.get(3)?,
    file_url:          row.get(4)?,
    content_hash:      row.get(5)?,
    upload_date:       row.get(6)?,
    uploaded_by:       row.get(7)?,
    applied_to_assets: row.get(8)?,
  })
}

// ─── Encoded rows ────────────────────────────────────────────────────────────

/// Column values for an `assets` row, pre-encoded so the rusqlite closure
/// can take ownership.
struct EncodedAsset {
  asset_id:                String,
  org_id:                  String,
  serial_number:           String,
  asset_class:             String,
  glove_size:              Option<String>,
  glove_color:             Option<String>,
  assigned_user_id:        Option<String>,
  issue_date:              String,
  last_certification_date: String,
  next_certification_date: String,
  status:                  String,
  failure_date:            Option<String>,
  failure_reason:          Option<String>,
  testing_start_date:      Option<String>,
  created_at:              String,
}

impl EncodedAsset {
  fn from_asset(asset: &Asset) -> Self {
    Self {
      asset_id:                encode_uuid(asset.asset_id),
      org_id:                  encode_uuid(asset.org_id),
      serial_number:           asset.serial_number.clone(),
      asset_class:             encode_asset_class(asset.asset_class).to_owned(),
      glove_size:              asset
        .glove_size
        .map(|s| encode_glove_size(s).to_owned()),
      glove_color:             asset
        .glove_color
        .map(|c| encode_glove_color(c).to_owned()),
      assigned_user_id:        asset.assigned_user_id.map(encode_uuid),
      issue_date:              encode_date(asset.issue_date),
      last_certification_date: encode_date(asset.last_certification_date),
      next_certification_date: encode_date(asset.next_certification_date),
      status:                  encode_status(asset.status).to_owned(),
      failure_date:            asset.failure_date.map(encode_date),
      failure_reason:          asset.failure_reason.clone(),
      testing_start_date:      asset.testing_start_date.map(encode_date),
      created_at:              encode_dt(asset.created_at),
    }
  }
}

struct EncodedDocument {
  document_id:       String,
  asset_id:          String,
  org_id:            String,
  file_name:         String,
  file_url:          String,
  content_hash:      String,
  upload_date:       String,
  uploaded_by:       String,
  applied_to_assets: String,
}

impl EncodedDocument {
  fn from_document(doc: &CertificationDocument) -> Result<Self> {
    Ok(Self {
      document_id:       encode_uuid(doc.document_id),
      asset_id:          encode_uuid(doc.asset_id),
      org_id:            encode_uuid(doc.org_id),
      file_name:         doc.file_name.clone(),
      file_url:          doc.file_url.clone(),
      content_hash:      doc.content_hash.clone(),
      upload_date:       encode_dt(doc.upload_date),
      uploaded_by:       encode_uuid(doc.uploaded_by),
      applied_to_assets: encode_applied_to(&doc.applied_to_assets)?,
    })
  }
}

const INSERT_DOCUMENT_SQL: &str = "INSERT INTO certification_documents (
     document_id, asset_id, org_id, file_name, file_url, content_hash,
     upload_date, uploaded_by, applied_to_assets
   ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

fn insert_document_tx(
  tx: &rusqlite::Transaction<'_>,
  e: &EncodedDocument,
) -> rusqlite::Result<()> {
  tx.execute(
    INSERT_DOCUMENT_SQL,
    rusqlite::params![
      e.document_id,
      e.asset_id,
      e.org_id,
      e.file_name,
      e.file_url,
      e.content_hash,
      e.upload_date,
      e.uploaded_by,
      e.applied_to_assets,
    ],
  )?;
  Ok(())
}

const UPDATE_ASSET_SQL: &str = "UPDATE assets SET
     serial_number           = ?3,
     asset_class             = ?4,
     glove_size              = ?5,
     glove_color             = ?6,
     assigned_user_id        = ?7,
     issue_date              = ?8,
     last_certification_date = ?9,
     next_certification_date = ?10,
     status                  = ?11,
     failure_date            = ?12,
     failure_reason          = ?13,
     testing_start_date      = ?14
   WHERE asset_id = ?1 AND org_id = ?2";

fn update_asset_stmt(
  conn: &rusqlite::Connection,
  e: &EncodedAsset,
) -> rusqlite::Result<usize> {
  conn.execute(
    UPDATE_ASSET_SQL,
    rusqlite::params![
      e.asset_id,
      e.org_id,
      e.serial_number,
      e.asset_class,
      e.glove_size,
      e.glove_color,
      e.assigned_user_id,
      e.issue_date,
      e.last_certification_date,
      e.next_certification_date,
      e.status,
      e.failure_date,
      e.failure_reason,
      e.testing_start_date,
    ],
  )
}

fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Voltguard asset store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_asset_where(
    &self,
    clause: &'static str,
    key: String,
    org_id: Uuid,
  ) -> Result<Option<Asset>> {
    let org_str = encode_uuid(org_id);
    let sql = format!(
      "SELECT {ASSET_COLUMNS} FROM assets WHERE org_id = ?1 AND {clause} = ?2"
    );

    let raw: Option<RawAsset> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![org_str, key], read_asset_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAsset::into_asset).transpose()
  }
}

// ─── AssetStore impl ─────────────────────────────────────────────────────────

impl AssetStore for SqliteStore {
  type Error = Error;

  // ── Assets ────────────────────────────────────────────────────────────────

  async fn insert_asset(&self, asset: Asset) -> Result<()> {
    let e = EncodedAsset::from_asset(&asset);
    let serial = asset.serial_number.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO assets ({ASSET_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
          ),
          rusqlite::params![
            e.asset_id,
            e.org_id,
            e.serial_number,
            e.asset_class,
            e.glove_size,
            e.glove_color,
            e.assigned_user_id,
            e.issue_date,
            e.last_certification_date,
            e.next_certification_date,
            e.status,
            e.failure_date,
            e.failure_reason,
            e.testing_start_date,
            e.created_at,
          ],
        )?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(()),
      Err(ref err) if is_unique_violation(err) => {
        Err(Error::DuplicateSerial(serial))
      }
      Err(err) => Err(err.into()),
    }
  }

  async fn get_asset(&self, org_id: Uuid, asset_id: Uuid) -> Result<Option<Asset>> {
    self
      .get_asset_where("asset_id", encode_uuid(asset_id), org_id)
      .await
  }

  async fn find_by_serial(
    &self,
    org_id: Uuid,
    serial_number: &str,
  ) -> Result<Option<Asset>> {
    self
      .get_asset_where("serial_number", serial_number.to_owned(), org_id)
      .await
  }

  async fn list_assets(
    &self,
    org_id: Uuid,
    assigned_to: Option<Uuid>,
  ) -> Result<Vec<Asset>> {
    let org_str = encode_uuid(org_id);
    let assignee_str = assigned_to.map(encode_uuid);

    let raws: Vec<RawAsset> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(user) = assignee_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets
             WHERE org_id = ?1 AND assigned_user_id = ?2
             ORDER BY serial_number"
          ))?;
          stmt
            .query_map(rusqlite::params![org_str, user], read_asset_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets
             WHERE org_id = ?1
             ORDER BY serial_number"
          ))?;
          stmt
            .query_map(rusqlite::params![org_str], read_asset_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAsset::into_asset).collect()
  }

  async fn update_asset(&self, asset: Asset) -> Result<()> {
    let e = EncodedAsset::from_asset(&asset);
    let asset_id = asset.asset_id;
    let serial = asset.serial_number.clone();

    let outcome = self
      .conn
      .call(move |conn| Ok(update_asset_stmt(conn, &e)?))
      .await;

    match outcome {
      Ok(0) => Err(Error::AssetNotFound(asset_id)),
      Ok(_) => Ok(()),
      Err(ref err) if is_unique_violation(err) => {
        Err(Error::DuplicateSerial(serial))
      }
      Err(err) => Err(err.into()),
    }
  }

  async fn delete_asset(&self, org_id: Uuid, asset_id: Uuid) -> Result<()> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(asset_id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM assets WHERE org_id = ?1 AND asset_id = ?2",
          rusqlite::params![org_str, id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::AssetNotFound(asset_id));
    }
    Ok(())
  }

  // ── Certification ─────────────────────────────────────────────────────────

  async fn record_certification(
    &self,
    asset: Asset,
    document: CertificationDocument,
  ) -> Result<()> {
    let asset_id = asset.asset_id;
    let e_asset = EncodedAsset::from_asset(&asset);
    let e_doc = EncodedDocument::from_document(&document)?;

    let updated: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let updated = update_asset_stmt(&tx, &e_asset)?;
        if updated == 0 {
          // Dropping the transaction rolls it back.
          return Ok(0);
        }
        insert_document_tx(&tx, &e_doc)?;
        tx.commit()?;
        Ok(updated)
      })
      .await?;

    if updated == 0 {
      return Err(Error::AssetNotFound(asset_id));
    }
    Ok(())
  }

  async fn list_documents(
    &self,
    org_id: Uuid,
    asset_id: Uuid,
  ) -> Result<Vec<CertificationDocument>> {
    let org_str = encode_uuid(org_id);
    let id_str = encode_uuid(asset_id);

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DOCUMENT_COLUMNS} FROM certification_documents
           WHERE org_id = ?1 AND asset_id = ?2
           ORDER BY upload_date, document_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![org_str, id_str], read_document_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }
}
