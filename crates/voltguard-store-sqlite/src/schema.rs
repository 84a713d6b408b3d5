//! SQL schema for the Voltguard SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS assets (
    asset_id                TEXT PRIMARY KEY,
    org_id                  TEXT NOT NULL,
    serial_number           TEXT NOT NULL,
    asset_class             TEXT NOT NULL,   -- 'class_00' .. 'class_4'
    glove_size              TEXT,            -- 'size_7' .. 'size_12'
    glove_color             TEXT,            -- 'red'|'yellow'|'black'|'beige'
    assigned_user_id        TEXT,
    issue_date              TEXT NOT NULL,   -- YYYY-MM-DD
    last_certification_date TEXT NOT NULL,
    next_certification_date TEXT NOT NULL,
    status                  TEXT NOT NULL,   -- serde kebab-case label
    failure_date            TEXT,
    failure_reason          TEXT,
    testing_start_date      TEXT,
    created_at              TEXT NOT NULL,   -- ISO 8601 UTC
    UNIQUE (org_id, serial_number)
);

-- Documents are immutable and exclusively owned; they disappear only with
-- their asset.
CREATE TABLE IF NOT EXISTS certification_documents (
    document_id       TEXT PRIMARY KEY,
    asset_id          TEXT NOT NULL REFERENCES assets(asset_id) ON DELETE CASCADE,
    org_id            TEXT NOT NULL,
    file_name         TEXT NOT NULL,
    file_url          TEXT NOT NULL,
    content_hash      TEXT NOT NULL,         -- SHA-256 hex
    upload_date       TEXT NOT NULL,
    uploaded_by       TEXT NOT NULL,
    applied_to_assets TEXT NOT NULL DEFAULT '[]'  -- JSON array of asset ids
);

CREATE INDEX IF NOT EXISTS assets_org_idx
    ON assets(org_id);
CREATE INDEX IF NOT EXISTS assets_org_assignee_idx
    ON assets(org_id, assigned_user_id);
CREATE INDEX IF NOT EXISTS documents_asset_idx
    ON certification_documents(asset_id);

PRAGMA user_version = 1;
";
