//! SQL schema for the helpdesk SQLite store.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- `seq` fixes insertion order; every listing breaks ties on it.
CREATE TABLE IF NOT EXISTS support_cases (
    seq                     INTEGER PRIMARY KEY AUTOINCREMENT,
    case_id                 TEXT NOT NULL UNIQUE,
    title                   TEXT,
    description             TEXT,
    owner                   TEXT,
    is_complete             INTEGER NOT NULL DEFAULT 0,
    assigned_support_person TEXT,
    assignment_reasoning    TEXT
);

-- Soft-deleted rows stay behind, so an alias may appear many times but only
-- once with status 'active'.
CREATE TABLE IF NOT EXISTS support_persons (
    seq                          INTEGER PRIMARY KEY AUTOINCREMENT,
    alias                        TEXT NOT NULL,
    name                         TEXT NOT NULL,
    email                        TEXT NOT NULL,
    specializations              TEXT NOT NULL DEFAULT '[]',  -- JSON array
    current_workload             INTEGER NOT NULL DEFAULT 0,
    average_resolution_time      REAL,
    customer_satisfaction_rating REAL,
    seniority                    TEXT NOT NULL,
    seniority_rank               INTEGER NOT NULL,
    status                       TEXT NOT NULL DEFAULT 'active'  -- 'active' | 'deleted'
);

CREATE INDEX IF NOT EXISTS support_cases_assignee_idx
    ON support_cases(assigned_support_person);
CREATE UNIQUE INDEX IF NOT EXISTS support_persons_active_alias_idx
    ON support_persons(alias) WHERE status = 'active';
CREATE INDEX IF NOT EXISTS support_persons_email_idx
    ON support_persons(email);

PRAGMA user_version = 1;
";
