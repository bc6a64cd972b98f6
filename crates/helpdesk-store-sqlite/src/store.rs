//! [`SqliteStore`]: the SQLite implementation of [`SupportStore`].

use std::path::Path;

use rusqlite::types::Value;
use uuid::Uuid;

use helpdesk_core::{
  case::SupportCase,
  person::{PersonStatus, SupportPerson},
  query::{CaseFilter, CaseQuery, Page, PersonFilter, PersonQuery},
  store::SupportStore,
};

use crate::{
  Result,
  encode::{
    CASE_COLUMNS, PERSON_COLUMNS, RawPerson, case_from_row, case_values, encode_status,
    person_values,
  },
  schema::SCHEMA,
  sql::{self, Where},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A helpdesk store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

fn sql_int(n: usize) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
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

  async fn select_cases(&self, filter: &CaseFilter, page: Page) -> Result<Vec<SupportCase>> {
    let w = sql::cases(filter);
    let where_clause = w.sql();
    let mut params = w.params;
    params.push(Value::from(sql_int(page.limit)));
    params.push(Value::from(sql_int(page.offset)));

    let cases = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CASE_COLUMNS} FROM support_cases {where_clause} ORDER BY seq LIMIT ? OFFSET ?"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), case_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(cases)
  }

  async fn select_persons(
    &self,
    filter: &PersonFilter,
    order: String,
    page: Page,
  ) -> Result<Vec<SupportPerson>> {
    let w = sql::persons(filter);
    let where_clause = w.sql();
    let mut params = w.params;
    params.push(Value::from(sql_int(page.limit)));
    params.push(Value::from(sql_int(page.offset)));

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PERSON_COLUMNS} FROM support_persons {where_clause}
           ORDER BY {order} LIMIT ? OFFSET ?"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  /// Run `sql` (which must contain a single `{where}` slot) with the filter's
  /// parameters appended to `leading`. Returns the changed row count.
  async fn execute(&self, sql: String, leading: Vec<Value>, w: Where) -> Result<u64> {
    let where_clause = w.sql();
    let mut params = leading;
    params.extend(w.params);

    let changed = self
      .conn
      .call(move |conn| {
        let sql = sql.replace("{where}", &where_clause);
        Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?)
      })
      .await?;
    Ok(changed as u64)
  }

  async fn count(&self, table: &'static str, w: Where) -> Result<u64> {
    let where_clause = w.sql();
    let params = w.params;

    let n: i64 = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT COUNT(*) FROM {table} {where_clause}");
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(params), |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }
}

// ─── SupportStore impl ───────────────────────────────────────────────────────

impl SupportStore for SqliteStore {
  type Error = crate::Error;

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn find_cases<'a>(&'a self, query: &'a CaseQuery) -> Result<Vec<SupportCase>> {
    self.select_cases(&query.filter, query.page).await
  }

  async fn find_case<'a>(&'a self, filter: &'a CaseFilter) -> Result<Option<SupportCase>> {
    let first = Page { offset: 0, limit: 1 };
    Ok(self.select_cases(filter, first).await?.into_iter().next())
  }

  async fn count_cases<'a>(&'a self, filter: &'a CaseFilter) -> Result<u64> {
    self.count("support_cases", sql::cases(filter)).await
  }

  async fn insert_case(&self, mut case: SupportCase) -> Result<SupportCase> {
    let id = match case.id.take().filter(|id| !id.trim().is_empty()) {
      Some(id) => id,
      None => Uuid::new_v4().to_string(),
    };
    case.id = Some(id.clone());

    let mut params = vec![Value::from(id)];
    params.extend(case_values(case.clone()));

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO support_cases ({CASE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"),
          rusqlite::params_from_iter(params),
        )?;
        Ok(())
      })
      .await?;
    Ok(case)
  }

  async fn replace_case<'a>(&'a self, filter: &'a CaseFilter, case: SupportCase) -> Result<u64> {
    // A replacement without an id keeps the stored one.
    let id = case.id.clone().filter(|id| !id.trim().is_empty());
    let mut leading = vec![Value::from(id)];
    leading.extend(case_values(case));

    self
      .execute(
        "UPDATE support_cases SET
           case_id = COALESCE(?, case_id), title = ?, description = ?, owner = ?,
           is_complete = ?, assigned_support_person = ?, assignment_reasoning = ?
         WHERE seq = (SELECT seq FROM support_cases {where} ORDER BY seq LIMIT 1)"
          .to_owned(),
        leading,
        sql::cases(filter),
      )
      .await
  }

  async fn delete_cases<'a>(&'a self, filter: &'a CaseFilter) -> Result<u64> {
    self
      .execute("DELETE FROM support_cases {where}".to_owned(), Vec::new(), sql::cases(filter))
      .await
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn find_persons<'a>(&'a self, query: &'a PersonQuery) -> Result<Vec<SupportPerson>> {
    self
      .select_persons(&query.filter, sql::person_order(query.sort), query.page)
      .await
  }

  async fn find_person<'a>(&'a self, filter: &'a PersonFilter) -> Result<Option<SupportPerson>> {
    let first = Page { offset: 0, limit: 1 };
    let found = self.select_persons(filter, "seq ASC".to_owned(), first).await?;
    Ok(found.into_iter().next())
  }

  async fn count_persons<'a>(&'a self, filter: &'a PersonFilter) -> Result<u64> {
    self.count("support_persons", sql::persons(filter)).await
  }

  async fn insert_person(&self, person: SupportPerson) -> Result<()> {
    let params = person_values(person)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO support_persons ({PERSON_COLUMNS}, seniority_rank)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
          ),
          rusqlite::params_from_iter(params),
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_person<'a>(
    &'a self,
    filter: &'a PersonFilter,
    person: SupportPerson,
  ) -> Result<u64> {
    self
      .execute(
        "UPDATE support_persons SET
           alias = ?, name = ?, email = ?, specializations = ?, current_workload = ?,
           average_resolution_time = ?, customer_satisfaction_rating = ?,
           seniority = ?, status = ?, seniority_rank = ?
         WHERE seq = (SELECT seq FROM support_persons {where} ORDER BY seq LIMIT 1)"
          .to_owned(),
        person_values(person)?,
        sql::persons(filter),
      )
      .await
  }

  async fn set_person_status<'a>(
    &'a self,
    filter: &'a PersonFilter,
    status: PersonStatus,
  ) -> Result<u64> {
    self
      .execute(
        "UPDATE support_persons SET status = ?
         WHERE seq = (SELECT seq FROM support_persons {where} ORDER BY seq LIMIT 1)"
          .to_owned(),
        vec![Value::from(encode_status(status).to_owned())],
        sql::persons(filter),
      )
      .await
  }
}
