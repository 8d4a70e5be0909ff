//! Journal entry persistence.
//!
//! The unique index on `entry_number` is the serialization point for
//! numbering: the writer scans for the next sequence, then retries past
//! collisions instead of trusting any in-process counter.

use chrono::{Datelike, NaiveDate, Utc};
use finledger_core::ledger::{self, JournalLine};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::entities::sea_orm_active_enums::JournalStatus;
use crate::entities::{journal_entries, journal_entry_lines};

use super::error::PostingError;
use super::numbering::next_document_seq;

/// Bounded retries past entry-number collisions.
const NUMBERING_RETRIES: u32 = 5;

/// Input for writing one journal entry.
#[derive(Debug, Clone)]
pub struct WriteEntry {
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Header description.
    pub description: String,
    /// Source document reference, e.g. `BILL-42`.
    pub reference: Option<String>,
    /// Account code embedded in the entry number, typically the control
    /// account the entry hits.
    pub account_code: String,
    /// Balanced lines.
    pub lines: Vec<JournalLine>,
    /// `Posted` when driven by an approved/paid document.
    pub status: JournalStatus,
    /// Acting user.
    pub created_by: i64,
}

/// Journal entry header together with its lines.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Header row.
    pub entry: journal_entries::Model,
    /// Line rows.
    pub lines: Vec<journal_entry_lines::Model>,
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Filter by status.
    pub status: Option<JournalStatus>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
    /// Filter by source document reference.
    pub reference: Option<String>,
}

/// Writes a balanced journal entry on the given connection.
///
/// Callers inside a posting flow pass their open database transaction so
/// the entry commits or rolls back with the document. Each header insert
/// runs under a savepoint: on Postgres a unique violation aborts the
/// enclosing transaction, so the savepoint is rolled back before the next
/// attempt to keep the caller's transaction usable.
pub async fn write_entry<C>(
    conn: &C,
    input: WriteEntry,
) -> Result<journal_entries::Model, PostingError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let totals = ledger::validate_lines(&input.lines)?;

    let year = input.entry_date.year();
    let prefix = ledger::entry_prefix(year, &input.account_code);
    let base_seq = next_document_seq(
        conn,
        journal_entries::Entity,
        journal_entries::Column::EntryNumber,
        &prefix,
    )
    .await?;

    let now = Utc::now().into();
    let (posted_by, posted_at) = match input.status {
        JournalStatus::Posted => (Some(input.created_by), Some(now)),
        JournalStatus::Draft => (None, None),
    };

    let mut attempt = 0;
    let entry = loop {
        let entry_number = ledger::entry_number(year, &input.account_code, base_seq + attempt);
        let header = journal_entries::ActiveModel {
            entry_number: Set(entry_number),
            entry_date: Set(input.entry_date),
            reference: Set(input.reference.clone()),
            description: Set(input.description.clone()),
            total_debit: Set(totals.total_debit),
            total_credit: Set(totals.total_credit),
            status: Set(input.status.clone()),
            created_by: Set(input.created_by),
            posted_by: Set(posted_by),
            posted_at: Set(posted_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let savepoint = conn.begin().await?;
        match header.insert(&savepoint).await {
            Ok(entry) => {
                savepoint.commit().await?;
                break entry;
            }
            Err(err)
                if attempt < NUMBERING_RETRIES
                    && matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                savepoint.rollback().await?;
                attempt += 1;
            }
            Err(err) => {
                savepoint.rollback().await?;
                return Err(err.into());
            }
        }
    };

    for line in &input.lines {
        journal_entry_lines::ActiveModel {
            journal_entry_id: Set(entry.id),
            account_id: Set(line.account_id),
            debit: Set(line.debit),
            credit: Set(line.credit),
            description: Set(line.description.clone()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }

    Ok(entry)
}

/// Deletes every journal entry (and its lines) carrying the reference.
///
/// Reversal path for document edit and delete. Line removal rides on the
/// `ON DELETE CASCADE` of the entry id.
pub async fn delete_by_reference<C: ConnectionTrait>(
    conn: &C,
    reference: &str,
) -> Result<u64, PostingError> {
    let result = journal_entries::Entity::delete_many()
        .filter(journal_entries::Column::Reference.eq(reference))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Journal queries for the HTTP surface.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists entry headers, newest first.
    pub async fn list(
        &self,
        filter: JournalFilter,
    ) -> Result<Vec<journal_entries::Model>, PostingError> {
        let mut query = journal_entries::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(journal_entries::Column::Status.eq(status));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }
        if let Some(reference) = filter.reference {
            query = query.filter(journal_entries::Column::Reference.eq(reference));
        }
        let entries = query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::Id)
            .all(&self.db)
            .await?;
        Ok(entries)
    }

    /// Fetches one entry with its lines.
    pub async fn get(&self, id: i64) -> Result<EntryWithLines, PostingError> {
        let entry = journal_entries::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PostingError::NotFound("journal entry", id))?;
        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::JournalEntryId.eq(id))
            .order_by_asc(journal_entry_lines::Column::Id)
            .all(&self.db)
            .await?;
        Ok(EntryWithLines { entry, lines })
    }
}
