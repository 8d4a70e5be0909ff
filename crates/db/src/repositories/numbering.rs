//! Sequential document numbering.
//!
//! Document numbers are `PREFIX-SEQ` strings. The sequence is zero-padded
//! to four digits but may grow past that, so the maximum is taken
//! numerically over the parsed suffixes rather than by string order
//! (`-10000` sorts below `-9999`). The unique index on the number column
//! catches the rare concurrent duplicate.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};

use super::error::PostingError;

/// Next free sequence for a numbered document under `prefix`.
pub async fn next_document_seq<C, E>(
    conn: &C,
    _entity: E,
    column: E::Column,
    prefix: &str,
) -> Result<u32, PostingError>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let numbers: Vec<String> = E::find()
        .select_only()
        .column(column)
        .filter(column.starts_with(prefix))
        .into_tuple()
        .all(conn)
        .await?;

    let max = numbers
        .iter()
        .filter_map(|number| number.rsplit('-').next())
        .filter_map(|seq| seq.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    Ok(max + 1)
}
