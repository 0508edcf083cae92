//! Fixed insert and lookup statements for the mart tables.
//!
//! Plain INSERTs, not upserts: a duplicate key must surface as a store
//! error so the caller can record it in the load ledger. Every function
//! returns [`diesel::QueryResult`] so callers can classify the failure.

use diesel::prelude::*;
use diesel::{SqliteConnection, insert_into};

use crate::models::{NewActivityFact, NewActor, NewItem, NewProvider, NewTimeMark};
use crate::schema::{activity_fact, actor, item, provider, time_mark};

/// Insert one provider row.
pub fn insert_provider(
    conn: &mut SqliteConnection,
    row: &NewProvider<'_>,
) -> QueryResult<usize> {
    insert_into(provider::table).values(row).execute(conn)
}

/// Insert one item row; its provider row must already be persisted.
pub fn insert_item(conn: &mut SqliteConnection, row: &NewItem<'_>) -> QueryResult<usize> {
    insert_into(item::table).values(row).execute(conn)
}

/// Insert one time-mark row.
pub fn insert_time_mark(
    conn: &mut SqliteConnection,
    row: &NewTimeMark<'_>,
) -> QueryResult<usize> {
    insert_into(time_mark::table).values(row).execute(conn)
}

/// Insert one actor row.
pub fn insert_actor(conn: &mut SqliteConnection, row: &NewActor<'_>) -> QueryResult<usize> {
    insert_into(actor::table).values(row).execute(conn)
}

/// Insert one activity fact row.
pub fn insert_activity_fact(
    conn: &mut SqliteConnection,
    row: &NewActivityFact<'_>,
) -> QueryResult<usize> {
    insert_into(activity_fact::table).values(row).execute(conn)
}

/// Best-effort catalog match for a played item.
///
/// Exact equality on item title, provider name, and duration; returns the
/// matched `(item_id, provider_id)` pair or `None` on a miss.
pub fn find_item(
    conn: &mut SqliteConnection,
    title: &str,
    provider_name: &str,
    duration: f64,
) -> QueryResult<Option<(String, String)>> {
    item::table
        .inner_join(provider::table)
        .filter(
            item::title
                .eq(title)
                .and(provider::name.eq(provider_name))
                .and(item::duration_seconds.eq(duration)),
        )
        .select((item::id, provider::id))
        .first::<(String, String)>(conn)
        .optional()
}
