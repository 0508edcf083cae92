//! Diesel models mapping to the mart schema.
//!
//! These types mirror the tables created by the embedded migrations and
//! declared in [`crate::schema`]:
//! - [`crate::schema::provider`] / [`crate::schema::item`] — catalog dimensions
//! - [`crate::schema::time_mark`] / [`crate::schema::actor`] — derived dimensions
//! - [`crate::schema::activity_fact`] — one row per play event
//!
//! Row structs are read shapes (Queryable/Selectable); the `New*` structs are
//! the insert shapes, borrowing from the parsed source records. Fields that
//! the store requires (NOT NULL) are still `Option` on the insert side where
//! the source may omit them: the store's constraint is the arbiter and a
//! missing value surfaces as a rejected row, not a panic.

use diesel::prelude::*;

use crate::ledger::{AuditFields, opt_display, opt_str};
use crate::schema::*;

/// A row in [`crate::schema::provider`]: one catalog provider.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = provider, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Provider {
    /// Stable provider identifier from the catalog source.
    pub id: String,
    /// Human-readable provider name.
    pub name: String,
    /// Free-form location text, when the source carries one.
    pub location: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
}

/// Insertable form of [`Provider`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = provider)]
pub struct NewProvider<'a> {
    /// Stable provider identifier (unique key).
    pub id: &'a str,
    /// Human-readable provider name; the store rejects an absent value.
    pub name: Option<&'a str>,
    /// Free-form location text.
    pub location: Option<&'a str>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
}

/// A row in [`crate::schema::item`]: one catalog item owned by a provider.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = item, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Item {
    /// Stable item identifier from the catalog source.
    pub id: String,
    /// Item title.
    pub title: String,
    /// Owning provider; that row is always persisted first.
    pub provider_id: String,
    /// Release year, when known.
    pub release_year: Option<i32>,
    /// Playback duration in seconds.
    pub duration_seconds: f64,
}

/// Insertable form of [`Item`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = item)]
pub struct NewItem<'a> {
    /// Stable item identifier (unique key).
    pub id: &'a str,
    /// Item title; the store rejects an absent value.
    pub title: Option<&'a str>,
    /// Owning provider reference; the store rejects an absent value.
    pub provider_id: Option<&'a str>,
    /// Release year, when known.
    pub release_year: Option<i32>,
    /// Playback duration in seconds; the store rejects an absent value.
    pub duration_seconds: Option<f64>,
}

/// A row in [`crate::schema::time_mark`]: the derived parts of one instant.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = time_mark, primary_key(ts), check_for_backend(diesel::sqlite::Sqlite))]
pub struct TimeMark {
    /// RFC3339 UTC text, millisecond precision (unique key).
    pub ts: String,
    /// Hour of day, 0-23.
    pub hour: i32,
    /// Day of month, 1-31.
    pub day_of_month: i32,
    /// ISO 8601 week number, 1-53.
    pub iso_week: i32,
    /// Month, 1-12.
    pub month: i32,
    /// Calendar year.
    pub year: i32,
    /// Weekday with Monday = 0.
    pub weekday: i32,
}

/// Insertable form of [`TimeMark`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = time_mark)]
pub struct NewTimeMark<'a> {
    /// RFC3339 UTC text, millisecond precision (unique key).
    pub ts: &'a str,
    /// Hour of day, 0-23.
    pub hour: i32,
    /// Day of month, 1-31.
    pub day_of_month: i32,
    /// ISO 8601 week number, 1-53.
    pub iso_week: i32,
    /// Month, 1-12.
    pub month: i32,
    /// Calendar year.
    pub year: i32,
    /// Weekday with Monday = 0.
    pub weekday: i32,
}

/// A row in [`crate::schema::actor`]: one account seen in the activity logs.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = actor, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Actor {
    /// Stable actor identifier from the logs.
    pub id: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Gender marker as it appears in the logs.
    pub gender: Option<String>,
    /// Subscription tier at the time of the batch.
    pub tier: Option<String>,
}

/// Insertable form of [`Actor`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = actor)]
pub struct NewActor<'a> {
    /// Stable actor identifier (unique key).
    pub id: &'a str,
    /// Given name.
    pub first_name: Option<&'a str>,
    /// Family name.
    pub last_name: Option<&'a str>,
    /// Gender marker as it appears in the logs.
    pub gender: Option<&'a str>,
    /// Subscription tier at the time of the batch.
    pub tier: Option<&'a str>,
}

/// A row in [`crate::schema::activity_fact`]: one play event.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = activity_fact, check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityFact {
    /// Rowid primary key, assigned by the store.
    pub id: Option<i32>,
    /// RFC3339 UTC text of the play instant.
    pub ts: String,
    /// Actor reference as it appeared in the log record.
    pub actor_id: Option<String>,
    /// Subscription tier at play time.
    pub tier: Option<String>,
    /// Resolved catalog item, when the lookup matched.
    pub item_id: Option<String>,
    /// Resolved catalog provider, when the lookup matched.
    pub provider_id: Option<String>,
    /// Client session identifier.
    pub session_id: Option<i64>,
    /// Free-form location text from the log record.
    pub location: Option<String>,
    /// Client user agent string.
    pub user_agent: Option<String>,
}

/// Insertable form of [`ActivityFact`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activity_fact)]
pub struct NewActivityFact<'a> {
    /// RFC3339 UTC text of the play instant.
    pub ts: &'a str,
    /// Actor reference as it appeared in the log record.
    pub actor_id: Option<&'a str>,
    /// Subscription tier at play time.
    pub tier: Option<&'a str>,
    /// Resolved catalog item; None when the lookup missed.
    pub item_id: Option<&'a str>,
    /// Resolved catalog provider; None when the lookup missed.
    pub provider_id: Option<&'a str>,
    /// Client session identifier.
    pub session_id: Option<i64>,
    /// Free-form location text from the log record.
    pub location: Option<&'a str>,
    /// Client user agent string.
    pub user_agent: Option<&'a str>,
}

impl AuditFields for NewProvider<'_> {
    fn audit_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt_str(self.name),
            opt_str(self.location),
            opt_display(self.latitude),
            opt_display(self.longitude),
        ]
    }
}

impl AuditFields for NewItem<'_> {
    fn audit_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt_str(self.title),
            opt_str(self.provider_id),
            opt_display(self.release_year),
            opt_display(self.duration_seconds),
        ]
    }
}

impl AuditFields for NewTimeMark<'_> {
    fn audit_fields(&self) -> Vec<String> {
        vec![
            self.ts.to_string(),
            self.hour.to_string(),
            self.day_of_month.to_string(),
            self.iso_week.to_string(),
            self.month.to_string(),
            self.year.to_string(),
            self.weekday.to_string(),
        ]
    }
}

impl AuditFields for NewActor<'_> {
    fn audit_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt_str(self.first_name),
            opt_str(self.last_name),
            opt_str(self.gender),
            opt_str(self.tier),
        ]
    }
}

impl AuditFields for NewActivityFact<'_> {
    fn audit_fields(&self) -> Vec<String> {
        vec![
            self.ts.to_string(),
            opt_str(self.actor_id),
            opt_str(self.tier),
            opt_str(self.item_id),
            opt_str(self.provider_id),
            opt_display(self.session_id),
            opt_str(self.location),
            opt_str(self.user_agent),
        ]
    }
}
