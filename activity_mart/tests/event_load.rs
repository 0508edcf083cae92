mod common;
use common::{count, fk_check_empty, ledger_lines, open_ledger, setup_db, write_unit};

use std::collections::HashSet;

use activity_mart::load::LoadOptions;
use activity_mart::load::catalog::load_catalog_unit;
use activity_mart::load::events::load_event_unit;
use activity_mart::models::{ActivityFact, Actor, TimeMark};
use activity_mart::schema::{activity_fact, actor, time_mark};
use diesel::prelude::*;

const CATALOG_A1: &str = r#"{"id":"A1","name":"Prov","items":[{"id":"S1","title":"T","providerId":"A1","duration":180.5}]}"#;
const TS1: i64 = 1_541_903_636_796; // 2018-11-11T02:33:56.796Z
const TS2: i64 = 1_541_903_999_999;

fn play(actor: &str, ts: i64) -> String {
    format!(
        r#"{{"page":"NextSong","ts":{ts},"actorId":"{actor}","firstName":"F","lastName":"L","gender":"F","tier":"paid","title":"T","provider":"Prov","duration":180.5,"sessionId":583,"location":"NY","userAgent":"UA"}}"#
    )
}

#[test]
fn two_plays_by_one_actor_load_two_facts_and_one_actor_row() {
    let (db, mut conn) = setup_db();
    let (ledger_path, mut ledger) = open_ledger(db.dir.path());
    let lines = [play("U1", TS1), play("U1", TS2)];
    let unit = write_unit(
        db.dir.path(),
        "events/batch1.json",
        &[lines[0].as_str(), lines[1].as_str()],
    );

    let stats =
        load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit).expect("load");

    // 2 time marks + 1 actor + 2 facts.
    assert_eq!(stats.inserted, 5);
    assert_eq!(count(&mut conn, "time_mark"), 2);
    assert_eq!(count(&mut conn, "actor"), 1);
    assert_eq!(count(&mut conn, "activity_fact"), 2);
    assert!(ledger_lines(&ledger_path).is_empty());

    let mark: TimeMark = time_mark::table
        .select(TimeMark::as_select())
        .order(time_mark::ts.asc())
        .first(&mut conn)
        .expect("time mark");
    assert_eq!(mark.ts, "2018-11-11T02:33:56.796Z");
    assert_eq!(mark.hour, 2);
    assert_eq!(mark.day_of_month, 11);
    assert_eq!(mark.iso_week, 45);
    assert_eq!(mark.month, 11);
    assert_eq!(mark.year, 2018);
    assert_eq!(mark.weekday, 6);
}

#[test]
fn non_play_actions_never_reach_the_derived_sets() {
    let (db, mut conn) = setup_db();
    let (_ledger_path, mut ledger) = open_ledger(db.dir.path());
    let played = play("U1", TS1);
    let browsed = format!(r#"{{"page":"Home","ts":{TS2},"actorId":"U9"}}"#);
    let unit = write_unit(
        db.dir.path(),
        "events/batch1.json",
        &[played.as_str(), browsed.as_str()],
    );

    load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit).expect("load");

    assert_eq!(count(&mut conn, "time_mark"), 1);
    assert_eq!(count(&mut conn, "actor"), 1);
    assert_eq!(count(&mut conn, "activity_fact"), 1);

    let facts: Vec<ActivityFact> = activity_fact::table
        .select(ActivityFact::as_select())
        .load(&mut conn)
        .expect("facts");
    assert!(facts.iter().all(|f| f.actor_id.as_deref() == Some("U1")));
}

#[test]
fn unmatched_play_loads_a_fact_with_null_references() {
    let (db, mut conn) = setup_db();
    let (ledger_path, mut ledger) = open_ledger(db.dir.path());
    let line = play("U1", TS1);
    let unit = write_unit(db.dir.path(), "events/batch1.json", &[line.as_str()]);

    load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit).expect("load");

    let fact: ActivityFact = activity_fact::table
        .select(ActivityFact::as_select())
        .first(&mut conn)
        .expect("fact");
    assert_eq!(fact.item_id, None);
    assert_eq!(fact.provider_id, None);
    assert_eq!(fact.actor_id.as_deref(), Some("U1"));
    assert_eq!(fact.session_id, Some(583));
    // A lookup miss is not a rejection.
    assert!(ledger_lines(&ledger_path).is_empty());
}

#[test]
fn matched_play_resolves_catalog_references() {
    let (db, mut conn) = setup_db();
    let (_ledger_path, mut ledger) = open_ledger(db.dir.path());
    let catalog_unit = write_unit(db.dir.path(), "catalog/unit1.json", &[CATALOG_A1]);
    load_catalog_unit(&mut conn, &mut ledger, &LoadOptions::default(), &catalog_unit)
        .expect("catalog");

    let line = play("U1", TS1);
    let unit = write_unit(db.dir.path(), "events/batch1.json", &[line.as_str()]);
    load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit).expect("events");

    let fact: ActivityFact = activity_fact::table
        .select(ActivityFact::as_select())
        .first(&mut conn)
        .expect("fact");
    assert_eq!(fact.item_id.as_deref(), Some("S1"));
    assert_eq!(fact.provider_id.as_deref(), Some("A1"));
    fk_check_empty(&mut conn);
}

#[test]
fn duplicate_actor_across_units_is_absorbed_and_ledgered() {
    let (db, mut conn) = setup_db();
    let (ledger_path, mut ledger) = open_ledger(db.dir.path());
    let line1 = play("U1", TS1);
    let line2 = play("U1", TS2);
    let unit1 = write_unit(db.dir.path(), "events/batch1.json", &[line1.as_str()]);
    let unit2 = write_unit(db.dir.path(), "events/batch2.json", &[line2.as_str()]);

    load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit1).expect("unit1");
    let stats =
        load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit2).expect("unit2");

    // One row persisted, one ledger line for the duplicate.
    assert_eq!(count(&mut conn, "actor"), 1);
    assert_eq!(stats.rejected, 1);
    let row: Actor = actor::table
        .select(Actor::as_select())
        .first(&mut conn)
        .expect("actor row");
    assert_eq!(row.id, "U1");
    assert_eq!(row.tier.as_deref(), Some("paid"));
    let lines = ledger_lines(&ledger_path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("U1,F,L,F,paid"));
    // Facts still load for both plays.
    assert_eq!(count(&mut conn, "activity_fact"), 2);
}

#[test]
fn duplicate_timestamp_across_units_is_absorbed_and_ledgered() {
    let (db, mut conn) = setup_db();
    let (ledger_path, mut ledger) = open_ledger(db.dir.path());
    let line1 = play("U1", TS1);
    let line2 = play("U2", TS1);
    let unit1 = write_unit(db.dir.path(), "events/batch1.json", &[line1.as_str()]);
    let unit2 = write_unit(db.dir.path(), "events/batch2.json", &[line2.as_str()]);

    load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit1).expect("unit1");
    load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit2).expect("unit2");

    assert_eq!(count(&mut conn, "time_mark"), 1);
    assert_eq!(count(&mut conn, "activity_fact"), 2);
    assert_eq!(ledger_lines(&ledger_path).len(), 1);
}

#[test]
fn fact_timestamps_agree_with_the_time_dimension() {
    let (db, mut conn) = setup_db();
    let (_ledger_path, mut ledger) = open_ledger(db.dir.path());
    let lines = [play("U1", TS1), play("U2", TS2)];
    let unit = write_unit(
        db.dir.path(),
        "events/batch1.json",
        &[lines[0].as_str(), lines[1].as_str()],
    );

    load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit).expect("load");

    let fact_ts: HashSet<String> = activity_fact::table
        .select(activity_fact::ts)
        .load::<String>(&mut conn)
        .expect("fact ts")
        .into_iter()
        .collect();
    let mark_ts: HashSet<String> = time_mark::table
        .select(time_mark::ts)
        .load::<String>(&mut conn)
        .expect("mark ts")
        .into_iter()
        .collect();
    assert_eq!(fact_ts, mark_ts);
}

#[test]
fn actorless_play_still_loads_a_fact() {
    let (db, mut conn) = setup_db();
    let (_ledger_path, mut ledger) = open_ledger(db.dir.path());
    let line = format!(r#"{{"page":"NextSong","ts":{TS1},"actorId":"","tier":"free"}}"#);
    let unit = write_unit(db.dir.path(), "events/batch1.json", &[line.as_str()]);

    load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit).expect("load");

    // The empty actor id is dropped from the actor dimension but the fact
    // row loads regardless.
    assert_eq!(count(&mut conn, "actor"), 0);
    assert_eq!(count(&mut conn, "activity_fact"), 1);
}

#[test]
fn play_without_a_timestamp_feeds_only_the_actor_dimension() {
    let (db, mut conn) = setup_db();
    let (_ledger_path, mut ledger) = open_ledger(db.dir.path());
    let line = r#"{"page":"NextSong","actorId":"U1","firstName":"F"}"#;
    let unit = write_unit(db.dir.path(), "events/batch1.json", &[line]);

    let stats =
        load_event_unit(&mut conn, &mut ledger, &LoadOptions::default(), &unit).expect("load");

    assert_eq!(count(&mut conn, "time_mark"), 0);
    assert_eq!(count(&mut conn, "actor"), 1);
    assert_eq!(count(&mut conn, "activity_fact"), 0);
    // The fact row could not be built without an instant.
    assert_eq!(stats.skipped, 1);
}
