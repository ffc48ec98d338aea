mod helpers;

use brainbox::engine::{BrainBox, NeuronType};
use helpers::{db_path, open_engine, raw_conn, synapse_weight};
use tempfile::TempDir;

#[test]
fn window_survives_reopen_within_an_hour() {
    let tmp = TempDir::new().unwrap();

    let mut engine = open_engine(&tmp);
    engine.record("/a", NeuronType::File, None).unwrap();
    engine.record("/b", NeuronType::File, None).unwrap();
    engine.close().unwrap();

    // A fresh engine rebuilds the window from the access log, so the next
    // record still wires up to the previous session's accesses
    let mut engine = BrainBox::open(db_path(&tmp)).unwrap();
    engine.record("/c", NeuronType::File, None).unwrap();

    let conn = raw_conn(&db_path(&tmp));
    // /a was older in the reconstructed window: Δ = 0.1 · 1/2
    let w_ca = synapse_weight(&conn, "file:/c", "file:/a").unwrap();
    let w_cb = synapse_weight(&conn, "file:/c", "file:/b").unwrap();
    assert!((w_ca - 0.05).abs() < 1e-9);
    assert!((w_cb - 0.10).abs() < 1e-9);

    // Reverse directions exist too
    assert!(synapse_weight(&conn, "file:/a", "file:/c").is_some());
    assert!(synapse_weight(&conn, "file:/b", "file:/c").is_some());
}

#[test]
fn stale_accesses_do_not_seed_the_window() {
    let tmp = TempDir::new().unwrap();

    let mut engine = open_engine(&tmp);
    engine.record("/old", NeuronType::File, None).unwrap();
    engine.close().unwrap();

    // Backdate the logged access beyond the one-hour seeding horizon
    {
        let conn = raw_conn(&db_path(&tmp));
        let stale = (chrono::Utc::now() - chrono::Duration::hours(2)).to_rfc3339();
        conn.execute("UPDATE access_log SET timestamp = ?1", [&stale])
            .unwrap();
    }

    let mut engine = BrainBox::open(db_path(&tmp)).unwrap();
    engine.record("/new", NeuronType::File, None).unwrap();

    let conn = raw_conn(&db_path(&tmp));
    assert!(synapse_weight(&conn, "file:/new", "file:/old").is_none());
}

#[test]
fn seeded_window_keeps_only_the_trailing_ten() {
    let tmp = TempDir::new().unwrap();

    let mut engine = open_engine(&tmp);
    for i in 0..14 {
        engine.record(&format!("/f{i}"), NeuronType::File, None).unwrap();
    }
    engine.close().unwrap();

    let mut engine = BrainBox::open(db_path(&tmp)).unwrap();
    engine.record("/probe", NeuronType::File, None).unwrap();

    let conn = raw_conn(&db_path(&tmp));
    // Only the trailing 10 log entries (/f4../f13) made it into the window
    assert!(synapse_weight(&conn, "file:/probe", "file:/f3").is_none());
    assert!(synapse_weight(&conn, "file:/probe", "file:/f4").is_some());
    assert!(synapse_weight(&conn, "file:/probe", "file:/f13").is_some());
}

#[test]
fn reseeded_window_dedups_repeat_accesses() {
    let tmp = TempDir::new().unwrap();

    let mut engine = open_engine(&tmp);
    engine.record("/a", NeuronType::File, None).unwrap();
    engine.record("/b", NeuronType::File, None).unwrap();
    engine.record("/a", NeuronType::File, None).unwrap();
    engine.close().unwrap();

    let mut engine = BrainBox::open(db_path(&tmp)).unwrap();
    engine.record("/c", NeuronType::File, None).unwrap();

    // The deduped window was [/b, /a]: /b at index 0, /a moved to the tail
    let conn = raw_conn(&db_path(&tmp));
    let w_cb = synapse_weight(&conn, "file:/c", "file:/b").unwrap();
    let w_ca = synapse_weight(&conn, "file:/c", "file:/a").unwrap();
    assert!((w_cb - 0.05).abs() < 1e-9);
    assert!((w_ca - 0.10).abs() < 1e-9);
}
