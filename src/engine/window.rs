//! The co-access window: a bounded FIFO of recently recorded neuron ids.
//!
//! The window drives Hebbian strengthening — every new access fires synapses
//! against everything currently in it. It lives in memory only; on open it is
//! reconstructed from the last hour of the access log, which keeps synapse
//! formation continuous across sessions without a second write per record.

use anyhow::Result;
use chrono::{Duration, Utc};
use rusqlite::Connection;
use std::collections::VecDeque;

use super::CO_ACCESS_WINDOW_SIZE;

/// How far back the access log is replayed when reseeding the window.
fn seed_lookback() -> Duration {
    Duration::hours(1)
}

/// Bounded FIFO of neuron ids, most recent at the tail.
#[derive(Debug, Default)]
pub struct CoAccessWindow {
    entries: VecDeque<String>,
}

impl CoAccessWindow {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(CO_ACCESS_WINDOW_SIZE),
        }
    }

    /// Move `id` to the tail, dropping the oldest entry on overflow.
    pub fn touch(&mut self, id: &str) {
        if let Some(pos) = self.entries.iter().position(|e| e == id) {
            self.entries.remove(pos);
        }
        self.entries.push_back(id.to_string());
        if self.entries.len() > CO_ACCESS_WINDOW_SIZE {
            self.entries.pop_front();
        }
    }

    /// Iterate oldest-first. Position in this iteration determines the
    /// Hebbian position factor: later (more recent) entries strengthen more.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the window from the last hour of the access log.
    ///
    /// Rows are replayed in ascending `(timestamp, access_order)` order,
    /// deduplicating by keeping the most recent occurrence of each id. The
    /// result is truncated to the trailing window size only after the full
    /// log slice has been consumed.
    pub fn seed_from_log(conn: &Connection) -> Result<Self> {
        let cutoff = (Utc::now() - seed_lookback()).to_rfc3339();

        let mut stmt = conn.prepare(
            "SELECT neuron_id FROM access_log WHERE timestamp >= ?1 \
             ORDER BY timestamp ASC, access_order ASC",
        )?;
        let ids: Vec<String> = stmt
            .query_map([cutoff], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries: VecDeque<String> = VecDeque::new();
        for id in ids {
            if let Some(pos) = entries.iter().position(|e| *e == id) {
                entries.remove(pos);
            }
            entries.push_back(id);
        }
        while entries.len() > CO_ACCESS_WINDOW_SIZE {
            entries.pop_front();
        }

        tracing::debug!(seeded = entries.len(), "co-access window reconstructed");
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn touch_appends_at_tail() {
        let mut window = CoAccessWindow::new();
        window.touch("file:/a");
        window.touch("file:/b");

        let ids: Vec<&str> = window.iter().collect();
        assert_eq!(ids, vec!["file:/a", "file:/b"]);
    }

    #[test]
    fn touch_moves_existing_entry_to_tail() {
        let mut window = CoAccessWindow::new();
        window.touch("file:/a");
        window.touch("file:/b");
        window.touch("file:/a");

        let ids: Vec<&str> = window.iter().collect();
        assert_eq!(ids, vec!["file:/b", "file:/a"]);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn window_never_exceeds_capacity() {
        let mut window = CoAccessWindow::new();
        for i in 0..25 {
            window.touch(&format!("file:/f{i}"));
        }
        assert_eq!(window.len(), CO_ACCESS_WINDOW_SIZE);

        // Oldest entries were dropped, newest kept
        let ids: Vec<&str> = window.iter().collect();
        assert_eq!(ids[0], "file:/f15");
        assert_eq!(ids[CO_ACCESS_WINDOW_SIZE - 1], "file:/f24");
    }

    #[test]
    fn seed_replays_recent_log_in_order() {
        let conn = db::open_memory_database().unwrap();
        let now = Utc::now().to_rfc3339();
        for (order, id) in ["file:/a", "file:/b", "file:/c"].iter().enumerate() {
            conn.execute(
                "INSERT INTO access_log (neuron_id, timestamp, access_order) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, now, order as i64],
            )
            .unwrap();
        }

        let window = CoAccessWindow::seed_from_log(&conn).unwrap();
        let ids: Vec<&str> = window.iter().collect();
        assert_eq!(ids, vec!["file:/a", "file:/b", "file:/c"]);
    }

    #[test]
    fn seed_dedups_keeping_most_recent_position() {
        let conn = db::open_memory_database().unwrap();
        let now = Utc::now().to_rfc3339();
        for (order, id) in ["file:/a", "file:/b", "file:/a"].iter().enumerate() {
            conn.execute(
                "INSERT INTO access_log (neuron_id, timestamp, access_order) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, now, order as i64],
            )
            .unwrap();
        }

        let window = CoAccessWindow::seed_from_log(&conn).unwrap();
        let ids: Vec<&str> = window.iter().collect();
        assert_eq!(ids, vec!["file:/b", "file:/a"]);
    }

    #[test]
    fn seed_ignores_entries_older_than_an_hour() {
        let conn = db::open_memory_database().unwrap();
        let stale = (Utc::now() - Duration::hours(2)).to_rfc3339();
        let fresh = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO access_log (neuron_id, timestamp, access_order) VALUES ('file:/old', ?1, 0)",
            [&stale],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO access_log (neuron_id, timestamp, access_order) VALUES ('file:/new', ?1, 1)",
            [&fresh],
        )
        .unwrap();

        let window = CoAccessWindow::seed_from_log(&conn).unwrap();
        let ids: Vec<&str> = window.iter().collect();
        assert_eq!(ids, vec!["file:/new"]);
    }

    #[test]
    fn seed_truncates_after_full_replay() {
        let conn = db::open_memory_database().unwrap();
        let now = Utc::now().to_rfc3339();
        // 15 distinct ids, then a repeat of the very first one. The repeat
        // moves it to the tail, so it must survive the trailing truncation.
        for i in 0..15 {
            conn.execute(
                "INSERT INTO access_log (neuron_id, timestamp, access_order) VALUES (?1, ?2, ?3)",
                rusqlite::params![format!("file:/f{i}"), now, i as i64],
            )
            .unwrap();
        }
        conn.execute(
            "INSERT INTO access_log (neuron_id, timestamp, access_order) VALUES ('file:/f0', ?1, 15)",
            [&now],
        )
        .unwrap();

        let window = CoAccessWindow::seed_from_log(&conn).unwrap();
        assert_eq!(window.len(), CO_ACCESS_WINDOW_SIZE);
        let ids: Vec<&str> = window.iter().collect();
        assert_eq!(ids[CO_ACCESS_WINDOW_SIZE - 1], "file:/f0");
    }
}
