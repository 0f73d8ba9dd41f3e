use rusqlite::Connection;

use crate::db::{repository, DatabaseError};
use crate::models::SubmissionRecord;

/// Read side of the submission store: a user's records, filtered by a
/// free-text symptom term and ordered newest-first.
pub struct HistoryService<'a> {
    conn: &'a Connection,
}

impl<'a> HistoryService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// List `owner_id`'s records matching `search_term`, ordered by
    /// `created_at` strictly descending. The full matching set is
    /// returned; there is no pagination.
    ///
    /// KNOWN LIMITATION: the filter is a lexicographic range match on
    /// `symptoms` (everything `>= search_term` under the store's
    /// ordering), not substring or full-text search. See
    /// [`repository::list_submissions`].
    pub fn list(
        &self,
        owner_id: &str,
        search_term: &str,
    ) -> Result<Vec<SubmissionRecord>, DatabaseError> {
        repository::list_submissions(self.conn, owner_id, search_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{SubmissionIntake, TriageAssessment};

    fn seed(conn: &Connection, owner: &str, symptoms: &str) {
        let intake = SubmissionIntake {
            symptoms: symptoms.to_string(),
            ..Default::default()
        };
        repository::insert_submission(conn, owner, &intake, "", &TriageAssessment::default())
            .unwrap();
    }

    #[test]
    fn results_are_sorted_newest_first() {
        let conn = open_memory_database().unwrap();
        for s in ["first", "second", "third"] {
            seed(&conn, "user-1", s);
        }

        let records = HistoryService::new(&conn).list("user-1", "").unwrap();
        assert_eq!(records.len(), 3);
        assert!(records
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        // Same-millisecond inserts fall back to insertion order.
        assert_eq!(records[0].symptoms, "third");
        assert_eq!(records[2].symptoms, "first");
    }

    #[test]
    fn owners_never_see_each_others_records() {
        let conn = open_memory_database().unwrap();
        seed(&conn, "alice", "fever");
        seed(&conn, "bob", "cough");

        let service = HistoryService::new(&conn);
        let alice = service.list("alice", "").unwrap();
        let bob = service.list("bob", "").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(bob.len(), 1);
        assert_eq!(alice[0].symptoms, "fever");
        assert_eq!(bob[0].symptoms, "cough");
    }

    #[test]
    fn search_term_is_a_range_filter() {
        let conn = open_memory_database().unwrap();
        for s in ["abdominal pain", "cough", "fever"] {
            seed(&conn, "user-1", s);
        }

        let records = HistoryService::new(&conn).list("user-1", "cough").unwrap();
        let mut symptoms: Vec<_> = records.iter().map(|r| r.symptoms.as_str()).collect();
        symptoms.sort();
        assert_eq!(symptoms, vec!["cough", "fever"]);
    }

    #[test]
    fn unknown_owner_gets_empty_history() {
        let conn = open_memory_database().unwrap();
        seed(&conn, "alice", "fever");
        assert!(HistoryService::new(&conn).list("nobody", "").unwrap().is_empty());
    }
}
