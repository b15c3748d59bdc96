//! Property-based tests for the connection contract
//!
//! These tests verify, for arbitrary data, that:
//! - every successful insert yields a fresh, positive identifier
//! - failed actions never leave partial writes behind
//! - empty results and failures stay distinguishable

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use std::collections::HashSet;
    use tasku_db::{sql_params, ConnectionConfig, DatabaseConnection, DbError, SqlValue};

    // Test infrastructure

    fn memory_db() -> DatabaseConnection {
        let mut db = DatabaseConnection::open(ConnectionConfig::sqlite(":memory:")).unwrap();
        db.execute_action(
            "CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE)",
            &[],
        )
        .unwrap();
        db
    }

    fn row_count(db: &mut DatabaseConnection) -> i64 {
        db.execute_query("SELECT COUNT(*) AS n FROM t", &[])
            .unwrap()
            .first()
            .and_then(|row| row.get("n"))
            .and_then(SqlValue::as_i64)
            .unwrap()
    }

    fn arb_names() -> impl Strategy<Value = HashSet<String>> {
        prop::collection::hash_set("[a-zA-Z][a-zA-Z0-9 _'-]{0,24}", 1..20)
    }

    proptest! {
        #[test]
        fn inserts_yield_fresh_ids_and_read_back(names in arb_names()) {
            let mut db = memory_db();
            let mut seen = HashSet::new();

            for name in &names {
                db.execute_action("INSERT INTO t(name) VALUES (?)", sql_params![name.as_str()]).unwrap();
                let id = db.last_insert_id().unwrap();
                prop_assert!(id > 0);
                prop_assert!(seen.insert(id), "id {} handed out twice", id);

                let rows = db.execute_query("SELECT name FROM t WHERE id = ?", sql_params![id]).unwrap();
                let expected = SqlValue::from(name.as_str());
                prop_assert_eq!(rows.len(), 1);
                prop_assert_eq!(rows.first().unwrap().get("name"), Some(&expected));
            }
        }

        #[test]
        fn failed_batches_leave_no_rows(names in arb_names(), dup_at in any::<prop::sample::Index>()) {
            let mut db = memory_db();
            let names: Vec<String> = names.into_iter().collect();
            let duplicate = names[dup_at.index(names.len())].clone();

            db.execute_action("INSERT INTO t(name) VALUES (?)", sql_params![duplicate.as_str()]).unwrap();
            let before = row_count(&mut db);

            // One multi-row insert containing the duplicate somewhere.
            let placeholders = vec!["(?)"; names.len()].join(", ");
            let sql = format!("INSERT INTO t(name) VALUES {}", placeholders);
            let params: Vec<SqlValue> = names.iter().map(|n| SqlValue::from(n.as_str())).collect();

            let result = db.execute_action(&sql, &params);
            prop_assert!(matches!(result, Err(DbError::Action(_))));
            prop_assert_eq!(row_count(&mut db), before);

            // The next insert reports its own id, not one left over from the
            // rolled-back batch or the earlier insert. Names generated above
            // never start with a digit.
            db.execute_action("INSERT INTO t(name) VALUES (?)", sql_params!["0-fresh"]).unwrap();
            let id = db.last_insert_id().unwrap();
            let rows = db.execute_query("SELECT name FROM t WHERE id = ?", sql_params![id]).unwrap();
            let expected = SqlValue::from("0-fresh");
            prop_assert_eq!(rows.first().and_then(|row| row.get("name")), Some(&expected));
        }

        #[test]
        fn unmatched_lookups_are_empty_not_errors(id in 1_000u64..u64::MAX / 2) {
            let mut db = memory_db();
            let rows = db.execute_query("SELECT name FROM t WHERE id = ?", sql_params![id]);
            prop_assert!(rows.unwrap().is_empty());
        }
    }
}
