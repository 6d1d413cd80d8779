//! Integration tests for the query builder running against SQLite.
//!
//! These tests cover:
//! - Clause accumulation and SQL compilation
//! - Terminal calls and state resets
//! - Write validation errors
//! - Parameter binding
//! - Benchmark recording

use pretty_assertions::assert_eq;
use quarry::prelude::*;

fn open(log: BenchmarkLog) -> Database {
    quarry::builder()
        .benchmarks(log)
        .open("sqlite://:memory:")
        .expect("in-memory database")
}

async fn seeded() -> Database {
    let mut db = open(BenchmarkLog::new());
    db.query(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT, \
         age INTEGER, active INTEGER NOT NULL DEFAULT 1)",
    )
    .await
    .unwrap();
    db.query("CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL, title TEXT NOT NULL)")
        .await
        .unwrap();

    let people = [
        ("ada", "ada@example.com", 36, true),
        ("grace", "grace@navy.mil", 45, true),
        ("linus", "linus@example.com", 28, false),
    ];
    for (name, email, age, active) in people {
        db.set(("name", name))
            .set(("email", email))
            .set(("age", age))
            .set(("active", active))
            .insert("users", ())
            .await
            .unwrap();
    }

    db.query("INSERT INTO posts (user_id, title) VALUES (1, 'Notes'), (1, 'Engines'), (2, 'Compilers')")
        .await
        .unwrap();
    db
}

fn names(result: &ResultSet) -> Vec<&str> {
    result
        .column("name")
        .into_iter()
        .filter_map(Value::as_str)
        .collect()
}

// ============================================================================
// Fluent Accumulation
// ============================================================================

#[test]
fn test_fluent_calls_return_same_builder() {
    let mut db = open(BenchmarkLog::new());
    let expected: *const Database = &db;
    let returned: *const Database = db
        .select("name")
        .from("users")
        .r#where(("id", 5))
        .or_like(("name", "a"))
        .group_by("name")
        .order_by("name", "desc")
        .limit(1);
    assert!(std::ptr::eq(expected, returned));
}

#[test]
fn test_fluent_calls_do_not_connect() {
    let mut db = open(BenchmarkLog::new());
    db.select("*").from("users").r#where(("id", 1)).set(("name", "x"));
    assert!(!db.is_connected());
    assert_eq!(db.last_query(), None);
}

#[tokio::test]
async fn test_get_compiles_and_resets_select_scope() {
    let mut db = seeded().await;

    let result = db
        .select("name")
        .r#where(("id", 1))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(db.last_query(), Some("SELECT name FROM users WHERE id = 1"));
    assert_eq!(names(&result), vec!["ada"]);
    assert!(db.state().is_empty());

    let all = db.get("users", None, None).await.unwrap();
    assert_eq!(db.last_query(), Some("SELECT * FROM users"));
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_predicate_connectives() {
    let mut db = seeded().await;

    db.from("users")
        .r#where(("name", "ada"))
        .or_where(("age >", 40))
        .like(("email", "example"));
    assert_eq!(
        db.compile_select(),
        "SELECT * FROM users WHERE name = 'ada' OR age > 40 AND email LIKE '%example%'"
    );

    let result = db.get((), None, None).await.unwrap();
    assert_eq!(names(&result), vec!["ada"]);

    let predicates = &db.state().predicates;
    assert!(predicates.is_empty());
}

#[test]
fn test_first_predicate_has_no_connective() {
    let mut db = open(BenchmarkLog::new());
    db.or_where(("a", 1)).r#where(("b", 2)).or_not_like(("c", "x"));

    let predicates = &db.state().predicates;
    assert_eq!(predicates[0].sql, "a = 1");
    assert_eq!(predicates[1].sql, "AND b = 2");
    assert_eq!(predicates[2].sql, "OR c NOT LIKE '%x%'");
    assert_eq!(
        predicates.iter().map(|p| p.position).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[tokio::test]
async fn test_null_and_boolean_predicates() {
    let mut db = seeded().await;
    db.query("INSERT INTO users (name) VALUES ('anon')").await.unwrap();

    let result = db
        .r#where(("email", None::<&str>))
        .or_where(("active !=", true))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT * FROM users WHERE email IS NULL OR active != 1")
    );
    assert_eq!(names(&result), vec!["linus", "anon"]);
}

#[tokio::test]
async fn test_raw_predicates_are_not_escaped() {
    let mut db = seeded().await;

    let result = db
        .r#where("age > 30")
        .r#where(("age <", "age + 100", Quote::Raw))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT * FROM users WHERE age > 30 AND age < age + 100")
    );
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_map_of_conditions() {
    let mut db = seeded().await;

    let mut conditions = indexmap::IndexMap::new();
    conditions.insert("active", Value::from(true));
    conditions.insert("age >=", Value::from(36));

    let result = db.get_where("users", conditions, None, None).await.unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT * FROM users WHERE active = 1 AND age >= 36")
    );
    assert_eq!(names(&result), vec!["ada", "grace"]);
}

#[tokio::test]
async fn test_like_variants() {
    let mut db = seeded().await;

    let result = db
        .not_like(("email", "%.mil"))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT * FROM users WHERE email NOT LIKE '%.mil'")
    );
    assert_eq!(names(&result), vec!["ada", "linus"]);

    let result = db
        .like(("name", "ad"))
        .or_like(("name", "%nus"))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(names(&result), vec!["ada", "linus"]);

    let result = db.like("name").get("users", None, None).await.unwrap();
    assert_eq!(db.last_query(), Some("SELECT * FROM users WHERE name LIKE '%%'"));
    assert_eq!(names(&result), vec!["ada", "grace", "linus"]);
}

#[tokio::test]
async fn test_regex_predicates() {
    let mut db = seeded().await;

    let result = db
        .regex(("email", r"^[a-z]+@example\.com$"))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(names(&result), vec!["ada", "linus"]);

    let result = db
        .not_regex(("name", "^a"))
        .or_regex(("name", "^ad"))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT * FROM users WHERE name NOT REGEXP '^a' OR name REGEXP '^ad'")
    );
    assert_eq!(result.len(), 3);

    let result = db
        .or_not_regex(("email", "example"))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(names(&result), vec!["grace"]);
}

#[tokio::test]
async fn test_join_group_having_order() {
    let mut db = seeded().await;

    let result = db
        .select(["users.name", "COUNT(posts.id) AS total"])
        .from("users")
        .join("posts", "posts.user_id = users.id", "left")
        .group_by("users.name")
        .having("COUNT(posts.id) > 0")
        .order_by("users.name", "asc")
        .get((), None, None)
        .await
        .unwrap();

    assert_eq!(
        db.last_query(),
        Some(
            "SELECT users.name, COUNT(posts.id) AS total FROM users \
             LEFT JOIN posts ON posts.user_id = users.id GROUP BY users.name \
             HAVING COUNT(posts.id) > 0 ORDER BY users.name ASC"
        )
    );
    assert_eq!(names(&result), vec!["ada", "grace"]);
    assert_eq!(result.column("total"), vec![&Value::Int(2), &Value::Int(1)]);
}

#[tokio::test]
async fn test_join_with_unrecognised_type_and_free_condition() {
    let mut db = seeded().await;

    db.from("users u")
        .join("posts p", "p.user_id = u.id AND p.title <> ''", "sideways");
    assert_eq!(
        db.compile_select(),
        "SELECT * FROM users u JOIN posts p ON p.user_id = u.id AND p.title <> ''"
    );
    assert_eq!(db.get((), None, None).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_order_by_direction_only_and_distinct() {
    let mut db = seeded().await;

    let result = db
        .distinct(true)
        .select("active")
        .order_by("", "RANDOM()")
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT DISTINCT active FROM users ORDER BY RANDOM()")
    );
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_limit_and_offset() {
    let mut db = seeded().await;

    let result = db
        .order_by("id", "")
        .get("users", Some(2), Some(1))
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT * FROM users ORDER BY id LIMIT 2 OFFSET 1")
    );
    assert_eq!(names(&result), vec!["grace", "linus"]);

    let result = db.offset(2).get("users", None, None).await.unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT * FROM users LIMIT -1 OFFSET 2")
    );
    assert_eq!(result.len(), 1);
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_insert_without_set_fails() {
    let mut db = seeded().await;
    let err = db.insert("users", ()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingSet);

    let err = db.update("users", (), ("id", 1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingSet);

    let err = db.merge("users", ()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingSet);
}

#[tokio::test]
async fn test_insert_without_table_fails() {
    let mut db = seeded().await;
    let err = db.insert((), [("id", 1)]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTable);
    assert_eq!(db.state().set.len(), 1);
}

#[tokio::test]
async fn test_insert_uses_from_table() {
    let mut db = seeded().await;

    let result = db
        .from("users")
        .insert((), [("name", "hopper")])
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("INSERT INTO users (name) VALUES ('hopper')")
    );
    assert_eq!(result.total_rows(), 1);
    assert_eq!(result.insert_id(), Some(4));
    assert!(db.state().is_empty());
}

#[tokio::test]
async fn test_delete_requires_where() {
    let mut db = seeded().await;

    db.from("users");
    let err = db.delete((), ()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingWhere);

    let result = db.delete("users", ("id", 5)).await.unwrap();
    assert_eq!(db.last_query(), Some("DELETE FROM users WHERE id = 5"));
    assert_eq!(result.total_rows(), 0);

    let err = db.delete((), ("id", 1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTable);

    db.delete("users", ("id", 1)).await.unwrap();
    assert_eq!(db.count_records("users", ()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_update() {
    let mut db = seeded().await;

    let result = db
        .update("users", [("age", 37)], ("name", "ada"))
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("UPDATE users SET age = 37 WHERE name = 'ada'")
    );
    assert_eq!(result.total_rows(), 1);

    let ages = db
        .select("age")
        .get_where("users", ("name", "ada"), None, None)
        .await
        .unwrap();
    assert_eq!(ages.column("age"), vec![&Value::Int(37)]);
}

#[tokio::test]
async fn test_merge_replaces_row() {
    let mut db = seeded().await;

    db.merge(
        "users",
        vec![
            ("id", Value::from(1)),
            ("name", Value::from("augusta")),
            ("age", Value::from(36)),
        ],
    )
    .await
    .unwrap();
    assert_eq!(
        db.last_query(),
        Some("INSERT OR REPLACE INTO users (id, name, age) VALUES (1, 'augusta', 36)")
    );

    assert_eq!(db.count_records("users", ()).await.unwrap(), 3);
    let row = db.get_where("users", ("id", 1), None, None).await.unwrap();
    assert_eq!(names(&row), vec!["augusta"]);
}

#[tokio::test]
async fn test_count_records() {
    let mut db = seeded().await;

    assert_eq!(db.count_records("users", ()).await.unwrap(), 3);
    assert_eq!(
        db.last_query(),
        Some("SELECT COUNT(*) AS records_found FROM users")
    );
    assert_eq!(db.count_records("users", ("active", true)).await.unwrap(), 2);
    assert_eq!(
        db.from("users").count_records((), ("age >", 30)).await.unwrap(),
        2
    );

    let err = db.count_records((), ()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingTable);
}

// ============================================================================
// Binding and Escaping
// ============================================================================

#[tokio::test]
async fn test_bind_values_containing_markers() {
    let mut db = seeded().await;

    db.query_with(
        "INSERT INTO users (name, email) VALUES (?, ?)",
        binds!["wh?t", "q?@example.com"],
    )
    .await
    .unwrap();

    let found = db
        .query_with(
            "SELECT name FROM users WHERE email = ? AND name = ?",
            binds!["q?@example.com", "wh?t"],
        )
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT name FROM users WHERE email = 'q?@example.com' AND name = 'wh?t'")
    );
    assert_eq!(names(&found), vec!["wh?t"]);
}

#[test]
fn test_compile_binds() {
    let db = open(BenchmarkLog::new());
    assert_eq!(
        db.compile_binds("WHERE a = ? AND b = ?", binds![1, "x"]),
        "WHERE a = 1 AND b = 'x'"
    );
    assert_eq!(db.compile_binds("? ?", ["a?b", "c"]), "'a?b' 'c'");
    assert_eq!(db.compile_binds("? ?", binds![1]), "1 ?");
    assert_eq!(db.compile_binds("?", binds![1, 2, 3]), "1");
    assert_eq!(db.compile_binds("a = ?", binds![None::<i64>]), "a = NULL");
}

#[test]
fn test_escaping() {
    let db = open(BenchmarkLog::new());
    assert_eq!(db.escape_column("users"), "users");
    assert_eq!(db.escape_column("order"), "\"order\"");
    assert_eq!(
        db.escape_column(&db.escape_column("order")),
        db.escape_column("order")
    );
    assert_eq!(db.escape_column("t.group"), "t.\"group\"");
    assert_eq!(db.escape("it's"), "'it''s'");
    assert_eq!(db.escape(None::<i64>), "NULL");
    assert_eq!(db.escape(true), "1");
    assert_eq!(db.escape(vec![0xde_u8, 0xad]), "X'DEAD'");
    assert_eq!(db.escape_str("it's"), "it''s");
}

#[tokio::test]
async fn test_reserved_identifiers_round_trip() {
    let mut db = open(BenchmarkLog::new());
    db.query("CREATE TABLE \"order\" (id INTEGER PRIMARY KEY, \"group\" TEXT)")
        .await
        .unwrap();

    db.insert("order", [("group", "a")]).await.unwrap();
    assert_eq!(
        db.last_query(),
        Some("INSERT INTO \"order\" (\"group\") VALUES ('a')")
    );

    let result = db
        .select("group")
        .r#where(("group", "a"))
        .get("order", None, None)
        .await
        .unwrap();
    assert_eq!(result.column("group"), vec![&Value::from("a")]);
}

// ============================================================================
// Benchmarks and Errors
// ============================================================================

#[tokio::test]
async fn test_every_query_records_one_benchmark() {
    let log = BenchmarkLog::new();
    let mut db = open(log.clone());

    db.query("SELECT 1 AS one").await.unwrap();
    db.query_with("SELECT ? AS two", binds![2]).await.unwrap();
    assert_eq!(log.len(), 2);

    let entries = log.entries();
    assert_eq!(entries[0].sql, "SELECT 1 AS one");
    assert_eq!(entries[0].rows, 1);
    assert_eq!(entries[1].sql, "SELECT 2 AS two");
    assert!(log.total_time() >= entries[0].elapsed);

    db.query("SELECT * FROM nope").await.unwrap_err();
    assert_eq!(log.len(), 2);
}

#[tokio::test]
async fn test_benchmarks_disabled() {
    let log = BenchmarkLog::new();
    let config = DatabaseConfig::from_dsn("sqlite://:memory:").benchmark(false);
    let mut db = quarry::builder()
        .benchmarks(log.clone())
        .open_config(config)
        .unwrap();

    db.query("SELECT 1").await.unwrap();
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_query_error_keeps_state() {
    let mut db = seeded().await;

    db.select("name").r#where(("id", 1));
    let err = db.get("missing", None, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);
    assert_eq!(err.sql(), Some("SELECT name FROM missing WHERE id = 1"));
    assert!(err.to_string().contains("no such table: missing"));

    assert_eq!(db.state().predicates.len(), 1);
    assert_eq!(db.state().from, vec!["missing".to_string()]);
}

#[tokio::test]
async fn test_empty_statement_rejected() {
    let mut db = open(BenchmarkLog::new());
    let err = db.query("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);
}

// ============================================================================
// Table Prefix and Metadata
// ============================================================================

#[tokio::test]
async fn test_table_prefix() {
    let config = DatabaseConfig::from_dsn("sqlite://:memory:").table_prefix("app_");
    let mut db = quarry::builder()
        .benchmarks(BenchmarkLog::new())
        .open_config(config)
        .unwrap();
    assert_eq!(db.table_prefix(), "app_");

    db.query("CREATE TABLE app_users (id INTEGER PRIMARY KEY, name TEXT)")
        .await
        .unwrap();
    db.insert("users", [("name", "ada")]).await.unwrap();
    assert_eq!(
        db.last_query(),
        Some("INSERT INTO app_users (name) VALUES ('ada')")
    );

    let rows = db
        .select("users.name")
        .r#where(("users.id", 1))
        .get("users", None, None)
        .await
        .unwrap();
    assert_eq!(
        db.last_query(),
        Some("SELECT app_users.name FROM app_users WHERE app_users.id = 1")
    );
    assert_eq!(rows.len(), 1);

    assert!(db.table_exists("users").await.unwrap());
    assert!(!db.table_exists("posts").await.unwrap());
    assert_eq!(db.list_fields("users").await.unwrap(), vec!["id", "name"]);
}

#[test]
fn test_table_prefix_applies_to_raw_predicates() {
    let config = DatabaseConfig::from_dsn("sqlite://:memory:").table_prefix("app_");
    let mut db = quarry::builder()
        .benchmarks(BenchmarkLog::new())
        .open_config(config)
        .unwrap();

    db.r#where(("users.id", 1))
        .r#where(("users.score >", "posts.min", Quote::Raw))
        .r#where("users.active = 1")
        .having("users.total > 2");

    let predicates: Vec<&str> = db.state().predicates.iter().map(|p| p.sql.as_str()).collect();
    assert_eq!(
        predicates,
        vec![
            "app_users.id = 1",
            "AND app_users.score > posts.min",
            "AND app_users.active = 1",
        ]
    );
    assert_eq!(db.state().having[0].sql, "app_users.total > 2");
}

#[tokio::test]
async fn test_metadata() {
    let mut db = seeded().await;

    assert_eq!(db.list_tables().await.unwrap(), vec!["posts", "users"]);

    let fields = db.field_data("users").await.unwrap();
    assert_eq!(fields.len(), 5);
    assert!(fields[0].primary_key);
    assert_eq!(fields[1].name, "name");
    assert!(!fields[1].nullable);
    assert!(fields[2].nullable);
    assert_eq!(fields[4].default.as_deref(), Some("1"));
}
