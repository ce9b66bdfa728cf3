//! End-to-end tests over live SQLite databases.

use chrono::NaiveDate;
use serde_json::json;

use slate_sql_core::{func, Column, DataType, Index, MetaData, Row, Select, SqlValue, Table};
use slate_sql_sqlite::{EngineError, SqliteEngine};

fn employee_table() -> Table {
    Table::new(
        "employee",
        vec![
            Column::new("_id", DataType::Text).unwrap().primary_key(),
            Column::new("name", DataType::Text).unwrap().not_null(),
            Column::new("date_of_birth", DataType::Date).unwrap(),
            Column::new("height", DataType::Real).unwrap(),
            Column::new("profile", DataType::Serialized).unwrap(),
            Column::new("memo", DataType::Text)
                .unwrap()
                .with_default("no memo")
                .unwrap(),
        ],
    )
    .unwrap()
}

fn employee_record(id: &str, name: &str) -> Vec<SqlValue> {
    vec![
        SqlValue::from(id),
        SqlValue::from(name),
        SqlValue::Date(NaiveDate::from_ymd_opt(1990, 5, 20).unwrap()),
        SqlValue::Real(1.75),
        SqlValue::Json(json!({"role": ["dev"], "department": null})),
        SqlValue::from("hired"),
    ]
}

fn engine_with(table: &Table) -> SqliteEngine {
    let engine = SqliteEngine::open_in_memory().unwrap();
    engine.execute(&table.create_table_sql()).unwrap();
    engine
}

#[test]
fn test_insert_and_select_round_trip() {
    let table = employee_table();
    let engine = engine_with(&table);
    let insert = table.insert();
    let record = employee_record("e1", "alice");
    engine.insert_record(&insert, &record).unwrap();

    let select = Select::new(table.all()).unwrap();
    let fetched = engine.select(&select).unwrap();
    assert_eq!(fetched, vec![record]);
}

#[test]
fn test_partial_row_takes_default() {
    let table = employee_table();
    let engine = engine_with(&table);
    let row = Row::from_pairs(vec![
        (String::from("_id"), SqlValue::from("e1")),
        (String::from("name"), SqlValue::from("alice")),
    ])
    .unwrap();
    engine.insert_row(&table.insert(), &row).unwrap();

    let select = Select::new(table.all()).unwrap();
    let rows = engine.select_rows(&select).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("memo"), Some(&SqlValue::from("no memo")));
    assert_eq!(rows[0].get("height"), Some(&SqlValue::Null));
}

#[test]
fn test_bulk_insert_isolates_conflicts() {
    let table = employee_table();
    let engine = engine_with(&table);
    let insert = table.insert();
    let records = vec![
        employee_record("e1", "alice"),
        employee_record("e1", "duplicate"),
        employee_record("e2", "bob"),
    ];
    let inserted = engine.insert_many_records(&insert, &records).unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(engine.count(&table).unwrap(), 2);
}

#[test]
fn test_not_null_violation_aborts_batch() {
    let table = Table::new(
        "note",
        vec![
            Column::new("k", DataType::Integer).unwrap().primary_key(),
            Column::new("v", DataType::Text).unwrap().not_null(),
        ],
    )
    .unwrap();
    let engine = engine_with(&table);
    let records = vec![
        vec![SqlValue::from(1), SqlValue::from("a")],
        vec![SqlValue::from(2), SqlValue::Null],
        vec![SqlValue::from(3), SqlValue::from("c")],
    ];
    // Only uniqueness conflicts are skipped; a NOT NULL violation stops
    // the batch where it happened.
    let err = engine
        .insert_many_records(&table.insert(), &records)
        .unwrap_err();
    assert!(!err.is_conflict());
    assert!(matches!(err, EngineError::Sqlite(_)));
    assert_eq!(engine.count(&table).unwrap(), 1);
}

#[test]
fn test_insdate_updates_conflicting_record() {
    let table = Table::new(
        "kv",
        vec![
            Column::new("k", DataType::Integer).unwrap().primary_key(),
            Column::new("v", DataType::Text).unwrap(),
        ],
    )
    .unwrap();
    let engine = engine_with(&table);
    let insert = table.insert();

    engine
        .insert_record(&insert, &[SqlValue::from(1), SqlValue::from("a")])
        .unwrap();
    engine
        .insdate_many_records(&insert, &[vec![SqlValue::from(1), SqlValue::from("b")]])
        .unwrap();

    let rows = engine.select(&Select::new(table.all()).unwrap()).unwrap();
    assert_eq!(rows, vec![vec![SqlValue::from(1), SqlValue::from("b")]]);

    // A record carrying only the primary key leaves the other columns
    // untouched.
    let key_only = Row::from_pairs(vec![(String::from("k"), SqlValue::from(1))]).unwrap();
    engine.insdate_many_rows(&insert, &[key_only]).unwrap();
    let rows = engine.select(&Select::new(table.all()).unwrap()).unwrap();
    assert_eq!(rows, vec![vec![SqlValue::from(1), SqlValue::from("b")]]);
}

#[test]
fn test_update_and_delete() {
    let table = employee_table();
    let engine = engine_with(&table);
    let insert = table.insert();
    engine
        .insert_many_records(
            &insert,
            &[employee_record("e1", "alice"), employee_record("e2", "bob")],
        )
        .unwrap();

    let update = table
        .update()
        .set("name", "carol")
        .unwrap()
        .where_(&[table.column("_id").unwrap().eq("e1").unwrap()])
        .unwrap();
    assert_eq!(engine.update(&update).unwrap(), 1);

    let select = Select::new(table.all()).unwrap()
        .where_(&[table.column("name").unwrap().eq("carol").unwrap()])
        .unwrap();
    assert_eq!(engine.select(&select).unwrap().len(), 1);

    let delete = table
        .delete()
        .where_(&[table.column("_id").unwrap().eq("e2").unwrap()])
        .unwrap();
    assert_eq!(engine.delete(&delete).unwrap(), 1);
    assert_eq!(engine.count(&table).unwrap(), 1);
}

#[test]
fn test_function_projection_decodes_as_integer() {
    let table = employee_table();
    let engine = engine_with(&table);
    let insert = table.insert();
    engine
        .insert_many_records(
            &insert,
            &[employee_record("e1", "alice"), employee_record("e2", "bob")],
        )
        .unwrap();

    let select = Select::new(vec![func::count(table.column("_id").unwrap())]).unwrap();
    let rows = engine.select_rows(&select).unwrap();
    assert_eq!(rows[0].get("count(_id)"), Some(&SqlValue::Integer(2)));
}

#[test]
fn test_create_all_and_catalog_names() {
    let table = employee_table();
    let index = Index::new(
        "employee_name_index",
        &[table.column("name").unwrap().into()],
    )
    .unwrap()
    .unique();

    let mut metadata = MetaData::new();
    metadata.register_table(table).unwrap();
    metadata.register_index(index).unwrap();

    let engine = SqliteEngine::open_in_memory().unwrap();
    engine.create_all(&metadata);
    assert_eq!(engine.table_names().unwrap(), ["employee"]);
    assert_eq!(engine.index_names().unwrap(), ["employee_name_index"]);

    // Re-running tolerates the already-created schema.
    engine.create_all(&metadata);
    assert_eq!(engine.table_names().unwrap(), ["employee"]);
}

#[test]
fn test_reflect_round_trip() {
    let table = employee_table();
    let index = Index::new(
        "employee_name_index",
        &[table.column("name").unwrap().into()],
    )
    .unwrap()
    .unique();
    let mut metadata = MetaData::new();
    metadata.register_table(table).unwrap();
    metadata.register_index(index).unwrap();

    let engine = SqliteEngine::open_in_memory().unwrap();
    engine.create_all(&metadata);

    let mut reflected = MetaData::new();
    engine
        .reflect(&mut reflected, &["employee.profile"])
        .unwrap();

    let table = reflected.table("employee").unwrap();
    assert_eq!(
        table.column_names(),
        ["_id", "name", "date_of_birth", "height", "profile", "memo"]
    );
    assert_eq!(table.primary_key_columns(), ["_id"]);
    assert_eq!(table.serialized_columns(), ["profile"]);
    assert_eq!(
        table.column("date_of_birth").unwrap().data_type(),
        DataType::Date
    );
    assert!(!table.column("name").unwrap().is_nullable());
    assert_eq!(
        table.column("memo").unwrap().default(),
        Some(&SqlValue::from("no memo"))
    );

    let index = reflected.index("employee_name_index").unwrap();
    assert!(index.is_unique());
    assert_eq!(index.table_name(), "employee");
    assert_eq!(index.column_specs(), ["name ASC"]);
}

#[test]
fn test_reflect_rejects_invalid_catalog_name() {
    let engine = SqliteEngine::open_in_memory().unwrap();
    // Quoting lets the engine store a name the identifier gate forbids.
    engine
        .execute("CREATE TABLE \"BadName\" (x INTEGER)")
        .unwrap();

    let mut metadata = MetaData::new();
    let err = engine.reflect(&mut metadata, &[]).unwrap_err();
    assert!(matches!(err, EngineError::Schema(_)));
    assert!(metadata.table_names().is_empty());
}

#[test]
fn test_drop_is_two_phase() {
    let mut metadata = MetaData::new();
    metadata.register_table(employee_table()).unwrap();

    let engine = SqliteEngine::open_in_memory().unwrap();
    // The table was never created, so the DROP fails and the registry
    // keeps its entry.
    assert!(engine.drop_table(&mut metadata, "employee").is_err());
    assert!(metadata.table("employee").is_ok());

    engine.create_all(&metadata);
    engine.drop_table(&mut metadata, "employee").unwrap();
    assert!(metadata.table("employee").is_err());
    assert!(engine.table_names().unwrap().is_empty());

    // Unknown names never reach the engine.
    assert!(matches!(
        engine.drop_table(&mut metadata, "ghost"),
        Err(EngineError::Schema(_))
    ));
}

#[test]
fn test_drop_all_empties_registry_and_catalog() {
    let table = employee_table();
    let index = Index::new(
        "employee_name_index",
        &[table.column("name").unwrap().into()],
    )
    .unwrap();
    let mut metadata = MetaData::new();
    metadata.register_table(table).unwrap();
    metadata.register_index(index).unwrap();

    let engine = SqliteEngine::open_in_memory().unwrap();
    engine.create_all(&metadata);
    engine.drop_all(&mut metadata);

    assert!(metadata.table_names().is_empty());
    assert!(metadata.index_names().is_empty());
    assert!(engine.table_names().unwrap().is_empty());
}

#[test]
fn test_open_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");

    let table = employee_table();
    {
        let engine = SqliteEngine::open(&path).unwrap();
        engine.execute(&table.create_table_sql()).unwrap();
        engine
            .insert_record(&table.insert(), &employee_record("e1", "alice"))
            .unwrap();
    }

    let engine = SqliteEngine::open(&path).unwrap();
    assert_eq!(engine.count(&table).unwrap(), 1);
}
