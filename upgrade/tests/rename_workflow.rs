//! Rename workflow tests against an in-memory alpha
//!
//! The fake transport answers queries from a fixed table and records every
//! write, so the tests can check the exact alter/mutate sequence.

use async_trait::async_trait;
use graph_upgrade::client::DropOp;
use graph_upgrade::{
    Connection, ConnectionConfig, Credentials, Mutation, Operation, RenameSelection,
    RenameWorkflow, Result, Transport, UpgradeError,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Default)]
struct Recorder {
    queries: Mutex<Vec<String>>,
    alters: Mutex<Vec<Operation>>,
    mutations: Mutex<Vec<Mutation>>,
    alter_failures: Mutex<u32>,
    closed: Mutex<bool>,
}

struct FakeAlpha {
    responses: HashMap<String, Value>,
    recorder: Arc<Recorder>,
}

#[async_trait]
impl Transport for FakeAlpha {
    async fn login(&self, _credentials: &Credentials) -> Result<()> {
        Ok(())
    }

    async fn query(&self, query: &str) -> Result<Value> {
        self.recorder.queries.lock().push(query.to_string());
        Ok(self
            .responses
            .get(query)
            .cloned()
            .unwrap_or_else(|| json!({ "nodes": [] })))
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<()> {
        self.recorder.mutations.lock().push(mutation.clone());
        Ok(())
    }

    async fn alter(&self, operation: &Operation) -> Result<()> {
        let mut failures = self.recorder.alter_failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(UpgradeError::Alter("Pending transactions found".into()));
        }
        drop(failures);
        self.recorder.alters.lock().push(operation.clone());
        Ok(())
    }

    fn close(&self) {
        *self.recorder.closed.lock() = true;
    }
}

fn person_schema() -> Value {
    json!({
        "schema": [
            {
                "predicate": "age",
                "type": "int",
                "index": true,
                "tokenizer": ["int"],
                "upsert": true
            },
            {"predicate": "name", "type": "string", "index": true, "tokenizer": ["exact"]},
            {"predicate": "unnecessaryEdge", "type": "uid"},
            {
                "predicate": "dgraph.type",
                "type": "string",
                "index": true,
                "tokenizer": ["exact"],
                "list": true
            }
        ],
        "types": [
            {
                "name": "Person",
                "fields": [{"name": "name"}, {"name": "age"}, {"name": "unnecessaryEdge"}]
            },
            {"name": "Place", "fields": [{"name": "name"}]}
        ]
    })
}

fn fake_alpha(recorder: Arc<Recorder>) -> FakeAlpha {
    let mut responses = HashMap::new();
    responses.insert("schema {}".to_string(), person_schema());
    responses.insert(
        "{ nodes(func: has(<age>)) { uid <age> } }".to_string(),
        json!({ "nodes": [{"uid": "0x1", "age": 30}, {"uid": "0x2", "age": 41}] }),
    );
    responses.insert(
        "{ nodes(func: type(Person)) { uid } }".to_string(),
        json!({ "nodes": [{"uid": "0x1"}, {"uid": "0x2"}] }),
    );
    FakeAlpha {
        responses,
        recorder,
    }
}

async fn open(recorder: &Arc<Recorder>) -> Connection<FakeAlpha> {
    Connection::open(fake_alpha(recorder.clone()), &ConnectionConfig::default())
        .await
        .expect("open connection")
}

fn person_selection() -> RenameSelection {
    RenameSelection {
        predicates: vec!["age".to_string()],
        types: vec!["Person".to_string()],
        drop: vec!["unnecessaryEdge".to_string()],
    }
}

#[tokio::test]
async fn test_full_rename_sequence() {
    let recorder = Arc::new(Recorder::default());
    let connection = open(&recorder).await;
    let mut output = Vec::new();

    let report = RenameWorkflow::new(
        &connection,
        Cursor::new(&b"dgraph.years\nname\nageOnEarth\nPlace\nHuman\n"[..]),
        &mut output,
    )
    .run(&person_selection())
    .await
    .expect("rename run");

    let alters = recorder.alters.lock().clone();
    assert_eq!(
        alters,
        vec![
            Operation::schema("ageOnEarth: int @index(int) @upsert .\n"),
            Operation::schema("type Human {\n  name\n  ageOnEarth\n}\n"),
            Operation::drop_type("Person"),
            Operation::drop_attr("age"),
            Operation::drop_attr("unnecessaryEdge"),
        ]
    );
    assert_eq!(alters[2].drop_op, Some(DropOp::Type));

    let mutations = recorder.mutations.lock().clone();
    assert_eq!(mutations.len(), 2);
    assert!(mutations.iter().all(|m| m.commit_now));
    assert_eq!(
        mutations[0].set_json,
        Some(json!([
            {"uid": "0x1", "ageOnEarth": 30},
            {"uid": "0x2", "ageOnEarth": 41}
        ]))
    );
    assert_eq!(
        mutations[1].set_json,
        Some(json!([
            {"uid": "0x1", "dgraph.type": "Human"},
            {"uid": "0x2", "dgraph.type": "Human"}
        ]))
    );
    assert_eq!(
        mutations[1].delete_json,
        Some(json!([
            {"uid": "0x1", "dgraph.type": "Person"},
            {"uid": "0x2", "dgraph.type": "Person"}
        ]))
    );

    assert_eq!(report.predicates.len(), 1);
    assert_eq!(report.predicates[0].new, "ageOnEarth");
    assert_eq!(report.predicates[0].copied_nodes, 2);
    assert_eq!(report.types[0].new, "Human");
    assert_eq!(report.types[0].retagged_nodes, 2);
    assert_eq!(report.dropped_predicates, vec!["age", "unnecessaryEdge"]);
    assert!(report.rewritten_types.is_empty());

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("new name can't start with `dgraph.`"));
    assert!(output.contains("new name can't be same as a name in existing schema"));
    assert!(output.contains("Enter new name for `Person`: "));
}

#[tokio::test]
async fn test_only_types_using_the_predicate_are_rewritten() {
    let recorder = Arc::new(Recorder::default());
    let connection = open(&recorder).await;
    let selection = RenameSelection {
        predicates: vec!["age".to_string()],
        ..RenameSelection::default()
    };

    let report = RenameWorkflow::new(&connection, Cursor::new(&b"years"[..]), Vec::new())
        .run(&selection)
        .await
        .unwrap();

    let alters = recorder.alters.lock().clone();
    assert_eq!(
        alters,
        vec![
            Operation::schema("years: int @index(int) @upsert .\n"),
            Operation::schema("type Person {\n  name\n  years\n  unnecessaryEdge\n}\n"),
            Operation::drop_attr("age"),
        ]
    );
    assert!(!alters.iter().any(|op| op.schema.starts_with("type Place")));
    assert!(!alters.iter().any(|op| op.drop_value == "Place"));
    assert_eq!(report.rewritten_types, vec!["Person"]);
}

#[tokio::test]
async fn test_transient_alter_failures_are_absorbed() {
    let recorder = Arc::new(Recorder::default());
    *recorder.alter_failures.lock() = 2;
    let connection = open(&recorder).await;

    let input = Cursor::new(&b"ageOnEarth Human"[..]);
    let result = RenameWorkflow::new(&connection, input, Vec::new())
        .run(&person_selection())
        .await;

    assert!(result.is_ok());
    assert_eq!(recorder.alters.lock().len(), 5);
}

#[tokio::test]
async fn test_persistent_alter_failure_stops_the_run() {
    let recorder = Arc::new(Recorder::default());
    *recorder.alter_failures.lock() = 3;
    let connection = open(&recorder).await;

    let input = Cursor::new(&b"ageOnEarth Human"[..]);
    let result = RenameWorkflow::new(&connection, input, Vec::new())
        .run(&person_selection())
        .await;

    match result {
        Err(UpgradeError::Alter(msg)) => assert_eq!(msg, "Pending transactions found"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(recorder.alters.lock().is_empty());
    assert!(recorder.mutations.lock().is_empty());
}

#[tokio::test]
async fn test_unknown_names_are_skipped() {
    let recorder = Arc::new(Recorder::default());
    let connection = open(&recorder).await;
    let selection = RenameSelection {
        predicates: vec!["missing".to_string()],
        types: vec!["Ghost".to_string()],
        drop: vec!["nothing".to_string()],
    };

    let report = RenameWorkflow::new(&connection, Cursor::new(&b""[..]), Vec::new())
        .run(&selection)
        .await
        .unwrap();

    assert_eq!(report.skipped, vec!["missing", "nothing", "Ghost"]);
    assert!(recorder.alters.lock().is_empty());
    assert_eq!(recorder.queries.lock().as_slice(), ["schema {}"]);
}

#[tokio::test]
async fn test_closing_connection_releases_transport() {
    let recorder = Arc::new(Recorder::default());
    let connection = open(&recorder).await;
    assert!(!*recorder.closed.lock());
    connection.close();
    assert!(*recorder.closed.lock());
}
