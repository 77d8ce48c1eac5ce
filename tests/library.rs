use iseql::store::{EventStore, FileStore, SavedEvent, SchemaField, export_event, import_event};
use iseql::{CompileOptions, Compiler, RequestDoc};

use pretty_assertions::assert_eq;
use std::fs;

const REQUEST: &str = r#"{
    "name": "GivesKeys",
    "op1": { "pred": "in", "existName": "", "args": { "arg1": "keys" } },
    "op2": { "pred": "hasPkg", "existName": "", "args": {} },
    "relation": { "type": "sequential", "seqOrder": "before", "seqGap": "" },
    "constraints": [],
    "exclusion": false,
    "projection": { "start": "M1.sf", "end": "M2.ef", "fields": [ { "source": "M1.arg1", "alias": "who" } ] }
}"#;

#[test]
fn missing_file_is_an_empty_library() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("lib.json")).unwrap();
    assert!(store.list().is_empty());
}

#[test]
fn mutations_survive_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib.json");

    let mut store = FileStore::open(&path).unwrap();
    store
        .put(SavedEvent::with_algebra("A", vec![SchemaField::new("x", "X")], "(M1)"))
        .unwrap();
    store.put(SavedEvent::stub("B", vec![])).unwrap();
    assert!(store.delete("B").unwrap());

    let reopened = FileStore::open(&path).unwrap();
    let names: Vec<&str> = reopened.list().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A"]);
    assert_eq!(reopened.get("A").unwrap().algebra(), Some("(M1)"));

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(leftovers, vec!["lib.json".to_string()]);
}

#[test]
fn unreadable_library_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib.json");
    fs::write(&path, "{ not an array").unwrap();

    let err = FileStore::open(&path).unwrap_err().to_string();
    assert!(err.contains("not a JSON array"), "{}", err);
}

#[test]
fn saved_request_recompiles_to_the_same_procedure() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path().join("lib.json")).unwrap();

    let doc = RequestDoc::from_json(REQUEST).unwrap();
    let request = doc.validate_and_build().unwrap();
    let compiled = Compiler::with_options(&store, CompileOptions::for_save())
        .unwrap()
        .compile(&request);
    store.put(SavedEvent::from_compiled(&compiled, &doc).unwrap()).unwrap();

    let saved = store.get("GivesKeys").unwrap();
    assert_eq!(saved.output_schema, vec![SchemaField::new("who", "who")]);
    assert_eq!(saved.algebra(), Some(compiled.expression.as_str()));
    assert!(saved.date.is_some());

    let restored = saved.request_doc().unwrap().unwrap();
    assert_eq!(restored, doc);
    let again = Compiler::with_options(&store, CompileOptions::for_save())
        .unwrap()
        .compile(&restored.validate_and_build().unwrap());
    assert_eq!(again.procedure, compiled.procedure);
}

#[test]
fn import_export_between_libraries() {
    let dir = tempfile::tempdir().unwrap();
    let mut source = FileStore::open(dir.path().join("a.json")).unwrap();
    source
        .put(SavedEvent::with_algebra("E", vec![SchemaField::new("who", "who")], "(M1) Bef_{δ=d} (M2)"))
        .unwrap();

    let exported = export_event(&source, "E").unwrap();
    let file = dir.path().join("E.json");
    fs::write(&file, &exported).unwrap();

    let mut target = FileStore::open(dir.path().join("b.json")).unwrap();
    let name = import_event(&mut target, &fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(name, "E");

    let reopened = FileStore::open(dir.path().join("b.json")).unwrap();
    assert_eq!(reopened.get("E"), source.get("E"));
}
