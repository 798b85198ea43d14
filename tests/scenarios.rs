//! End-to-end walkthroughs of the session state machine.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use snappy_tree_lib::clipboard::MemoryClipboard;
use snappy_tree_lib::{Action, Config, Mode, Node, QueryError, Session, SessionObserver};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl SessionObserver for Recorder {
    fn on_select(&self, node: &Node) {
        self.events.lock().push(format!("select {}", node.path));
    }
    fn on_expand(&self, node: &Node) {
        self.events.lock().push(format!("expand {}", node.path));
    }
    fn on_collapse(&self, node: &Node) {
        self.events.lock().push(format!("collapse {}", node.path));
    }
    fn on_copy(&self, text: &str) {
        self.events.lock().push(format!("copy {text}"));
    }
    fn on_filter(&self, text: &str) {
        self.events.lock().push(format!("filter {text}"));
    }
    fn on_error(&self, error: &QueryError) {
        self.events.lock().push(format!("error {error}"));
    }
}

fn type_text(session: &mut Session, text: &str) {
    for c in text.chars() {
        session.handle(Action::Input(c));
    }
}

fn scenario_a() -> Session {
    let mut session = Session::from_value(json!({"a": 1, "b": {"c": 2}}), Config::default())
        .with_clipboard(MemoryClipboard::default());
    session.handle(Action::ExpandAll);
    session
}

#[test]
fn scenario_a_expand_all() {
    let session = scenario_a();
    assert_eq!(session.visible_paths(), ["$", "$.a", "$.b", "$.b.c"]);
}

#[test]
fn scenario_b_filter_by_key() {
    let mut session = scenario_a();
    session.handle(Action::EnterFilter);
    type_text(&mut session, "c");
    session.handle(Action::Commit);
    assert_eq!(session.visible_paths(), ["$.b.c"]);
    assert_eq!(session.cursor(), 0);
}

#[test]
fn scenario_c_query_rebuilds_tree() {
    let mut session = scenario_a();
    session.handle(Action::EnterQuery);
    assert_eq!(session.input(), "$");
    session.handle(Action::Backspace);
    type_text(&mut session, "$.b");
    session.handle(Action::Commit);
    assert_eq!(session.mode(), Mode::Normal);
    assert_eq!(session.visible_paths(), ["$", "$.c"]);
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.active_query(), Some("$.b"));
}

#[test]
fn emptied_query_buffer_shows_raw_document() {
    let mut session = scenario_a();
    session.handle(Action::EnterQuery);
    assert_eq!(session.active_query(), Some("$"));

    session.handle(Action::Backspace);
    assert_eq!(session.input(), "");
    assert_eq!(session.mode(), Mode::QueryInput);
    assert_eq!(session.active_query(), None);
    assert_eq!(session.visible_paths(), ["$", "$.a", "$.b"]);
    assert_eq!(session.current_value(), json!({"a": 1, "b": {"c": 2}}));
}

#[test]
fn escape_with_unknown_saved_path_lands_on_top() {
    let mut session = scenario_a();
    session.handle(Action::EnterQuery);
    session.handle(Action::Backspace);
    type_text(&mut session, "$.b");
    session.handle(Action::Commit);
    session.handle(Action::MoveDown);
    assert_eq!(session.current_path(), Some("$.c"));

    session.handle(Action::EnterQuery);
    session.handle(Action::Cancel);

    assert_eq!(session.active_query(), None);
    assert_eq!(session.visible_paths(), ["$", "$.a", "$.b", "$.b.c"]);
    assert_eq!(session.cursor(), 0);
}

#[test]
fn scenario_d_escape_restores_position() {
    let mut session = scenario_a();
    session.handle(Action::End);
    assert_eq!(session.current_path(), Some("$.b.c"));
    let before = session.visible_paths();

    session.handle(Action::EnterQuery);
    assert_eq!(session.input(), "$.b.c");
    assert_eq!(session.mode(), Mode::QueryInput);
    session.handle(Action::Cancel);

    assert_eq!(session.mode(), Mode::Normal);
    assert_eq!(session.visible_paths(), before);
    assert_eq!(session.current_path(), Some("$.b.c"));
    assert_eq!(session.active_query(), None);
}

#[test]
fn live_query_ignores_invalid_prefixes() {
    let recorder = Arc::new(Recorder::default());
    let mut session = scenario_a().with_observer(recorder.clone());
    session.handle(Action::EnterQuery);
    session.handle(Action::Backspace);
    type_text(&mut session, "$.b.");
    // "$.b." does not parse; the "$.b" result stays on screen
    assert_eq!(session.visible_paths(), ["$", "$.c"]);
    assert!(recorder.events().iter().all(|e| !e.starts_with("error")));
}

#[test]
fn committed_query_error_is_reported() {
    let recorder = Arc::new(Recorder::default());
    let mut session = scenario_a().with_observer(recorder.clone());
    session.handle(Action::EnterQuery);
    session.handle(Action::Backspace);
    type_text(&mut session, "$[");
    session.handle(Action::Commit);
    let events = recorder.events();
    assert!(events.iter().any(|e| e.starts_with("error invalid expression")));
    assert!(events.contains(&"filter $[".to_string()));
}

#[test]
fn filter_callback_only_for_non_empty_input() {
    let recorder = Arc::new(Recorder::default());
    let mut session = scenario_a().with_observer(recorder.clone());
    session.handle(Action::EnterSearch);
    session.handle(Action::Commit);
    session.handle(Action::EnterGoto);
    type_text(&mut session, "$.a");
    session.handle(Action::Commit);
    let filters: Vec<String> = recorder
        .events()
        .into_iter()
        .filter(|e| e.starts_with("filter"))
        .collect();
    assert_eq!(filters, ["filter $.a"]);
    assert_eq!(session.current_path(), Some("$.a"));
}

#[test]
fn expansion_callbacks_fire() {
    let recorder = Arc::new(Recorder::default());
    let mut session = Session::from_value(json!({"b": {"c": 2}}), Config::default())
        .with_observer(recorder.clone());
    session.handle(Action::MoveDown);
    session.handle(Action::Toggle);
    session.handle(Action::Toggle);
    assert_eq!(recorder.events(), ["select $.b", "expand $.b", "collapse $.b"]);
}

#[test]
fn copy_exports_value_path_and_key() {
    let clipboard = Arc::new(MemoryClipboard::default());
    let recorder = Arc::new(Recorder::default());
    let mut session = scenario_a()
        .with_clipboard(clipboard.clone())
        .with_observer(recorder.clone());

    session.handle(Action::MoveDown);
    session.handle(Action::MoveDown);
    session.handle(Action::CopyValue);
    assert_eq!(clipboard.last().as_deref(), Some("{\n  \"c\": 2\n}"));
    session.handle(Action::CopyPath);
    assert_eq!(clipboard.last().as_deref(), Some("$.b"));
    session.handle(Action::CopyKey);
    assert_eq!(clipboard.last().as_deref(), Some("b"));

    session.handle(Action::MoveDown);
    session.handle(Action::CopyValue);
    assert_eq!(clipboard.last().as_deref(), Some("2"));
    assert!(recorder.events().contains(&"copy $.b".to_string()));
}

#[test]
fn copy_is_disabled_by_config() {
    let clipboard = Arc::new(MemoryClipboard::default());
    let recorder = Arc::new(Recorder::default());
    let session = Session::from_value(json!({"a": "x"}), Config::default().read_only())
        .with_clipboard(clipboard.clone())
        .with_observer(recorder.clone());
    session.copy_current_value();
    session.copy_current_path();
    session.copy_current_key();
    assert_eq!(clipboard.last(), None);
    assert!(recorder.events().is_empty());
}

#[test]
fn search_respects_active_filter() {
    let mut session = Session::from_value(
        json!({"users": [{"name": "ann"}, {"name": "bob"}], "admin": "ann"}),
        Config::default(),
    );
    session.handle(Action::ExpandAll);
    session.handle(Action::EnterFilter);
    type_text(&mut session, "name");
    session.handle(Action::Commit);
    session.handle(Action::EnterSearch);
    type_text(&mut session, "ann");
    session.handle(Action::Commit);
    // "$.admin" is filtered out, so only the nested name matches
    assert_eq!(session.match_status().count, 1);
    assert_eq!(session.current_path(), Some("$.users[0].name"));
}

#[test]
fn empty_document_views_are_safe() {
    let mut session = Session::from_value(Value::Null, Config::default());
    for action in [
        Action::MoveDown,
        Action::PageDown,
        Action::End,
        Action::CollapseOrParent,
        Action::Toggle,
        Action::NextMatch,
    ] {
        session.handle(action);
    }
    session.handle(Action::EnterFilter);
    type_text(&mut session, "zzz");
    assert!(session.visible().is_empty());
    assert_eq!(session.cursor(), 0);
    session.handle(Action::MoveDown);
    assert_eq!(session.current_node().map(|n| n.path.clone()), None);
    session.handle(Action::Cancel);
    assert_eq!(session.visible_paths(), ["$"]);
}
