use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::clipboard::{ClipboardWriter, SystemClipboard};
use crate::config::Config;
use crate::file::Document;
use crate::keys::Action;
use crate::observer::{NoopObserver, SessionObserver};
use crate::query::{looks_like_query, path_to_wildcard, JsonPathEvaluator, QueryEvaluator};
use crate::search::{goto_index, search, SearchState};
use crate::tree::Tree;
use crate::types::{MatchStatus, Metadata, Mode, Node, NodeId, RowView};
use crate::view::{clamp_cursor, project, row_views};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything one viewer instance knows: the immutable source document, the
/// tree currently on screen, and the modal input state. Every event goes
/// through [`Session::handle`].
pub struct Session {
    raw: Arc<Value>,
    tree: Tree,
    rows: Vec<NodeId>,
    cursor: usize,
    mode: Mode,
    input: String,
    filter: String,
    // expression that produced `tree`; None while showing the raw document
    tree_source: Option<String>,
    saved_path: Option<String>,
    search: SearchState,
    page_height: usize,
    show_help: bool,
    config: Config,
    metadata: Metadata,
    evaluator: Box<dyn QueryEvaluator>,
    observer: Box<dyn SessionObserver>,
    clipboard: Box<dyn ClipboardWriter>,
}

impl Session {
    pub fn new(document: Document, config: Config) -> Self {
        let tree = Self::raw_tree(&document.value, &config);
        let metadata = Metadata {
            filename: document.name,
            size: document.size,
            node_count: tree.node_count(tree.root()),
        };
        let mut session = Self {
            raw: document.value,
            tree,
            rows: Vec::new(),
            cursor: 0,
            mode: Mode::Normal,
            input: String::new(),
            filter: String::new(),
            tree_source: None,
            saved_path: None,
            search: SearchState::default(),
            page_height: 20,
            show_help: false,
            config,
            metadata,
            evaluator: Box::new(JsonPathEvaluator),
            observer: Box::new(NoopObserver),
            clipboard: Box::new(SystemClipboard::new()),
        };
        session.refresh();
        session
    }

    pub fn from_value(value: Value, config: Config) -> Self {
        Self::new(Document::from_value(value), config)
    }

    pub fn with_evaluator(mut self, evaluator: impl QueryEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardWriter + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    fn raw_tree(raw: &Value, config: &Config) -> Tree {
        let mut tree = Tree::build(raw);
        if config.initially_expanded {
            tree.set_expanded(tree.root(), true);
        }
        tree
    }

    // ----- accessors for the presentation layer -----

    pub fn rows(&self) -> Vec<RowView> {
        self.rows_window(0, self.rows.len())
    }

    /// Presentation rows `offset..offset + len` of the visible list.
    pub fn rows_window(&self, offset: usize, len: usize) -> Vec<RowView> {
        let generation = self.tree.generation();
        row_views(
            &self.tree,
            &self.rows,
            offset..offset.saturating_add(len),
            self.cursor,
            |id| self.search.is_match(generation, id),
        )
    }

    pub fn visible(&self) -> &[NodeId] {
        &self.rows
    }

    pub fn visible_paths(&self) -> Vec<String> {
        self.rows.iter().map(|&id| self.tree.get(id).path.clone()).collect()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn active_query(&self) -> Option<&str> {
        self.tree_source.as_deref()
    }

    pub fn match_status(&self) -> MatchStatus {
        self.search.status(self.tree.generation())
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn search_term(&self) -> &str {
        self.search.term()
    }

    pub fn current_id(&self) -> Option<NodeId> {
        self.rows.get(self.cursor).copied()
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.current_id().map(|id| self.tree.get(id))
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_node().map(|n| n.path.as_str())
    }

    /// The document as currently shown: the raw document, or the last query
    /// result.
    pub fn current_value(&self) -> Value {
        match self.tree_source {
            None => (*self.raw).clone(),
            Some(_) => self.tree.to_value(self.tree.root()),
        }
    }

    // ----- event entry point -----

    pub fn handle(&mut self, action: Action) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::Resize(height) => self.page_height = usize::from(height).max(1),
            Action::Input(c) if self.mode.is_input() => {
                self.input.push(c);
                self.live_update();
            }
            Action::Backspace if self.mode.is_input() => {
                if self.input.pop().is_some() {
                    self.live_update();
                }
            }
            Action::Commit if self.mode.is_input() => self.commit(),
            Action::Cancel if self.mode.is_input() => self.cancel(),
            _ if self.mode.is_input() => {}
            Action::MoveUp => self.move_to(self.cursor.saturating_sub(1)),
            Action::MoveDown => self.move_to(self.cursor + 1),
            Action::PageUp => self.move_to(self.cursor.saturating_sub(self.half_page())),
            Action::PageDown => self.move_to(self.cursor + self.half_page()),
            Action::Home => self.move_to(0),
            Action::End => self.move_to(self.rows.len().saturating_sub(1)),
            Action::CollapseOrParent => self.collapse_or_parent(),
            Action::Toggle => self.toggle_expansion(),
            Action::ExpandAll => self.expand_all(),
            Action::CollapseAll => self.collapse_all(),
            Action::EnterFilter => self.enter_filter(),
            Action::EnterQuery => self.enter_query(),
            Action::EnterSearch => self.enter_input(Mode::SearchInput),
            Action::EnterGoto => self.enter_input(Mode::GotoInput),
            Action::NextMatch => {
                if let Some(id) = self.search.next(self.tree.generation()) {
                    self.jump_to(id);
                }
            }
            Action::PrevMatch => {
                if let Some(id) = self.search.prev(self.tree.generation()) {
                    self.jump_to(id);
                }
            }
            Action::CopyValue => self.copy_current_value(),
            Action::CopyPath => self.copy_current_path(),
            Action::CopyKey => self.copy_current_key(),
            Action::Reset => self.reset_view(),
            Action::ToggleHelp => {
                if self.config.show_help {
                    self.show_help = !self.show_help;
                }
            }
            Action::Input(_) | Action::Backspace | Action::Commit | Action::Cancel => {}
        }
        Flow::Continue
    }

    // ----- projection -----

    fn refresh(&mut self) {
        self.rows = project(&self.tree, &self.filter, self.mode);
        self.cursor = clamp_cursor(self.cursor, self.rows.len());
    }

    /// Re-project and keep the cursor on the same node when it is still visible.
    fn refresh_keep_cursor(&mut self) {
        let current = self.current_id();
        self.refresh();
        if let Some(pos) = current.and_then(|id| self.rows.iter().position(|&r| r == id)) {
            self.cursor = pos;
        }
    }

    fn replace_tree(&mut self, tree: Tree, source: Option<String>) {
        self.tree = tree;
        self.tree_source = source;
        self.search.clear();
        self.cursor = 0;
        self.refresh();
    }

    // ----- navigation -----

    fn half_page(&self) -> usize {
        (self.page_height / 2).max(1)
    }

    fn move_to(&mut self, index: usize) {
        let target = clamp_cursor(index, self.rows.len());
        if target == self.cursor {
            return;
        }
        self.cursor = target;
        if let Some(node) = self.current_node() {
            self.observer.on_select(node);
        }
    }

    fn jump_to(&mut self, id: NodeId) {
        if let Some(pos) = self.rows.iter().position(|&r| r == id) {
            self.move_to(pos);
        }
    }

    fn collapse_or_parent(&mut self) {
        let Some(id) = self.current_id() else { return };
        let node = self.tree.get(id);
        if node.has_children() && node.expanded {
            self.tree.set_expanded(id, false);
            self.observer.on_collapse(self.tree.get(id));
            self.refresh_keep_cursor();
        } else if let Some(parent) = node.parent {
            self.jump_to(parent);
        }
    }

    fn toggle_expansion(&mut self) {
        let Some(id) = self.current_id() else { return };
        let node = self.tree.get(id);
        if !node.has_children() {
            return;
        }
        let expanded = !node.expanded;
        self.tree.set_expanded(id, expanded);
        if expanded {
            self.observer.on_expand(self.tree.get(id));
        } else {
            self.observer.on_collapse(self.tree.get(id));
        }
        self.refresh_keep_cursor();
    }

    pub fn expand_all(&mut self) {
        self.tree.expand_all();
        self.refresh_keep_cursor();
    }

    pub fn collapse_all(&mut self) {
        self.tree.collapse_all();
        self.refresh_keep_cursor();
    }

    pub fn reset_view(&mut self) {
        self.mode = Mode::Normal;
        self.input.clear();
        self.filter.clear();
        self.saved_path = None;
        let tree = Self::raw_tree(&self.raw, &self.config);
        self.replace_tree(tree, None);
    }

    // ----- input modes -----

    fn enter_input(&mut self, mode: Mode) {
        self.mode = mode;
        self.input.clear();
    }

    fn enter_filter(&mut self) {
        self.enter_input(Mode::FilterInput);
        self.filter.clear();
        self.refresh_keep_cursor();
    }

    fn enter_query(&mut self) {
        let path = self.current_path().unwrap_or("$").to_string();
        self.input = path_to_wildcard(&path);
        self.saved_path = Some(path);
        self.mode = Mode::QueryInput;
        self.refresh_keep_cursor();
        self.live_query();
    }

    fn live_update(&mut self) {
        match self.mode {
            Mode::FilterInput => {
                self.filter.clone_from(&self.input);
                self.refresh_keep_cursor();
            }
            Mode::QueryInput => self.live_query(),
            _ => {}
        }
    }

    fn live_query(&mut self) {
        if self.input.is_empty() {
            let tree = Self::raw_tree(&self.raw, &self.config);
            self.replace_tree(tree, None);
            return;
        }
        if !looks_like_query(&self.input) {
            return;
        }
        match self.evaluator.evaluate(&self.input, &self.raw) {
            Ok(value) => self.install_query_result(&value, self.input.clone()),
            // partial expressions fail constantly while typing
            Err(err) => debug!(expr = %self.input, %err, "live query skipped"),
        }
    }

    fn install_query_result(&mut self, value: &Value, expr: String) {
        let mut tree = Tree::build(value);
        tree.set_expanded(tree.root(), true);
        self.replace_tree(tree, Some(expr));
    }

    fn commit(&mut self) {
        let buffer = std::mem::take(&mut self.input);
        let mode = std::mem::replace(&mut self.mode, Mode::Normal);
        match mode {
            Mode::FilterInput => {
                self.filter.clone_from(&buffer);
                self.refresh_keep_cursor();
            }
            Mode::QueryInput => {
                self.saved_path = None;
                self.commit_query(&buffer);
            }
            Mode::SearchInput => self.perform_search(&buffer),
            Mode::GotoInput => self.goto_path(&buffer),
            Mode::Normal => {}
        }
        if !buffer.is_empty() {
            self.observer.on_filter(&buffer);
        }
    }

    fn commit_query(&mut self, expr: &str) {
        if expr.is_empty() {
            self.refresh_keep_cursor();
            return;
        }
        match self.evaluator.evaluate(expr, &self.raw) {
            Ok(value) => {
                info!(expr, "query applied");
                self.install_query_result(&value, expr.to_string());
            }
            Err(err) => {
                self.observer.on_error(&err);
                self.refresh_keep_cursor();
            }
        }
    }

    fn cancel(&mut self) {
        let mode = std::mem::replace(&mut self.mode, Mode::Normal);
        self.input.clear();
        self.filter.clear();
        if mode != Mode::QueryInput {
            self.refresh_keep_cursor();
            return;
        }

        let mut tree = Tree::build(&self.raw);
        tree.expand_all();
        self.replace_tree(tree, None);
        if let Some(path) = self.saved_path.take() {
            self.cursor = self
                .rows
                .iter()
                .position(|&id| self.tree.get(id).path == path)
                .unwrap_or(0);
        }
    }

    fn perform_search(&mut self, term: &str) {
        if term.is_empty() {
            return;
        }
        let matches = search(&self.tree, &self.rows, term);
        debug!(term, hits = matches.len(), "search");
        self.search = SearchState::new(term, matches, self.tree.generation());
        if let Some(first) = self.search.current(self.tree.generation()) {
            self.jump_to(first);
        }
    }

    fn goto_path(&mut self, target: &str) {
        if let Some(index) = goto_index(&self.tree, &self.rows, target) {
            self.move_to(index);
        }
    }

    // ----- clipboard -----

    fn copy(&self, text: String) {
        if let Err(err) = self.clipboard.write(&text) {
            debug!(%err, "clipboard write failed");
        }
        self.observer.on_copy(&text);
    }

    pub fn copy_current_value(&self) {
        if !self.config.enable_clipboard {
            return;
        }
        let Some(id) = self.current_id() else { return };
        let node = self.tree.get(id);
        let text = match node.value.scalar_text() {
            Some(text) => text,
            None => match serde_json::to_string_pretty(&self.tree.to_value(id)) {
                Ok(text) => text,
                Err(err) => {
                    debug!(%err, "could not serialize subtree");
                    return;
                }
            },
        };
        self.copy(text);
    }

    pub fn copy_current_path(&self) {
        if !self.config.enable_clipboard {
            return;
        }
        if let Some(node) = self.current_node() {
            self.copy(node.path.clone());
        }
    }

    pub fn copy_current_key(&self) {
        if !self.config.enable_clipboard {
            return;
        }
        if let Some(node) = self.current_node() {
            self.copy(node.key.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use serde_json::json;

    fn session(doc: Value) -> Session {
        Session::from_value(doc, Config::default()).with_clipboard(MemoryClipboard::default())
    }

    fn type_text(s: &mut Session, text: &str) {
        for c in text.chars() {
            s.handle(Action::Input(c));
        }
    }

    #[test]
    fn starts_with_root_expanded() {
        let s = session(json!({"a": 1, "b": [1]}));
        assert_eq!(s.visible_paths(), ["$", "$.a", "$.b"]);
        assert_eq!(s.metadata().node_count, 4);
    }

    #[test]
    fn collapsed_config_shows_only_root() {
        let config = Config { initially_expanded: false, ..Config::default() };
        let s = Session::from_value(json!({"a": 1}), config);
        assert_eq!(s.visible_paths(), ["$"]);
    }

    #[test]
    fn movement_is_clamped() {
        let mut s = session(json!({"a": 1, "b": 2}));
        s.handle(Action::MoveUp);
        assert_eq!(s.cursor(), 0);
        s.handle(Action::End);
        assert_eq!(s.cursor(), 2);
        s.handle(Action::MoveDown);
        assert_eq!(s.cursor(), 2);
        s.handle(Action::Home);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn page_moves_half_the_height() {
        let items: Vec<i32> = (0..30).collect();
        let mut s = session(json!(items));
        s.handle(Action::Resize(10));
        s.handle(Action::PageDown);
        assert_eq!(s.cursor(), 5);
        s.handle(Action::PageDown);
        s.handle(Action::PageUp);
        assert_eq!(s.cursor(), 5);
        s.handle(Action::End);
        s.handle(Action::PageDown);
        assert_eq!(s.cursor(), 30);
    }

    #[test]
    fn left_collapses_then_climbs() {
        let mut s = session(json!({"a": {"b": 1}}));
        s.expand_all();
        s.handle(Action::End);
        assert_eq!(s.current_path(), Some("$.a.b"));
        s.handle(Action::CollapseOrParent);
        assert_eq!(s.current_path(), Some("$.a"));
        s.handle(Action::CollapseOrParent);
        assert_eq!(s.visible_paths(), ["$", "$.a"]);
        assert_eq!(s.current_path(), Some("$.a"));
        s.handle(Action::CollapseOrParent);
        assert_eq!(s.current_path(), Some("$"));
    }

    #[test]
    fn toggle_ignores_leaves() {
        let mut s = session(json!({"a": 1, "b": {"c": 2}}));
        s.handle(Action::MoveDown);
        s.handle(Action::Toggle);
        assert_eq!(s.visible().len(), 3);
        s.handle(Action::MoveDown);
        s.handle(Action::Toggle);
        assert_eq!(s.visible_paths(), ["$", "$.a", "$.b", "$.b.c"]);
    }

    #[test]
    fn input_mode_swallows_navigation() {
        let mut s = session(json!({"a": 1}));
        s.handle(Action::EnterSearch);
        s.handle(Action::MoveDown);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.mode(), Mode::SearchInput);
    }

    #[test]
    fn filter_commit_keeps_filter_and_escape_clears_it() {
        let mut s = session(json!({"alpha": 1, "beta": 2}));
        s.handle(Action::EnterFilter);
        type_text(&mut s, "alp");
        assert_eq!(s.visible_paths(), ["$.alpha"]);
        s.handle(Action::Commit);
        assert_eq!(s.mode(), Mode::Normal);
        assert_eq!(s.filter(), "alp");
        assert_eq!(s.visible_paths(), ["$.alpha"]);

        s.handle(Action::EnterSearch);
        type_text(&mut s, "x");
        s.handle(Action::Cancel);
        assert_eq!(s.filter(), "");
        assert_eq!(s.visible().len(), 3);
    }

    #[test]
    fn backspace_reprojects_filter() {
        let mut s = session(json!({"ab": 1, "ac": 2}));
        s.handle(Action::EnterFilter);
        type_text(&mut s, "ab");
        assert_eq!(s.visible_paths(), ["$.ab"]);
        s.handle(Action::Backspace);
        assert_eq!(s.visible_paths(), ["$.ab", "$.ac"]);
    }

    #[test]
    fn query_seed_generalizes_indices() {
        let mut s = session(json!({"items": [{"name": "x"}, {"name": "y"}]}));
        s.expand_all();
        s.handle(Action::End);
        assert_eq!(s.current_path(), Some("$.items[1].name"));
        s.handle(Action::EnterQuery);
        assert_eq!(s.input(), "$.items[*].name");
        assert_eq!(s.visible_paths(), ["$", "$[0]", "$[1]"]);
        assert_eq!(s.active_query(), Some("$.items[*].name"));
    }

    #[derive(Default)]
    struct Errors(parking_lot::Mutex<Vec<String>>);

    impl SessionObserver for Errors {
        fn on_error(&self, error: &crate::error::QueryError) {
            self.0.lock().push(error.to_string());
        }
    }

    #[test]
    fn failed_commit_keeps_tree() {
        let errors = Arc::new(Errors::default());
        let mut s = session(json!({"a": 1, "b": 2})).with_observer(errors.clone());
        s.handle(Action::EnterQuery);
        s.handle(Action::Backspace);
        type_text(&mut s, "$.missing");
        s.handle(Action::Commit);
        assert_eq!(s.mode(), Mode::Normal);
        assert_eq!(s.visible_paths(), ["$", "$.a", "$.b"]);
        assert_eq!(errors.0.lock().len(), 1);
    }

    #[test]
    fn search_jumps_and_wraps() {
        let mut s = session(json!({"x1": 1, "y": 2, "x2": 3}));
        s.handle(Action::EnterSearch);
        type_text(&mut s, "x");
        s.handle(Action::Commit);
        assert_eq!(s.current_path(), Some("$.x1"));
        assert_eq!(s.match_status(), MatchStatus { position: 1, count: 2 });
        s.handle(Action::NextMatch);
        assert_eq!(s.current_path(), Some("$.x2"));
        s.handle(Action::NextMatch);
        assert_eq!(s.current_path(), Some("$.x1"));
        s.handle(Action::PrevMatch);
        assert_eq!(s.current_path(), Some("$.x2"));
        assert!(s.rows()[3].is_match);

        let window = s.rows_window(2, 5);
        assert_eq!(window.len(), 2);
        assert!(!window[0].is_match && !window[0].is_cursor);
        assert!(window[1].is_match && window[1].is_cursor);
    }

    #[test]
    fn reset_drops_matches() {
        let mut s = session(json!({"x": 1}));
        s.handle(Action::EnterSearch);
        type_text(&mut s, "x");
        s.handle(Action::Commit);
        s.handle(Action::Reset);
        assert_eq!(s.match_status().count, 0);
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn goto_moves_cursor() {
        let mut s = session(json!({"a": 1, "b": {"c": 2}}));
        s.expand_all();
        s.handle(Action::EnterGoto);
        type_text(&mut s, "$.B.C");
        s.handle(Action::Commit);
        assert_eq!(s.current_path(), Some("$.b.c"));
        s.handle(Action::EnterGoto);
        type_text(&mut s, "nowhere");
        s.handle(Action::Commit);
        assert_eq!(s.current_path(), Some("$.b.c"));
    }

    #[test]
    fn current_value_tracks_query() {
        let mut s = session(json!({"a": {"b": 1}}));
        assert_eq!(s.current_value(), json!({"a": {"b": 1}}));
        s.handle(Action::EnterQuery);
        type_text(&mut s, ".a");
        s.handle(Action::Commit);
        assert_eq!(s.current_value(), json!({"b": 1}));
    }

    #[test]
    fn quit_is_reported() {
        let mut s = session(json!(null));
        assert_eq!(s.handle(Action::Quit), Flow::Quit);
        assert_eq!(s.handle(Action::MoveDown), Flow::Continue);
    }
}
