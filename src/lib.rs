//! Read-only terminal explorer for JSON documents.
//!
//! The core is [`state::Session`]: it owns the document tree, the projected
//! row list, the cursor and the input mode. [`ui`] draws a session and feeds
//! it key events; any other front end can do the same through
//! [`Session::handle`](state::Session::handle).

pub mod clipboard;
pub mod config;
pub mod error;
pub mod file;
pub mod keys;
pub mod observer;
pub mod query;
pub mod search;
pub mod state;
pub mod tree;
pub mod types;
pub mod ui;
pub mod view;

pub use config::Config;
pub use error::{Error, QueryError, Result};
pub use file::Document;
pub use keys::Action;
pub use observer::SessionObserver;
pub use query::{JsonPathEvaluator, QueryEvaluator};
pub use state::{Flow, Session};
pub use tree::Tree;
pub use types::{Mode, Node, NodeId, NodeKind, RowView};
