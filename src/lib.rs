//! Roster - an in-memory customer record index.
//!
//! Records loaded from CSV are shared between a doubly linked [`List`], a
//! [`Stack`], a [`Queue`] and a height-balanced [`IndexTree`], and can be
//! reordered with one of three list sorts.
//!
//! # Quick Start
//!
//! ```
//! use roster::{load_str, Algorithm, Config, Field, Session};
//!
//! let csv = "Customer Id,First Name,Country\n\
//!            b2,Ana,Chile\n\
//!            a1,Bo,Peru\n\
//!            c3,Cy,chile\n";
//!
//! let config = Config::default();
//! let mut session = Session::new(load_str(csv, config.primary_key), config);
//!
//! session.sort_by(Field::CustomerId, Algorithm::Merge);
//! let ids: Vec<&str> = session.list().iter().map(|r| r.customer_id.as_str()).collect();
//! assert_eq!(ids, ["a1", "b2", "c3"]);
//!
//! // Text keys compare case-insensitively.
//! let report = session.search_field(Field::Country, "CHILE").unwrap();
//! assert_eq!(report.linear.value.len(), 2);
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod index_tree;
pub mod key;
pub mod list;
pub mod loader;
pub mod queue;
pub mod record;
pub mod session;
pub mod sort;
pub mod stack;

pub use config::Config;
pub use error::{Error, Result};
pub use index_tree::IndexTree;
pub use key::{IntoKey, Key};
pub use list::List;
pub use loader::{load_csv, load_str, LoadStats, Loaded};
pub use queue::Queue;
pub use record::{Field, Record};
pub use session::Session;
pub use sort::{merge_sort, quick_sort, radix_quicksort, Algorithm};
pub use stack::Stack;
