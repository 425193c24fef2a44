pub mod cursor;
pub mod recovery;
pub mod traversal;

pub use cursor::{CursorStore, FileCursorStore};
pub use recovery::{RecoveryAction, RecoveryPolicy};
pub use traversal::TraversalEngine;
