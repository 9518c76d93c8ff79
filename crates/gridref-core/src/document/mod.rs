//! Sheet state and edit logic (UI-agnostic).

mod cell;
mod edit;
mod ops;
mod state;

pub use cell::{Cell, ErrorCode};
pub use edit::{Edit, EditBatch, parse_edit_batch};
pub use state::Sheet;
