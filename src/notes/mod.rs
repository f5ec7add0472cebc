//! Note records as handed over by the storage layer, plus the category
//! taxonomy used to compare them.

mod record;
mod store;
mod taxonomy;

pub use record::{Note, UNTITLED};
pub use store::{StoreError, load_notes, load_taxonomy, parse_notes};
pub use taxonomy::CategoryTaxonomy;
