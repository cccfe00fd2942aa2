//! Data model for tabular data representation

mod key;
mod normalize;
mod table;

pub use key::{KeyDeriver, KEY_SEPARATOR};
pub use normalize::Normalizer;
pub use table::{Row, TabularDataset};
