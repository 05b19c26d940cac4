mod entry;
mod product;

pub use entry::Entry;
pub use product::Product;
