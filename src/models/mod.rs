pub mod product;

pub use product::{FieldMap, Product};
