pub mod catalog_ops;
pub mod password;

pub use catalog_ops::CatalogOps;
