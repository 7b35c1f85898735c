pub mod json_body;
pub mod path_param;

pub use json_body::CatalogJson;
pub use path_param::CatalogPath;
