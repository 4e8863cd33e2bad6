pub mod analyzer;
pub mod check_store;
pub mod model;
pub mod url_store;
