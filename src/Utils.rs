/// loaders of materials and reactions tables (CSV, JSON)
pub mod load_from_file;
/// export of costed routes
pub mod export;
