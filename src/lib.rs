pub mod config;
pub mod connector;
pub mod error;
pub mod importer;
pub mod link;
pub mod loader;
pub mod logging;
pub mod mapper;
pub mod uri;
