/// Backend URL, session path, and credentials from environment variables
pub mod environment;

/// Settings loading from finance.toml
pub mod settings;
