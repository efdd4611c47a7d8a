pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod oracle;
pub mod pipeline;
pub mod prompt;
pub mod registry;
pub mod scrape;
pub mod transfer;
pub mod workbook;
pub mod xlsx;
