pub mod api;
pub mod datasets;
pub mod error;
pub mod facts;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod search;
pub mod submissions;
pub mod ui;
pub mod utils;
pub mod workbook;

pub use error::{EdgarError, EdgarResult};
