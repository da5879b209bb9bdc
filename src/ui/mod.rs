pub mod browser;
pub mod prompt;

pub use browser::{run_browser, BrowserAction, BrowserState};
pub use prompt::{choose_from_list, choose_mode, confirm, prompt_search, SearchMode};
