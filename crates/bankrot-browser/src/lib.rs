mod chrome_finder;
pub mod chromium;
pub mod document;
mod error;
mod launcher;
pub mod lookup;
mod profile;
pub mod wait;

pub use chrome_finder::ChromeFinder;
pub use chromium::{ChromiumSession, ChromiumView};
pub use document::{BrowserSession, DocumentView};
pub use error::{Error, Result};
pub use launcher::{LaunchOptions, DEFAULT_USER_AGENT};
pub use lookup::{BankruptLookup, CardPolicy, LookupConfig, RegistrySelectors, DEFAULT_SEARCH_URL};
pub use profile::ProfileDir;
pub use wait::WaitConfig;
