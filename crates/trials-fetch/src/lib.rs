//! ClinicalTrials.gov v2 search client.
//!
//! Builds study searches, fetches result pages over HTTP and hands back the
//! raw JSON documents. Network errors are reported through [`FetchError`];
//! timeouts are fixed and there is no automatic retry.
//!
//! # Example
//!
//! ```no_run
//! use trials_fetch::{RegistryClient, SearchQuery, StudyStatus};
//!
//! fn lung_cancer_in_japan() -> trials_fetch::Result<()> {
//!     let client = RegistryClient::new()?;
//!     let query = SearchQuery::new()
//!         .term("lung cancer")
//!         .location("Japan")
//!         .status(StudyStatus::Recruiting);
//!     let response = client.search(&query)?;
//!     println!("{} studies", response.studies.len());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod query;

pub use client::{DEFAULT_BASE_URL, RegistryClient, SearchResponse};
pub use error::{FetchError, Result};
pub use query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SearchQuery, StudyStatus};
