//! URL handling module for Site-Mapper
//!
//! This module provides URL normalization into crawl targets, site key
//! (netloc) extraction, parsing of user-typed domains, and the scope
//! predicate that keeps a crawl on one site and away from binary assets.

mod domain;
mod input;
mod normalize;
mod scope;

// Re-export main functions
pub use domain::extract_domain;
pub use input::{site_url_from_input, EMPTY_DOMAIN, INVALID_DOMAIN};
pub use normalize::{normalize_url, CrawlTarget};
pub use scope::is_in_scope;
