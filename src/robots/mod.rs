//! Robots.txt policy for the crawl pipeline
//!
//! This module parses robots.txt into per-agent rule groups and answers the
//! two questions the crawler asks before every fetch: is this URL allowed,
//! and how long must we wait between fetches. It also collects `Sitemap:`
//! directives for the crawl orchestrator.

mod policy;
mod sitemap;

pub use policy::{RobotsPolicy, RuleSet, DEFAULT_DELAY_MS};
pub use sitemap::{parse_sitemap, SitemapError};
