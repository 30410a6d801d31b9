//! Sitemap XML parsing
//!
//! Handles the `<urlset><url><loc>` document shape referenced by robots.txt
//! `Sitemap:` directives.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while parsing a sitemap document
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Failed to parse sitemap XML: {0}")]
    Xml(#[from] quick_xml::DeError),
}

#[derive(Debug, Deserialize)]
struct UrlEntry {
    loc: String,
}

#[derive(Debug, Deserialize)]
struct Urlset {
    #[serde(default)]
    url: Vec<UrlEntry>,
}

/// Parses a sitemap XML document into its list of location URLs
///
/// # Arguments
///
/// * `xml` - The raw sitemap document
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Every `<loc>` value in document order
/// * `Err(SitemapError)` - The document is not valid sitemap XML
pub fn parse_sitemap(xml: &str) -> Result<Vec<String>, SitemapError> {
    let urlset: Urlset = quick_xml::de::from_str(xml)?;
    Ok(urlset.url.into_iter().map(|entry| entry.loc).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_sitemap() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc></url>
  <url><loc>https://example.com/about</loc></url>
</urlset>"#;

        let locs = parse_sitemap(xml).unwrap();
        assert_eq!(
            locs,
            vec![
                "https://example.com/".to_string(),
                "https://example.com/about".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_empty_urlset() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
        let locs = parse_sitemap(xml).unwrap();
        assert!(locs.is_empty());
    }

    #[test]
    fn test_extra_url_fields_ignored() {
        let xml = r#"<urlset>
  <url><loc>https://example.com/</loc><lastmod>2024-01-01</lastmod><priority>0.8</priority></url>
</urlset>"#;
        let locs = parse_sitemap(xml).unwrap();
        assert_eq!(locs, vec!["https://example.com/".to_string()]);
    }

    #[test]
    fn test_malformed_xml_errors() {
        let result = parse_sitemap("<urlset><url><loc>broken");
        assert!(result.is_err());
    }
}
