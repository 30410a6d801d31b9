//! Robots.txt parser and rule evaluation
//!
//! Patterns are simplified glob-to-regex: `*` in an Allow/Disallow value is
//! substituted with `.*` and the result matched as an unanchored regex
//! (substring match), not full robots.txt glob semantics.

use regex::Regex;
use std::collections::HashMap;
use std::time::Duration;

/// Politeness delay applied when robots.txt specifies none
pub const DEFAULT_DELAY_MS: u64 = 100;

/// Allow/disallow patterns and crawl-delay for one user-agent group
#[derive(Debug, Default)]
pub struct RuleSet {
    allow: Vec<Regex>,
    disallow: Vec<Regex>,
    /// Crawl-delay in milliseconds; 0 means unset
    delay_ms: u64,
}

/// Parsed robots.txt rules, grouped by user-agent token
#[derive(Debug)]
pub struct RobotsPolicy {
    groups: HashMap<String, RuleSet>,
    sitemaps: Vec<String>,
    default_delay: Duration,
}

impl RobotsPolicy {
    /// Parses robots.txt content into per-agent rule groups
    ///
    /// Recognized directives are `User-agent:`, `Allow:`, `Disallow:`,
    /// `Crawl-delay:` (integer milliseconds) and `Sitemap:`; anything else
    /// is ignored. A `User-agent:` line opens a new current-agent context;
    /// subsequent rule lines attach to it until the next `User-agent:`.
    /// Patterns that fail to compile as regexes are skipped.
    pub fn parse(content: &str, default_delay: Duration) -> Self {
        let mut groups: HashMap<String, RuleSet> = HashMap::new();
        let mut sitemaps = Vec::new();
        let mut current_agent = String::new();

        for line in content.lines() {
            let mut pieces = line.trim().split(' ');
            let directive = match pieces.next() {
                Some(d) => d.to_lowercase(),
                None => continue,
            };
            let value = match pieces.next() {
                Some(v) => v.trim(),
                None => continue,
            };
            if value.is_empty() {
                continue;
            }

            match directive.as_str() {
                "user-agent:" => {
                    current_agent = value.to_string();
                    groups.entry(current_agent.clone()).or_default();
                }
                "allow:" => {
                    if let Some(re) = compile_pattern(value) {
                        groups.entry(current_agent.clone()).or_default().allow.push(re);
                    }
                }
                "disallow:" => {
                    if let Some(re) = compile_pattern(value) {
                        groups
                            .entry(current_agent.clone())
                            .or_default()
                            .disallow
                            .push(re);
                    }
                }
                "crawl-delay:" => {
                    if let Ok(ms) = value.parse::<u64>() {
                        groups.entry(current_agent.clone()).or_default().delay_ms = ms;
                    }
                }
                "sitemap:" => {
                    sitemaps.push(value.to_string());
                }
                _ => {}
            }
        }

        Self {
            groups,
            sitemaps,
            default_delay,
        }
    }

    /// Creates a policy with no rules, allowing everything
    ///
    /// Used when robots.txt cannot be fetched.
    pub fn permissive(default_delay: Duration) -> Self {
        Self {
            groups: HashMap::new(),
            sitemaps: Vec::new(),
            default_delay,
        }
    }

    /// Checks whether a URL may be fetched by the given agent
    ///
    /// Evaluation is sequential overwrite, not first-match-wins: the full
    /// disallow list is walked and each pattern sets the flag (match means
    /// disallowed, non-match means allowed), so only the last pattern's
    /// outcome survives. A non-empty allow list is then walked the same way
    /// and its final outcome replaces the disallow result entirely. An
    /// unknown agent (and no `*` group) or an empty rule set allows the URL.
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        let rules = match self.group(agent) {
            Some(r) => r,
            None => return true,
        };

        let mut allowed = true;
        for pattern in &rules.disallow {
            allowed = !pattern.is_match(url);
        }
        if !rules.allow.is_empty() {
            for pattern in &rules.allow {
                allowed = pattern.is_match(url);
            }
        }
        allowed
    }

    /// Returns the politeness delay for the given agent
    ///
    /// The group's crawl-delay when set and non-zero, otherwise the
    /// configured default.
    pub fn delay(&self, agent: &str) -> Duration {
        match self.group(agent) {
            Some(rules) if rules.delay_ms > 0 => Duration::from_millis(rules.delay_ms),
            _ => self.default_delay,
        }
    }

    /// Returns the sitemap URLs listed in robots.txt
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Resolves the rule group for an agent, falling back to the `*` group
    fn group(&self, agent: &str) -> Option<&RuleSet> {
        self.groups.get(agent).or_else(|| self.groups.get("*"))
    }
}

/// Compiles an Allow/Disallow value into an unanchored regex
///
/// `*` is literally substituted with `.*` before compilation.
fn compile_pattern(value: &str) -> Option<Regex> {
    Regex::new(&value.replace('*', ".*")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> RobotsPolicy {
        RobotsPolicy::parse(content, Duration::from_millis(DEFAULT_DELAY_MS))
    }

    #[test]
    fn test_permissive_allows_everything() {
        let policy = RobotsPolicy::permissive(Duration::from_millis(100));
        assert!(policy.is_allowed("/any/path", "searchlight"));
        assert!(policy.is_allowed("/admin", "searchlight"));
    }

    #[test]
    fn test_disallow_pattern_rejects() {
        let policy = parse("User-agent: *\nDisallow: /private*");
        assert!(!policy.is_allowed("/private/page", "searchlight"));
        assert!(policy.is_allowed("/public/page", "searchlight"));
    }

    #[test]
    fn test_glob_becomes_regex() {
        let policy = parse("User-agent: *\nDisallow: /docs/*.pdf");
        assert!(!policy.is_allowed("/docs/manual.pdf", "searchlight"));
        assert!(policy.is_allowed("/docs/manual.html", "searchlight"));
    }

    #[test]
    fn test_last_disallow_pattern_wins() {
        // The second pattern does not match, so its outcome (allowed)
        // overwrites the first pattern's rejection.
        let policy = parse("User-agent: *\nDisallow: /private*\nDisallow: /never-matches");
        assert!(policy.is_allowed("/private/page", "searchlight"));
    }

    #[test]
    fn test_allow_list_overrides_disallow() {
        let policy = parse("User-agent: *\nDisallow: /private*\nAllow: /private/page$");
        assert!(policy.is_allowed("/private/page", "searchlight"));
    }

    #[test]
    fn test_allow_list_non_match_forces_rejection() {
        // The allow list is evaluated last; its non-match outcome replaces
        // the disallow result even though no disallow pattern matched.
        let policy = parse("User-agent: *\nDisallow: /private*\nAllow: /only-this");
        assert!(!policy.is_allowed("/public/page", "searchlight"));
    }

    #[test]
    fn test_specific_agent_group() {
        let policy = parse("User-agent: badbot\nDisallow: /\n\nUser-agent: *\nDisallow: /admin*");
        assert!(!policy.is_allowed("/page", "badbot"));
        assert!(policy.is_allowed("/page", "goodbot"));
        assert!(!policy.is_allowed("/admin/users", "goodbot"));
    }

    #[test]
    fn test_delay_default_when_unset() {
        let policy = parse("User-agent: *\nDisallow: /admin");
        assert_eq!(policy.delay("searchlight"), Duration::from_millis(100));
    }

    #[test]
    fn test_delay_default_when_zero() {
        let policy = parse("User-agent: *\nCrawl-delay: 0");
        assert_eq!(policy.delay("searchlight"), Duration::from_millis(100));
    }

    #[test]
    fn test_delay_from_robots() {
        let policy = parse("User-agent: *\nCrawl-delay: 250");
        assert_eq!(policy.delay("searchlight"), Duration::from_millis(250));
    }

    #[test]
    fn test_delay_specific_agent_over_wildcard() {
        let policy =
            parse("User-agent: searchlight\nCrawl-delay: 500\n\nUser-agent: *\nCrawl-delay: 200");
        assert_eq!(policy.delay("searchlight"), Duration::from_millis(500));
        assert_eq!(policy.delay("otherbot"), Duration::from_millis(200));
    }

    #[test]
    fn test_sitemaps_collected() {
        let policy = parse(
            "Sitemap: https://example.com/sitemap.xml\nUser-agent: *\nDisallow: /admin\nSitemap: https://example.com/other.xml",
        );
        assert_eq!(
            policy.sitemaps(),
            &[
                "https://example.com/sitemap.xml".to_string(),
                "https://example.com/other.xml".to_string()
            ]
        );
    }

    #[test]
    fn test_unrecognized_directives_ignored() {
        let policy = parse("Host: example.com\nUser-agent: *\nNoindex: /tmp\nDisallow: /admin*");
        assert!(!policy.is_allowed("/admin/page", "searchlight"));
        assert!(policy.is_allowed("/page", "searchlight"));
    }

    #[test]
    fn test_invalid_pattern_skipped() {
        let policy = parse("User-agent: *\nDisallow: /bad[\nDisallow: /admin*");
        assert!(!policy.is_allowed("/admin/page", "searchlight"));
        assert!(policy.is_allowed("/other", "searchlight"));
    }

    #[test]
    fn test_lines_without_value_ignored() {
        let policy = parse("User-agent: *\nDisallow:\nDisallow: /admin*");
        assert!(!policy.is_allowed("/admin/page", "searchlight"));
    }
}
