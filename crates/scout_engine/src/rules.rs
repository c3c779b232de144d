//! Ordered extraction rules and the single evaluator that runs them.
//!
//! A field is described by a [`RuleChain`]: rules are tried in order, the
//! matches of each rule in document order, and the first match the field's
//! acceptance function takes is the value. Later rules are never consulted
//! once a value is accepted.

use regex::Regex;
use scraper::{Html, Selector};

/// What to take from an element matched by a CSS rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    InnerHtml,
    Text,
    Attr(&'static str),
}

/// Declarative form of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Elements matching a CSS selector.
    Css {
        selector: &'static str,
        capture: Capture,
    },
    /// First capture group of a regular expression over the raw HTML.
    Pattern(&'static str),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid selector {selector:?} in {field} rules")]
    Selector { field: String, selector: String },
    #[error("invalid pattern {pattern:?} in {field} rules: {message}")]
    Pattern {
        field: String,
        pattern: String,
        message: String,
    },
}

#[derive(Debug)]
enum Matcher {
    Css(Selector, Capture),
    Pattern(Regex),
}

/// A page prepared once for every field's rules.
pub struct Page<'a> {
    raw: &'a str,
    document: Html,
}

impl<'a> Page<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            document: Html::parse_document(raw),
        }
    }

    pub fn raw(&self) -> &str {
        self.raw
    }

    pub fn document(&self) -> &Html {
        &self.document
    }
}

/// Compiled, ordered rules for one field.
#[derive(Debug)]
pub struct RuleChain {
    field: String,
    matchers: Vec<Matcher>,
}

impl RuleChain {
    pub fn compile(field: &str, rules: &[Rule]) -> Result<Self, RuleError> {
        let matchers = rules
            .iter()
            .map(|rule| match *rule {
                Rule::Css { selector, capture } => Selector::parse(selector)
                    .map(|sel| Matcher::Css(sel, capture))
                    .map_err(|_| RuleError::Selector {
                        field: field.to_string(),
                        selector: selector.to_string(),
                    }),
                Rule::Pattern(pattern) => Regex::new(pattern)
                    .map(Matcher::Pattern)
                    .map_err(|err| RuleError::Pattern {
                        field: field.to_string(),
                        pattern: pattern.to_string(),
                        message: err.to_string(),
                    }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            field: field.to_string(),
            matchers,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// The first raw capture, in rule order then document order, that `accept` maps to a value.
    pub fn first_accepted<T>(&self, page: &Page<'_>, mut accept: impl FnMut(&str) -> Option<T>) -> Option<T> {
        for matcher in &self.matchers {
            let found = match matcher {
                Matcher::Css(selector, capture) => page
                    .document
                    .select(selector)
                    .filter_map(|element| match capture {
                        Capture::InnerHtml => Some(element.inner_html()),
                        Capture::Text => Some(element.text().collect::<String>()),
                        Capture::Attr(name) => element.value().attr(name).map(str::to_string),
                    })
                    .find_map(|raw| accept(&raw)),
                Matcher::Pattern(regex) => regex
                    .captures_iter(page.raw)
                    .filter_map(|caps| caps.get(1))
                    .find_map(|m| accept(m.as_str())),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }
}

// Class and id fragments match case-insensitively.
const DESCRIPTION_RULES: &[Rule] = &[
    Rule::Css { selector: r#"div[class*="job-description" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"div[class*="jobdescription" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"div[class*="description" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"div[class*="job-details" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"div[class*="jobdetails" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"div[class*="posting-description" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"div[id="job-description" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"div[id="jobdescription" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"section[class*="description" i]"#, capture: Capture::InnerHtml },
    Rule::Css { selector: r#"article[class*="job" i]"#, capture: Capture::InnerHtml },
];

const LOCATION_RULES: &[Rule] = &[
    Rule::Pattern(r#"(?i)<[^>]*class=["'][^"']*location[^"']*["'][^>]*>([^<]+)"#),
    Rule::Pattern(r#"(?i)<[^>]*itemprop=["']jobLocation["'][^>]*>([^<]+)"#),
    Rule::Pattern(r"(?i)(?:Location|Office|City)[\s:]+</?\w+[^>]*>?\s*([A-Z][^<\n]{3,50})"),
    Rule::Pattern(r#"(?i)"addressLocality"\s*:\s*"([^"]+)""#),
    Rule::Pattern(r#"(?i)"jobLocation"[^}]*"name"\s*:\s*"([^"]+)""#),
];

const DATE_RULES: &[Rule] = &[
    Rule::Pattern(r#"(?i)<[^>]*itemprop=["']datePosted["'][^>]*content=["']([^"']+)["']"#),
    Rule::Pattern(r#"(?i)"datePosted"\s*:\s*"([^"]+)""#),
    Rule::Pattern(r"(?i)(?:Posted|Date|Published)[\s:]+([A-Z][a-z]+ \d{1,2},? \d{4})"),
    Rule::Pattern(r"(?i)(?:Posted|Date|Published)[\s:]+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})"),
    Rule::Pattern(r"(\d{4}-\d{2}-\d{2})T\d{2}:\d{2}"),
];

const DEPARTMENT_RULES: &[Rule] = &[
    Rule::Pattern(r#"(?i)<[^>]*class=["'][^"']*department[^"']*["'][^>]*>([^<]+)"#),
    Rule::Pattern(r"(?i)(?:Department|Team|Division)[\s:]+</?\w+[^>]*>?\s*([^<\n]{3,50})"),
    Rule::Pattern(r#"(?i)"department"\s*:\s*"([^"]+)""#),
];

const EMPLOYMENT_TYPE_RULES: &[Rule] = &[
    Rule::Pattern(r#"(?i)<[^>]*itemprop=["']employmentType["'][^>]*>([^<]+)"#),
    Rule::Pattern(r#"(?i)"employmentType"\s*:\s*"([^"]+)""#),
    Rule::Pattern(r"(?i)(?:Job Type|Employment|Contract)[\s:]+([^<\n]{3,30})"),
];

const APPLY_RULES: &[Rule] = &[
    Rule::Pattern(r#"<a[^>]*class=["'][^"']*apply[^"']*["'][^>]*href=["']([^"']+)["']"#),
    Rule::Pattern(r#"<a[^>]*href=["']([^"']+)["'][^>]*class=["'][^"']*apply[^"']*["']"#),
    Rule::Pattern(r#"<a[^>]*href=["']([^"']+)["'][^>]*>\s*(?:<[^>]+>\s*)*Apply\b"#),
    Rule::Pattern(r#"<a[^>]*href=["']([^"']*[Aa]pply[^"']*)["']"#),
];

/// One rule chain per extracted field.
#[derive(Debug)]
pub struct FieldRules {
    pub description: RuleChain,
    pub location: RuleChain,
    pub date_posted: RuleChain,
    pub department: RuleChain,
    pub employment_type: RuleChain,
    pub apply_url: RuleChain,
}

impl FieldRules {
    /// Rules tuned for the platform's job detail templates.
    pub fn standard() -> Result<Self, RuleError> {
        Ok(Self {
            description: RuleChain::compile("description", DESCRIPTION_RULES)?,
            location: RuleChain::compile("location", LOCATION_RULES)?,
            date_posted: RuleChain::compile("date_posted", DATE_RULES)?,
            department: RuleChain::compile("department", DEPARTMENT_RULES)?,
            employment_type: RuleChain::compile("employment_type", EMPLOYMENT_TYPE_RULES)?,
            apply_url: RuleChain::compile("apply_url", APPLY_RULES)?,
        })
    }
}
