//! Path classification: map a file path to a single category label.
//!
//! A [`Classifier`] holds an ordered table of categories, each with an
//! ordered list of patterns. The first category with a matching pattern
//! wins; a path nothing matches falls into [`FALLBACK_CATEGORY`].
//!
//! Patterns come in three kinds, chosen by their shape:
//!
//! - `dir/`: directory. Matches paths starting with `dir/` or containing
//!   `/dir/` anywhere, so nested directories count too.
//! - `*.ext`: suffix. Matches paths ending with `.ext`.
//! - `name`: literal. Matches the path `name` itself or any path ending in
//!   `/name`, never a longer file name that merely ends with it.
//!
//! ## Example
//!
//! ```rust
//! use tagloclib::Classifier;
//!
//! let classifier = Classifier::default();
//! assert_eq!(classifier.classify("foo/scripts/deploy.sh"), "Scripts");
//! assert_eq!(classifier.classify("db/init.sql"), "Database");
//! assert_eq!(classifier.classify("reinit.sql"), "Other");
//! ```

use crate::data::report::LABEL_KEY;
use crate::error::TaglocError;
use crate::Result;

/// Category for paths no rule matches.
pub const FALLBACK_CATEGORY: &str = "Other";

/// The built-in rule table, in precedence order.
pub const DEFAULT_RULES: &[(&str, &[&str])] = &[
    ("Application Code", &["*.go", "templates/", "static/"]),
    (
        "IaC",
        &[
            "terraform/",
            "k8s/",
            "Dockerfile",
            "docker-compose.yml",
            "skaffold.yaml",
            "clouddeploy.yaml",
        ],
    ),
    ("Database", &["init.sql", "migrations/"]),
    ("CI/CD", &[".github/"]),
    ("Documentation", &["*.md", "docs/", "LICENSE"]),
    ("Scripts", &["scripts/", "*.py"]),
    ("Config", &[".env", "go.mod", "go.sum", ".gitignore"]),
];

/// A single path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// `dir/`; `nested` is the same pattern with a leading `/`
    Directory { prefix: String, nested: String },
    /// `*suffix`
    Suffix(String),
    /// `name`; `nested` is `/name`
    Literal { name: String, nested: String },
}

impl PathPattern {
    /// Build a pattern from its textual form.
    pub fn parse(pattern: &str) -> Self {
        if pattern.ends_with('/') {
            PathPattern::Directory {
                prefix: pattern.to_string(),
                nested: format!("/{}", pattern),
            }
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            PathPattern::Suffix(suffix.to_string())
        } else {
            PathPattern::Literal {
                name: pattern.to_string(),
                nested: format!("/{}", pattern),
            }
        }
    }

    /// Check whether a `/`-separated path matches.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Directory { prefix, nested } => {
                path.starts_with(prefix.as_str()) || path.contains(nested.as_str())
            }
            PathPattern::Suffix(suffix) => path.ends_with(suffix.as_str()),
            PathPattern::Literal { name, nested } => {
                path == name || path.ends_with(nested.as_str())
            }
        }
    }
}

/// One category and the patterns that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: String,
    pub patterns: Vec<PathPattern>,
}

impl CategoryRule {
    fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}

/// Ordered rule table. First matching category wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(category, patterns)| CategoryRule {
                category: category.to_string(),
                patterns: patterns.iter().map(|p| PathPattern::parse(p)).collect(),
            })
            .collect();
        Self { rules }
    }
}

impl Classifier {
    /// Create a classifier with no rules; everything is [`FALLBACK_CATEGORY`].
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a category with its patterns, after every existing rule.
    ///
    /// Fails on an empty pattern, and on a category named like the report's
    /// label key.
    pub fn rule(mut self, category: &str, patterns: &[&str]) -> Result<Self> {
        if category == LABEL_KEY {
            return Err(TaglocError::ReservedCategory(category.to_string()));
        }

        let mut parsed = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            if pattern.is_empty() || *pattern == "/" {
                return Err(TaglocError::InvalidPattern {
                    category: category.to_string(),
                    pattern: pattern.to_string(),
                });
            }
            parsed.push(PathPattern::parse(pattern));
        }

        self.rules.push(CategoryRule {
            category: category.to_string(),
            patterns: parsed,
        });
        Ok(self)
    }

    /// The rules in precedence order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category of `path`, or [`FALLBACK_CATEGORY`] if nothing matches.
    pub fn classify(&self, path: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.category.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Every label `classify` can return, in precedence order, fallback last.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::with_capacity(self.rules.len() + 1);
        for rule in &self.rules {
            if !categories.contains(&rule.category.as_str()) {
                categories.push(&rule.category);
            }
        }
        if !categories.contains(&FALLBACK_CATEGORY) {
            categories.push(FALLBACK_CATEGORY);
        }
        categories
    }
}
