use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::SuiteConfig;

pub mod run;

// ================== Public types ==================

/// Category a case is filed under; selects cases from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum Tag {
    Validation,
    NegativeCase,
    Schema,
    Performance,
    Load,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Validation => "validation",
            Tag::NegativeCase => "negative-case",
            Tag::Schema => "schema",
            Tag::Performance => "performance",
            Tag::Load => "load",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a case sends and what it expects back.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    ListEndpoint {
        path: String,
        expected_status: StatusCode,
    },
    InvalidEndpoint {
        path: String,
    },
    SchemaFirstItem {
        path: String,
    },
    SchemaAllItems {
        path: String,
    },
    WrongMethod {
        path: String,
    },
    Throughput {
        path: String,
        request_count: usize,
        threshold: Duration,
    },
    ConcurrentThroughput {
        path: String,
        request_count: usize,
        concurrency: usize,
        threshold: Duration,
    },
    Health {
        path: String,
    },
}

impl Check {
    pub fn method(&self) -> Method {
        match self {
            Check::WrongMethod { .. } => Method::POST,
            _ => Method::GET,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Check::ListEndpoint { path, .. }
            | Check::InvalidEndpoint { path }
            | Check::SchemaFirstItem { path }
            | Check::SchemaAllItems { path }
            | Check::WrongMethod { path }
            | Check::Throughput { path, .. }
            | Check::ConcurrentThroughput { path, .. }
            | Check::Health { path } => path,
        }
    }

    pub fn expected_status(&self) -> StatusCode {
        match self {
            Check::ListEndpoint {
                expected_status, ..
            } => *expected_status,
            Check::InvalidEndpoint { .. } => StatusCode::NOT_FOUND,
            Check::WrongMethod { .. } => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::OK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub tag: Tag,
    pub check: Check,
}

impl TestCase {
    pub fn new(name: impl Into<String>, tag: Tag, check: Check) -> Self {
        Self {
            name: name.into(),
            tag,
            check,
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({} {} -> {})",
            self.tag,
            self.name,
            self.check.method(),
            self.check.path(),
            self.check.expected_status().as_u16()
        )
    }
}

/// Which cases to run. Empty `tags` means every tag.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub tags: Vec<Tag>,
    pub name_filter: Option<String>,
}

impl Selection {
    pub fn matches(&self, case: &TestCase) -> bool {
        let tag_ok = self.tags.is_empty() || self.tags.contains(&case.tag);
        let name_ok = self
            .name_filter
            .as_deref()
            .map_or(true, |f| case.name.contains(f));
        tag_ok && name_ok
    }
}

#[derive(Debug, Clone, Default)]
pub struct Suite {
    pub cases: Vec<TestCase>,
}

impl Suite {
    /// The standard beer API cases for `cfg`.
    pub fn from_config(cfg: &SuiteConfig) -> Self {
        let mut cases = Vec::new();

        if let Some(path) = &cfg.health_path {
            cases.push(TestCase::new(
                "health_check_returns_ok",
                Tag::Validation,
                Check::Health { path: path.clone() },
            ));
        }

        for category in &cfg.categories {
            let path = cfg.category_path(category);
            cases.push(TestCase::new(
                format!("beer_list_returns_200_and_not_empty/{category}"),
                Tag::Validation,
                Check::ListEndpoint {
                    path: path.clone(),
                    expected_status: StatusCode::OK,
                },
            ));
            cases.push(TestCase::new(
                format!("beer_item_has_expected_fields/{category}"),
                Tag::Schema,
                Check::SchemaFirstItem { path: path.clone() },
            ));
            cases.push(TestCase::new(
                format!("every_beer_item_has_expected_fields/{category}"),
                Tag::Schema,
                Check::SchemaAllItems { path: path.clone() },
            ));
            cases.push(TestCase::new(
                format!("beer_list_invalid_method_returns_405/{category}"),
                Tag::NegativeCase,
                Check::WrongMethod { path },
            ));
        }

        cases.push(TestCase::new(
            "invalid_endpoint_returns_404",
            Tag::NegativeCase,
            Check::InvalidEndpoint {
                path: cfg.invalid_path(),
            },
        ));

        // validate() guarantees at least one category
        if let Some(first) = cfg.categories.first() {
            let path = cfg.category_path(first);
            cases.push(TestCase::new(
                "beer_list_multiple_requests_under_threshold",
                Tag::Performance,
                Check::Throughput {
                    path: path.clone(),
                    request_count: cfg.performance.request_count,
                    threshold: cfg.performance.threshold(),
                },
            ));
            if let Some(load) = &cfg.load {
                cases.push(TestCase::new(
                    "beer_list_concurrent_requests_under_threshold",
                    Tag::Load,
                    Check::ConcurrentThroughput {
                        path,
                        request_count: load.request_count,
                        concurrency: load.concurrency,
                        threshold: load.threshold(),
                    },
                ));
            }
        }

        Self { cases }
    }

    pub fn select(&self, selection: &Selection) -> Vec<&TestCase> {
        self.cases.iter().filter(|c| selection.matches(c)).collect()
    }
}
