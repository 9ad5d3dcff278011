use std::fmt;
use std::time::{Duration, Instant};

use tracing::{error, info, Instrument};

use crate::checks::ApiChecker;
use crate::config::SuiteConfig;
use crate::errors::Result;
use crate::suite::{Check, Tag, TestCase};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub tag: Tag,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub results: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| !r.passed())
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.results {
            let mark = if r.passed() { "ok" } else { "FAILED" };
            writeln!(
                f,
                "{mark:>6}  [{}] {} ({} ms)",
                r.tag,
                r.name,
                r.elapsed.as_millis()
            )?;
            if let Outcome::Failed(msg) = &r.outcome {
                writeln!(f, "        {msg}")?;
            }
        }
        write!(
            f,
            "result: {}. {} passed; {} failed",
            if self.is_success() { "ok" } else { "FAILED" },
            self.passed(),
            self.failed()
        )
    }
}

/// Runs cases one after another. A failing case is recorded and the run
/// moves on; nothing aborts the remaining cases.
pub struct SuiteRunner {
    cfg: SuiteConfig,
}

impl SuiteRunner {
    pub fn new(cfg: SuiteConfig) -> Self {
        Self { cfg }
    }

    pub async fn run<'a, I>(&self, cases: I) -> SuiteReport
    where
        I: IntoIterator<Item = &'a TestCase>,
    {
        let t0 = Instant::now();
        let mut report = SuiteReport::default();

        for (idx, case) in cases.into_iter().enumerate() {
            let span = tracing::info_span!("case", idx = idx + 1, name = %case.name, tag = %case.tag);
            let result = self.run_case(case).instrument(span).await;
            report.results.push(result);
        }

        info!(
            passed = report.passed(),
            failed = report.failed(),
            total_ms = t0.elapsed().as_millis() as u64,
            "suite finished"
        );
        report
    }

    pub async fn run_case(&self, case: &TestCase) -> CaseResult {
        let t0 = Instant::now();
        let outcome = match self.execute(&case.check).await {
            Ok(()) => {
                info!("passed");
                Outcome::Passed
            }
            Err(err) => {
                error!(%err, "failed");
                Outcome::Failed(err.to_string())
            }
        };
        CaseResult {
            name: case.name.clone(),
            tag: case.tag,
            outcome,
            elapsed: t0.elapsed(),
        }
    }

    async fn execute(&self, check: &Check) -> Result<()> {
        // fresh client per case: no pooled connections leak between cases
        let checker = ApiChecker::from_config(&self.cfg)?;
        match check {
            Check::ListEndpoint { .. } => {
                checker
                    .assert_list_endpoint(check.path(), check.expected_status())
                    .await?;
            }
            Check::InvalidEndpoint { path } => {
                checker.assert_invalid_endpoint_returns_404(path).await?;
            }
            Check::SchemaFirstItem { path } => {
                checker.assert_schema_of_first_item(path).await?;
            }
            Check::SchemaAllItems { path } => {
                checker.assert_schema_of_all_items(path).await?;
            }
            Check::WrongMethod { path } => {
                checker.assert_wrong_method_rejected(path).await?;
            }
            Check::Throughput {
                path,
                request_count,
                threshold,
            } => {
                checker
                    .assert_throughput_under_threshold(path, *request_count, *threshold)
                    .await?;
            }
            Check::ConcurrentThroughput {
                path,
                request_count,
                concurrency,
                threshold,
            } => {
                checker
                    .assert_concurrent_throughput_under_threshold(
                        path,
                        *request_count,
                        *concurrency,
                        *threshold,
                    )
                    .await?;
            }
            Check::Health { path } => {
                checker.assert_health(path).await?;
            }
        }
        Ok(())
    }
}
