use crate::checks::{run_check, CheckError, CheckKind, CheckResult};
use crate::config::Config;
use crate::feed::{FeedError, HttpFeed, SampleSource};

const RULE_WIDTH: usize = 60;
const UNREACHABLE_HINT: &str = "Start the data server or point BASE_URL / --base-url at it";

pub enum Outcome {
    /// The server could not be reached; no checks ran.
    Unreachable(FeedError),
    Completed(Summary),
}

#[derive(Debug, Default)]
pub struct Summary {
    pub results: Vec<CheckResult>,
}

impl Summary {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }
}

pub struct Runner<'a, S> {
    source: &'a S,
    config: &'a Config,
}

impl<'a, S: SampleSource> Runner<'a, S> {
    pub fn new(source: &'a S, config: &'a Config) -> Self {
        Self { source, config }
    }

    /// Runs `checks` in order. The first hard error aborts the remainder.
    pub async fn run(&self, checks: &[CheckKind]) -> Result<Summary, CheckError> {
        let mut summary = Summary::default();

        for &kind in checks {
            println!();
            println!("=== Test {}: {} ===", kind.number(), kind);
            if kind == CheckKind::Doppler {
                println!("(Reference calculation for future adsb2dd validation)");
            }

            let result = run_check(kind, self.source, self.config)
                .await
                .inspect_err(|e| log::error!("{} aborted: {}", kind, e))?;

            println!("{}", result.report);
            log::info!(
                "{}: passed={} error={:.3}",
                result.kind,
                result.passed,
                result.error
            );
            summary.results.push(result);
        }

        print_summary(&summary);
        Ok(summary)
    }
}

/// Checks the server is reachable, then runs `checks` against it.
pub async fn run_suite(config: &Config, checks: &[CheckKind]) -> Result<Outcome, CheckError> {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Synthetic ADS-B Velocity Validation Test Suite");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Started at {}", chrono::Utc::now());

    let feed = HttpFeed::new(&config.base_url)?;
    if let Err(e) = feed.check_reachable(config.connect_timeout).await {
        log::warn!("{} is unreachable: {}", feed.url(), e);
        println!();
        println!("✗ ERROR: Cannot connect to server at {}", config.base_url);
        println!("  {}", UNREACHABLE_HINT);
        return Ok(Outcome::Unreachable(e));
    }
    println!();
    println!("✓ Server is running at {}", config.base_url);

    let summary = Runner::new(&feed, config).run(checks).await?;
    Ok(Outcome::Completed(summary))
}

fn print_summary(summary: &Summary) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Test Summary");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!();
    println!("Passed: {}/{}", summary.passed(), summary.total());
    println!();
    if summary.all_passed() {
        println!("✓ All tests passed!");
    } else {
        println!(
            "✗ {} test(s) failed",
            summary.total() - summary.passed()
        );
    }
}
