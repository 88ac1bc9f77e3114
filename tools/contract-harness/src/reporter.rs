//! PASS/FAIL output per fixture plus an end-of-run summary.

use crate::{fixture::Fixture, runner::RunResult};

pub struct Reporter {
    passed: usize,
    /// Ids of failed fixtures, recapped in the summary for easy re-runs.
    failed: Vec<String>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            passed: 0,
            failed: Vec::new(),
        }
    }

    pub fn record(&mut self, fixture: &Fixture, result: RunResult) {
        if result.passed() {
            self.passed += 1;
            println!(
                "PASS  [{}/{}] {}",
                fixture.service, fixture.id, fixture.description
            );
            return;
        }

        self.failed.push(format!("{}/{}", fixture.service, fixture.id));
        println!(
            "FAIL  [{}/{}] {}",
            fixture.service, fixture.id, fixture.description
        );
        if let Some(err) = &result.error {
            println!("        error: {err}");
            return;
        }
        if let Some(actual) = result.actual_status {
            if actual != result.expected_status {
                println!(
                    "        {} {}: expected status {}, got {}",
                    fixture.request.method, fixture.request.path, result.expected_status, actual
                );
            }
        }
        for mismatch in &result.header_mismatches {
            println!("        header: {mismatch}");
        }
        if let Some(mismatch) = &result.body_mismatch {
            println!("        {mismatch}");
        }
    }

    pub fn print_summary(&self) {
        println!();
        println!("────────────────────────────────────────────────────");
        println!("Results: {} passed, {} failed", self.passed, self.failed.len());
        for id in &self.failed {
            println!("  failed: {id}");
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}
