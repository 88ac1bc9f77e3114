//! Contract fixture format and loader.
//!
//! Each fixture file at `contracts/http/{service}/{id}.json` describes one
//! HTTP assertion: the request to send and what the response must look like.
//! Fixtures only assert behavior that holds against any deployment, so they
//! stay away from endpoints whose outcome depends on seeded rows.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// A single HTTP contract assertion loaded from a fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    /// Service directory the fixture lives under (currently just `forms`).
    pub service: String,
    /// Unique identifier within the service; must match the filename stem.
    pub id: String,
    /// Human-readable description shown in test output.
    pub description: String,
    pub request: Request,
    pub expect: Expect,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Expect {
    /// Expected HTTP status code.
    pub status: u16,
    /// Expected response headers (subset match, extra headers are allowed).
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Expected response body, compared as parsed JSON. Omit for endpoints
    /// with empty or non-JSON bodies.
    pub body: Option<serde_json::Value>,
}

/// Load every fixture under `{workspace_root}/contracts/http/`, optionally
/// restricted to one service subdirectory. Fixtures come back sorted by
/// service then id so runs are deterministic.
pub fn load_all(workspace_root: &Path, service: Option<&str>) -> Result<Vec<Fixture>> {
    let http_dir = workspace_root.join("contracts/http");

    let service_dirs: Vec<_> = match service {
        Some(svc) => vec![http_dir.join(svc)],
        None => fs::read_dir(&http_dir)
            .with_context(|| format!("cannot open {}", http_dir.display()))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.path())
            .collect(),
    };

    let mut fixtures = Vec::new();
    for dir in service_dirs {
        if !dir.exists() {
            continue;
        }
        for entry in fs::read_dir(&dir)
            .with_context(|| format!("cannot read {}", dir.display()))?
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                fixtures.push(load_one(&path)?);
            }
        }
    }

    fixtures.sort_by(|a, b| a.service.cmp(&b.service).then(a.id.cmp(&b.id)));
    Ok(fixtures)
}

/// Parse one fixture file and check that its declared `service` and `id`
/// agree with where it lives. A renamed file with a stale id would
/// otherwise report under the wrong name.
fn load_one(path: &Path) -> Result<Fixture> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let fixture: Fixture = serde_json::from_str(&content)
        .with_context(|| format!("invalid fixture JSON in {}", path.display()))?;

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    if fixture.id != stem {
        bail!(
            "fixture id {:?} does not match filename {}",
            fixture.id,
            path.display()
        );
    }
    let dir_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|s| s.to_str())
        .unwrap_or("");
    if fixture.service != dir_name {
        bail!(
            "fixture service {:?} does not match directory {}",
            fixture.service,
            path.display()
        );
    }
    Ok(fixture)
}
