//! # authz-check
//!
//! Evaluates a request against policy documents from a JSON file and prints
//! the decision.
//!
//! ```text
//! authz-check <input.json>
//! ```
//!
//! Input:
//!
//! ```json
//! {
//!   "schema": { "project": { "cluster": {} } },
//!   "roles": ["viewer"],
//!   "policies": [ { "scope": "project", "verbs": ["get"] } ],
//!   "request": { "project": { "verb": "get", "resource": "web" } }
//! }
//! ```
//!
//! `schema`, `config`, `roles` and `policies` are optional. Role documents are
//! tried before `policies`. Exits 0 when the request is allowed, 1 when denied.
//!
//! ## Configuration
//!
//! Environment variables (used when the input has no `config`):
//! - `AUTHZ_ROOT_SCOPE` - Root scope (default: project)
//! - `AUTHZ_STRICT_SCOPES` - Deny unreachable requested scopes (default: false)
//! - `RUST_LOG` - Log level (default: info)

use anyhow::{bail, Context};
use hierarchy_authz::{
    AccessEvaluator, EngineConfig, PolicyDocument, PresetRole, RequestActions, ScopeTree,
};
use serde::Deserialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Contents of the input file
#[derive(Debug, Deserialize)]
struct CheckInput {
    #[serde(default)]
    schema: Option<ScopeTree>,

    #[serde(default)]
    config: Option<EngineConfig>,

    #[serde(default)]
    roles: Vec<PresetRole>,

    #[serde(default)]
    policies: Vec<PolicyDocument>,

    request: RequestActions,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: authz-check <input.json>");
    };

    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let input: CheckInput =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;

    let config = match input.config {
        Some(config) => config,
        None => EngineConfig::from_env()?,
    };

    let evaluator = match input.schema {
        Some(schema) => AccessEvaluator::with_schema(Arc::new(schema), config)?,
        None => AccessEvaluator::with_config(config)?,
    };

    let documents: Vec<PolicyDocument> = input
        .roles
        .iter()
        .flat_map(PresetRole::policy)
        .chain(input.policies)
        .collect();

    info!(
        "Checking {} scopes against {} policy documents",
        input.request.len(),
        documents.len()
    );

    let decision = evaluator.evaluate(&documents, &input.request);
    println!("{}", serde_json::to_string_pretty(&decision)?);

    Ok(if decision.allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
