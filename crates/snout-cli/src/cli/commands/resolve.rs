//! `snout resolve <input>...` – print the image URL behind each input.

use anyhow::{Context, Result};
use snout_core::config::SnoutConfig;
use snout_core::resolver::{PreparedImageUrl, UrlResolver};
use snout_core::validate::ErrorKind;
use std::io::Read;

/// Text-mode line for an input that did not resolve.
fn failure_line(input: &str, kind: ErrorKind) -> String {
    format!("{}: [{}] {}", input.trim(), kind.code(), kind)
}

pub async fn run_resolve(
    cfg: &SnoutConfig,
    inputs: &[String],
    json: bool,
    stdin: bool,
) -> Result<()> {
    let inputs = if stdin {
        let mut snippet = String::new();
        std::io::stdin()
            .read_to_string(&mut snippet)
            .context("read stdin")?;
        vec![snippet]
    } else {
        inputs.to_vec()
    };

    let resolver = UrlResolver::new(cfg.resolver_limits());
    tracing::debug!(limits = ?resolver.limits(), "resolving {} input(s)", inputs.len());
    let mut failed = 0usize;
    for input in &inputs {
        let result = resolver.prepare(input);
        if result.is_err() {
            failed += 1;
        }
        if json {
            let mut value = serde_json::to_value(PreparedImageUrl::from(result))?;
            value["input"] = serde_json::Value::from(input.as_str());
            println!("{}", serde_json::to_string(&value)?);
            continue;
        }
        match result {
            Ok(resolved) if resolved.extracted_from_wrapper => {
                println!("{}  (extracted)", resolved.url)
            }
            Ok(resolved) => println!("{}", resolved.url),
            Err(kind) => eprintln!("{}", failure_line(input, kind)),
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} input(s) could not be resolved", failed, inputs.len());
    }
    Ok(())
}
