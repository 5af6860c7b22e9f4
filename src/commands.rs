//! CLI commands for lintack: check and update.
//!
//! Driver glue only. Findings arrive as JSON Lines from the analyzer run
//! (one record per line); all catalog semantics live in the core modules.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::anchor;
use crate::catalog::Catalog;
use crate::config;
use crate::error::Error;
use crate::matcher;
use crate::source::SourceCache;
use crate::types::{Entry, Finding, Key};

/// Report findings not covered by the catalog.
///
/// # Errors
///
/// Returns errors from config/catalog loading, findings input, or source
/// file reads.
pub fn check(findings_path: Option<&Path>) -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;
    let mut cache = SourceCache::new();
    let catalog = Catalog::load(&config.catalog, &mut cache)?;
    let findings = read_findings(findings_path)?;

    let mut new_count = 0_usize;
    for finding in &findings {
        let key = key_for_finding(&mut cache, finding)?;
        if matcher::find_entry(&catalog, &key).is_some() {
            continue;
        }
        new_count = new_count.saturating_add(1);
        println!(
            "NEW     {}:{}  {} ({})  {}",
            finding.path, finding.lineno, finding.msg_id, finding.symbol, finding.msg_text,
        );
    }

    // Exit code priority: unacknowledged findings (1) > clean (0).
    if new_count > 0 {
        let acknowledged = findings.len().saturating_sub(new_count);
        println!();
        println!("{new_count} new, {acknowledged} acknowledged");
        return Ok(ExitCode::from(1));
    }
    println!("All {} findings acknowledged", findings.len());
    return Ok(ExitCode::SUCCESS);
}

/// Attribution for newly acknowledged findings when no flag is given.
fn default_author() -> String {
    return std::env::var("USER").unwrap_or_else(|_| return "unknown".to_string());
}

/// The key a finding carries right now, anchored to the current text of
/// its reported line.
///
/// # Errors
///
/// Returns `Error::Io` if the finding's source file cannot be read.
fn key_for_finding(cache: &mut SourceCache, finding: &Finding) -> Result<Key, Error> {
    let lines = cache.lines(Path::new(&finding.path))?;
    let source_line = finding
        .lineno
        .checked_sub(1)
        .and_then(|idx| return lines.get(idx))
        .map_or("", |line| return line.as_str());
    return Ok(Key::for_finding(finding, source_line));
}

/// Parse JSON Lines findings from a file, or stdin when no path is given.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::Json` on a malformed line.
fn read_findings(path: Option<&Path>) -> Result<Vec<Finding>, Error> {
    let content = match path {
        None => std::io::read_to_string(std::io::stdin())?,
        Some(p) => std::fs::read_to_string(p)?,
    };

    let mut findings = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        findings.push(serde_json::from_str(line)?);
    }
    return Ok(findings);
}

/// Rebuild the catalog from current findings and write it atomically.
///
/// Findings matched to a prior entry (exactly or fuzzily) carry that entry's
/// author and date forward; unmatched findings are stamped with `author`
/// (default `$USER`) and the current local time. Prior entries whose
/// findings no longer occur are not carried: the analyzer stopped
/// reporting them, so there is nothing left to acknowledge.
///
/// # Errors
///
/// Returns errors from config/catalog loading, findings input, source file
/// reads, or the catalog write.
pub fn update(findings_path: Option<&Path>, author: Option<&str>) -> Result<ExitCode, Error> {
    let root = PathBuf::from(".");
    let config = config::Config::load(&root)?;
    let mut cache = SourceCache::new();
    let prior = Catalog::load(&config.catalog, &mut cache)?;
    let findings = read_findings(findings_path)?;

    let stamp_author = author.map_or_else(default_author, String::from);
    let stamp_date = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();

    let mut next = Catalog::new();
    let mut added = 0_usize;
    let mut carried = 0_usize;
    for finding in &findings {
        let path = Path::new(&finding.path);
        let srctxt = match anchor::read_anchor(&mut cache, path, finding.lineno, finding.lineno)
        {
            Err(Error::ObsoleteEntry { reason }) => {
                log::warn!("skipping finding at {}:{}: {reason}", finding.path, finding.lineno);
                continue;
            }
            Err(e) => return Err(e),
            Ok(s) => s,
        };

        let key = Key::for_finding(finding, &srctxt.source_line);
        let (entry_author, entry_date) = match matcher::find_entry(&prior, &key) {
            None => {
                added = added.saturating_add(1);
                (stamp_author.clone(), stamp_date.clone())
            }
            Some(prior_entry) => {
                carried = carried.saturating_add(1);
                (prior_entry.author.clone(), prior_entry.date.clone())
            }
        };

        let entry = Entry {
            author: entry_author,
            date: entry_date,
            msg_id: finding.msg_id.clone(),
            msg_text: finding.msg_text.clone(),
            path: finding.path.clone(),
            srctxt: Some(srctxt),
            symbol: finding.symbol.clone(),
        };
        next.insert(key, entry);
    }

    next.dump(&config.catalog)?;
    println!(
        "Wrote {} entries to {} ({added} new, {carried} carried over)",
        next.len(),
        config.catalog.display(),
    );
    return Ok(ExitCode::SUCCESS);
}
