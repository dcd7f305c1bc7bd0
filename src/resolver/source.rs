use std::sync::OnceLock;

use regex::Regex;

use crate::error::LookupError;
use crate::models::{SourceRecord, UNKNOWN_LICENSE};
use crate::repository::InfoReportQuery;

use super::{newest_by, CompareError, LicenseResolver};

/// Resolves licenses from a `repoquery --info` style text report.
pub struct SourceResolver<R> {
    report: R,
}

impl<R: InfoReportQuery> SourceResolver<R> {
    pub fn new(report: R) -> Self {
        Self { report }
    }
}

impl<R: InfoReportQuery> LicenseResolver for SourceResolver<R> {
    fn resolve_license(&self, package: &str) -> Result<String, LookupError> {
        let text = self.report.query_info(package)?;
        let records = parse_info_report(&text);
        let newest = newest_source(&records)
            .ok_or_else(|| LookupError::NoCandidatesFound(package.to_string()))?;

        Ok(newest
            .license
            .clone()
            .unwrap_or_else(|| UNKNOWN_LICENSE.to_string()))
    }
}

fn field_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(Source|License)\s*:\s*(.*?)\s*$").expect("valid regex"))
}

/// Pair every `Source` line with the `License` line that follows it.
///
/// A `Source` that is followed by another `Source` before any `License`
/// is dropped, as is a `License` with no open `Source`.
pub fn parse_info_report(text: &str) -> Vec<SourceRecord> {
    let mut records = Vec::new();
    let mut pending: Option<&str> = None;

    for line in text.lines() {
        let Some(caps) = field_line().captures(line) else {
            continue;
        };
        let value = caps.get(2).map_or("", |m| m.as_str());

        match &caps[1] {
            "Source" => pending = Some(value),
            _ => {
                if let Some(source) = pending.take() {
                    records.push(SourceRecord::new(source, Some(value)));
                }
            }
        }
    }

    records
}

pub fn newest_source(records: &[SourceRecord]) -> Option<&SourceRecord> {
    if let [only] = records {
        return Some(only);
    }
    newest_by(records, |a, b| is_newer_source(&a.source, &b.source))
}

/// True if source RPM `a` has a strictly higher release number than `b`.
/// Unparseable names are compared as plain strings.
pub fn is_newer_source(a: &str, b: &str) -> bool {
    match (release_number(a), release_number(b)) {
        (Ok(ra), Ok(rb)) => ra > rb,
        _ => a > b,
    }
}

/// Numeric release of a source RPM name.
///
/// `boost-1.83.0-5.fc40.src.rpm` → `5`. The release is the last segment of
/// the `version-release` token; only its leading digits count, and a
/// release without any is `0`.
pub fn release_number(source: &str) -> Result<u64, CompareError> {
    let stem = source
        .strip_suffix(".src.rpm")
        .or_else(|| source.strip_suffix(".rpm"))
        .unwrap_or(source);

    let stem = match stem.rsplit_once('.') {
        Some((rest, _arch)) => rest,
        None => stem,
    };

    let mut hyphens = stem.rmatch_indices('-').map(|(i, _)| i);
    let (_last, second_last) = hyphens
        .next()
        .zip(hyphens.next())
        .ok_or_else(|| CompareError::NoVersionRelease(source.to_string()))?;

    let version_release = &stem[second_last + 1..];
    let release = version_release.rsplit('-').next().unwrap_or(version_release);
    leading_number(release).ok_or_else(|| CompareError::ReleaseOverflow(source.to_string()))
}

/// Leading decimal digits of `s`, `Some(0)` if there are none, `None` on overflow.
fn leading_number(s: &str) -> Option<u64> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return Some(0);
    }
    s[..end].parse().ok()
}
