use std::cmp::Ordering;

use crate::error::LookupError;
use crate::models::{BuildDescriptor, UNKNOWN_LICENSE};
use crate::repository::dnf::{DnfRepoQuery, RepoSession};
use crate::repository::{CommandRunner, PackageQuery};

use super::{newest_by, CompareError, LicenseResolver};

/// Resolves licenses from structured build descriptors.
pub struct EvrResolver<Q> {
    query: Q,
}

impl<Q: PackageQuery> EvrResolver<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }
}

impl<Q: PackageQuery> LicenseResolver for EvrResolver<Q> {
    fn resolve_license(&self, package: &str) -> Result<String, LookupError> {
        let builds = self.query.query_available(package)?;
        let newest = newest_build(&self.query, &builds)
            .ok_or_else(|| LookupError::NoCandidatesFound(package.to_string()))?;

        Ok(newest.license.unwrap_or_else(|| UNKNOWN_LICENSE.to_string()))
    }
}

/// Resolve a single package without a caller-provided session.
///
/// Opens (and drops) a fresh [`RepoSession`]; use [`EvrResolver`] over a
/// shared session when looking up many packages.
pub fn lookup_once(dnf: &str, runner: Box<dyn CommandRunner>, package: &str) -> Result<String, LookupError> {
    let session = RepoSession::open(dnf, runner).map_err(|e| LookupError::Unexpected {
        package: package.to_string(),
        reason: e.to_string(),
    })?;
    EvrResolver::new(DnfRepoQuery::new(&session)).resolve_license(package)
}

/// The newest of `builds`.
///
/// A single build is returned as-is. Otherwise the query's own
/// `select_latest` answer wins when it has one, and the builds are reduced
/// pairwise with [`is_newer_build`] when it does not.
pub fn newest_build<Q: PackageQuery + ?Sized>(query: &Q, builds: &[BuildDescriptor]) -> Option<BuildDescriptor> {
    if let [only] = builds {
        return Some(only.clone());
    }
    if builds.is_empty() {
        return None;
    }

    if let Some(latest) = query.select_latest(builds).and_then(|l| l.into_iter().next()) {
        return Some(latest);
    }

    newest_by(builds, is_newer_build).cloned()
}

/// True if `a` is strictly newer than `b`.
pub fn is_newer_build(a: &BuildDescriptor, b: &BuildDescriptor) -> bool {
    match compare_evr(a, b) {
        Ok(ordering) => ordering == Ordering::Greater,
        Err(_) => a.to_string() > b.to_string(),
    }
}

fn compare_evr(a: &BuildDescriptor, b: &BuildDescriptor) -> Result<Ordering, CompareError> {
    if a.epoch != b.epoch {
        return Ok(a.epoch.cmp(&b.epoch));
    }

    for build in [a, b] {
        if build.version.is_empty() {
            return Err(CompareError::MissingVersion(build.to_string()));
        }
        if build.release.is_empty() {
            return Err(CompareError::MissingRelease(build.to_string()));
        }
    }

    if !a.evr.is_empty() && !b.evr.is_empty() {
        return Ok(a.evr.cmp(&b.evr));
    }

    Ok(a.version
        .cmp(&b.version)
        .then_with(|| a.release.cmp(&b.release)))
}
