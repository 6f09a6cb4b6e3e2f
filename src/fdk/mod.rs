//! FDK version resolution
//!
//! Resolves the latest function-development-kit release for a runtime family.
//! Resolution order, stopping at the first success:
//!
//! 1. the runtime's override environment variable (never cached)
//! 2. the value already resolved by this resolver
//! 3. each [`VersionStrategy`] in registration order
//!
//! When every strategy fails the error names the override variable.

mod sources;

pub use sources::{MavenMetadataSource, PackageSearchSource, SourceError, VersionStrategy};

use crate::error::{LangError, Result};
use serde::Serialize;
use std::env;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Registry that produced a resolved version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
    Primary,
    Secondary,
    /// Supplied through the override environment variable
    Override,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSource::Primary => write!(f, "primary"),
            VersionSource::Secondary => write!(f, "secondary"),
            VersionSource::Override => write!(f, "override"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVersion {
    pub version: String,
    pub source: VersionSource,
}

/// Observable state of a [`VersionCache`]
#[derive(Debug, PartialEq, Eq)]
pub enum CacheState<'a> {
    Unresolved,
    Resolved(&'a ResolvedVersion),
}

/// Write-once holder for the version resolved during this process.
#[derive(Debug, Default)]
pub struct VersionCache {
    slot: OnceLock<ResolvedVersion>,
}

impl VersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CacheState<'_> {
        match self.slot.get() {
            Some(resolved) => CacheState::Resolved(resolved),
            None => CacheState::Unresolved,
        }
    }

    /// Stores `resolved` if nothing was stored yet and returns the stored value.
    pub fn record(&self, resolved: ResolvedVersion) -> &ResolvedVersion {
        self.slot.get_or_init(|| resolved)
    }
}

pub struct FdkVersionResolver {
    runtime: String,
    override_env: String,
    strategies: Vec<Box<dyn VersionStrategy>>,
    cache: VersionCache,
}

impl FdkVersionResolver {
    pub fn new(
        runtime: impl Into<String>,
        override_env: impl Into<String>,
        strategies: Vec<Box<dyn VersionStrategy>>,
    ) -> Self {
        Self {
            runtime: runtime.into(),
            override_env: override_env.into(),
            strategies,
            cache: VersionCache::new(),
        }
    }

    pub fn cache_state(&self) -> CacheState<'_> {
        self.cache.state()
    }

    pub fn resolve(&self) -> Result<ResolvedVersion> {
        if let Some(version) = self.override_version() {
            debug!(env = %self.override_env, %version, "Using FDK version override");
            return Ok(ResolvedVersion {
                version,
                source: VersionSource::Override,
            });
        }

        if let CacheState::Resolved(resolved) = self.cache.state() {
            return Ok(resolved.clone());
        }

        for strategy in &self.strategies {
            match strategy.fetch_latest() {
                Ok(version) => {
                    info!(
                        runtime = %self.runtime,
                        %version,
                        source = %strategy.source(),
                        "Resolved latest FDK version"
                    );
                    let resolved = self.cache.record(ResolvedVersion {
                        version,
                        source: strategy.source(),
                    });
                    return Ok(resolved.clone());
                }
                Err(e) => {
                    warn!(
                        source = %strategy.source(),
                        endpoint = strategy.endpoint(),
                        error = %e,
                        "FDK version source failed, trying next"
                    );
                }
            }
        }

        Err(LangError::VersionResolution {
            runtime: self.runtime.clone(),
            env_var: self.override_env.clone(),
        })
    }

    fn override_version(&self) -> Option<String> {
        env::var(&self.override_env)
            .ok()
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubSource {
        source: VersionSource,
        answer: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl VersionStrategy for StubSource {
        fn source(&self) -> VersionSource {
            self.source
        }

        fn endpoint(&self) -> &str {
            "stub://"
        }

        fn fetch_latest(&self) -> std::result::Result<String, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.map(str::to_string).ok_or(SourceError::Empty {
                url: "stub://".to_string(),
            })
        }
    }

    fn stub(
        source: VersionSource,
        answer: Option<&'static str>,
    ) -> (Box<dyn VersionStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Box::new(StubSource {
                source,
                answer,
                calls: calls.clone(),
            }),
            calls,
        )
    }

    // Unique per test so parallel tests never see each other's overrides.
    fn resolver(env: &str, strategies: Vec<Box<dyn VersionStrategy>>) -> FdkVersionResolver {
        FdkVersionResolver::new("Java", env, strategies)
    }

    #[test]
    fn test_cache_starts_unresolved() {
        let cache = VersionCache::new();
        assert_eq!(cache.state(), CacheState::Unresolved);
    }

    #[test]
    fn test_cache_is_write_once() {
        let cache = VersionCache::new();
        let first = ResolvedVersion {
            version: "1.0.0".to_string(),
            source: VersionSource::Primary,
        };
        cache.record(first.clone());
        let kept = cache.record(ResolvedVersion {
            version: "2.0.0".to_string(),
            source: VersionSource::Secondary,
        });
        assert_eq!(kept, &first);
        assert_eq!(cache.state(), CacheState::Resolved(&first));
    }

    #[test]
    fn test_primary_short_circuits_secondary() {
        let (primary, primary_calls) = stub(VersionSource::Primary, Some("1.0.105"));
        let (secondary, secondary_calls) = stub(VersionSource::Secondary, Some("9.9.9"));
        let resolver = resolver("FNPACK_TEST_UNSET_A", vec![primary, secondary]);

        let resolved = resolver.resolve().unwrap();
        assert_eq!(resolved.version, "1.0.105");
        assert_eq!(resolved.source, VersionSource::Primary);
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_falls_back_to_secondary() {
        let (primary, _) = stub(VersionSource::Primary, None);
        let (secondary, _) = stub(VersionSource::Secondary, Some("2.3.1"));
        let resolver = resolver("FNPACK_TEST_UNSET_B", vec![primary, secondary]);

        let resolved = resolver.resolve().unwrap();
        assert_eq!(resolved.version, "2.3.1");
        assert_eq!(resolved.source, VersionSource::Secondary);
    }

    #[test]
    fn test_resolution_is_cached() {
        let (primary, calls) = stub(VersionSource::Primary, Some("1.0.0"));
        let resolver = resolver("FNPACK_TEST_UNSET_C", vec![primary]);

        resolver.resolve().unwrap();
        resolver.resolve().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(resolver.cache_state(), CacheState::Resolved(_)));
    }

    #[test]
    fn test_all_sources_fail() {
        let (primary, _) = stub(VersionSource::Primary, None);
        let (secondary, _) = stub(VersionSource::Secondary, None);
        let resolver = resolver("FNPACK_TEST_UNSET_D", vec![primary, secondary]);

        let err = resolver.resolve().unwrap_err();
        assert!(matches!(err, LangError::VersionResolution { .. }));
        assert!(err.to_string().contains("FNPACK_TEST_UNSET_D"));
        assert_eq!(resolver.cache_state(), CacheState::Unresolved);
    }

    #[test]
    fn test_failed_resolution_is_retried_on_next_call() {
        let (primary, calls) = stub(VersionSource::Primary, None);
        let resolver = resolver("FNPACK_TEST_UNSET_E", vec![primary]);

        assert!(resolver.resolve().is_err());
        assert!(resolver.resolve().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_version_source_display() {
        assert_eq!(VersionSource::Primary.to_string(), "primary");
        assert_eq!(VersionSource::Secondary.to_string(), "secondary");
        assert_eq!(VersionSource::Override.to_string(), "override");
    }
}
