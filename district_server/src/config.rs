// Copyright 2025 the District Lookup Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use district_lookup::{
    BoundarySource, Chamber, DistrictLookup, FailurePolicy, FileSource, PolicyError,
    PolicyOverrides, PolicySet,
};

use crate::api::SharedLookup;

/// Log output format.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Server configuration.
///
/// Every flag can also be set through a `DISTRICTS_*` environment variable.
#[derive(Clone, Debug, Parser)]
#[command(name = "district_server", version, about = "Serve district lookups over HTTP")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "DISTRICTS_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// House boundary file. Pass an empty value to disable the layer.
    #[arg(long, env = "DISTRICTS_HOUSE", default_value = "tx-house-2025.geojson")]
    pub house: String,

    /// Senate boundary file. Pass an empty value to disable the layer.
    #[arg(long, env = "DISTRICTS_SENATE", default_value = "tx-senate-2025.geojson")]
    pub senate: String,

    /// State board of education boundary file.
    #[arg(long, env = "DISTRICTS_SBOE")]
    pub sboe: Option<PathBuf>,

    /// Origin allowed to call the API from a browser; `*` allows any.
    ///
    /// Repeat the flag or separate origins with commas. Without any, no
    /// CORS headers are sent.
    #[arg(
        long = "allowed-origin",
        env = "DISTRICTS_ALLOWED_ORIGINS",
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,

    /// Answer `null` for layers that fail to load instead of failing the request.
    #[arg(long, env = "DISTRICTS_PARTIAL_RESULTS")]
    pub partial_results: bool,

    /// Load every layer before accepting requests.
    #[arg(long, env = "DISTRICTS_PRELOAD")]
    pub preload: bool,

    /// TOML file replacing the built-in district resolution rules per chamber.
    #[arg(long, env = "DISTRICTS_POLICY")]
    pub policy: Option<PathBuf>,

    /// Log output format. Filtering follows `RUST_LOG` (default `info`).
    #[arg(long, env = "DISTRICTS_LOG_FORMAT", value_enum, default_value_t)]
    pub log_format: LogFormat,
}

impl Config {
    /// The configured boundary files.
    pub fn source(&self) -> FileSource {
        let paths = [
            (Chamber::House, Some(Path::new(&self.house))),
            (Chamber::Senate, Some(Path::new(&self.senate))),
            (Chamber::Sboe, self.sboe.as_deref()),
        ];
        paths
            .into_iter()
            .filter_map(|(chamber, path)| Some((chamber, path.filter(|p| !is_blank(p))?)))
            .fold(FileSource::new(), |source, (chamber, path)| {
                source.with_path(chamber, path)
            })
    }

    /// Built-in policies with the `--policy` overrides applied.
    pub fn policies(&self) -> Result<PolicySet, PolicyError> {
        let policies = PolicySet::default();
        match &self.policy {
            Some(path) => Ok(policies.with_overrides(PolicyOverrides::from_path(path)?)),
            None => Ok(policies),
        }
    }

    /// Behavior when a layer fails to load.
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.partial_results {
            FailurePolicy::Partial
        } else {
            FailurePolicy::FailRequest
        }
    }

    /// Build the lookup engine this configuration describes.
    ///
    /// Layers are not read here; they load on first use or through
    /// [`DistrictLookup::preload`].
    pub fn lookup(&self) -> Result<SharedLookup, PolicyError> {
        let source: Arc<dyn BoundarySource> = Arc::new(self.source());
        Ok(DistrictLookup::new(source)
            .with_policies(self.policies()?)
            .with_failure_policy(self.failure_policy()))
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("district_server").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(config.bind, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.failure_policy(), FailurePolicy::FailRequest);

        let source = config.source();
        assert_eq!(source.path(Chamber::House), Some(Path::new("tx-house-2025.geojson")));
        assert_eq!(source.path(Chamber::Senate), Some(Path::new("tx-senate-2025.geojson")));
        assert_eq!(source.path(Chamber::Sboe), None);
    }

    #[test]
    fn layers_can_be_added_and_disabled() {
        let config = parse(&["--house", "", "--sboe", "/data/sboe.geojson"]);
        let lookup = config.lookup().expect("builtin policies");
        assert_eq!(lookup.chambers(), [Chamber::Senate, Chamber::Sboe]);
    }

    #[test]
    fn origins_split_on_commas_and_repeat() {
        let config = parse(&[
            "--allowed-origin",
            "https://a.example,https://b.example",
            "--allowed-origin",
            "https://c.example",
            "--partial-results",
            "--log-format",
            "json",
        ]);
        assert_eq!(
            config.allowed_origins,
            ["https://a.example", "https://b.example", "https://c.example"]
        );
        assert_eq!(config.failure_policy(), FailurePolicy::Partial);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn policy_file_overrides_builtins() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[[sboe]]\nrule = \"numeric\"\nfield = \"SBOE_DIST\"").expect("write");
        let config = parse(&["--policy", file.path().to_str().expect("utf-8 path")]);
        let policies = config.policies().expect("valid policy");
        assert_eq!(policies.get(Chamber::Sboe).rules().len(), 1);
        assert_eq!(policies.get(Chamber::House), PolicySet::builtin().get(Chamber::House));

        let config = parse(&["--policy", "/nonexistent/policy.toml"]);
        assert!(config.lookup().is_err());
    }
}
