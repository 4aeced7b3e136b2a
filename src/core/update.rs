//! Requirements update orchestration
//!
//! Resolves every requested package against the index, hashes the
//! artifacts of the chosen releases and only then touches the requirements
//! file. Any failure before that point leaves the file exactly as it was.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::Settings;
use crate::core::python_version::expand_python_versions;
use crate::core::release::{filter_artifacts, select_version};
use crate::core::requirements::{Change, HashPolicy, Pin, Requirements};
use crate::core::spec::{normalize_name, PackageSpec};
use crate::core::writer;
use crate::error::{PackageError, ReqlockError, ValidationError};
use crate::infra::download::DownloadManager;
use crate::infra::filesystem;
use crate::registry::IndexClient;

/// What to update and how
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Requirements file to update
    pub requirements_file: PathBuf,
    /// Packages named on the command line
    pub specs: Vec<PackageSpec>,
    /// Re-resolve every entry already in the file
    pub update_all: bool,
    /// `--python-version` filters, unexpanded
    pub python_versions: Vec<String>,
    pub include_prereleases: bool,
    pub hash_policy: HashPolicy,
    /// Produce a diff instead of writing
    pub dry_run: bool,
    /// Ask before each version change (update-all only)
    pub interactive: bool,
}

impl UpdateOptions {
    /// Reject flag combinations that make no sense
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.update_all && !self.specs.is_empty() {
            return Err(ValidationError::Usage(
                "Can not combine the --update-all option with a list of packages".to_string(),
            ));
        }
        if !self.update_all && self.specs.is_empty() {
            return Err(ValidationError::Usage(
                "Please specify at least one package, or use --update-all".to_string(),
            ));
        }
        if self.interactive && !self.update_all {
            return Err(ValidationError::Usage(
                "--interactive (or -i) is only applicable together with --update-all (or -u)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Reply to an interactive update question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Apply this update
    Yes,
    /// Skip this package
    No,
    /// Apply this and every remaining update without asking
    All,
    /// Stop without writing anything
    Quit,
}

/// Source of answers for interactive updates
pub trait Confirm {
    fn confirm(&mut self, name: &str, old_version: &str, new_version: &str) -> Answer;
}

/// Answers yes to everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Confirm for AcceptAll {
    fn confirm(&mut self, _name: &str, _old_version: &str, _new_version: &str) -> Answer {
        Answer::Yes
    }
}

/// Result of reconciling one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageChange {
    pub name: String,
    pub version: String,
    pub change: Change,
}

/// Result of a whole update run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Packages that were reconciled, in processing order
    pub changes: Vec<PackageChange>,
    /// Unified diff, in dry-run mode
    pub diff: Option<String>,
    /// Whether the requirements file was rewritten
    pub written: bool,
}

/// Turns package specifiers into pins
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    pub settings: &'a Settings,
    pub index: &'a IndexClient,
    pub downloads: &'a DownloadManager,
}

impl<'a> Resolver<'a> {
    pub fn new(settings: &'a Settings, index: &'a IndexClient, downloads: &'a DownloadManager) -> Self {
        Self {
            settings,
            index,
            downloads,
        }
    }

    /// Pick a release for `spec` and compute the digests of its artifacts
    pub async fn resolve_pin(
        &self,
        spec: &PackageSpec,
        python_tags: &BTreeSet<String>,
        python_versions: &[String],
        include_prereleases: bool,
    ) -> Result<Pin, ReqlockError> {
        let index = self.index.fetch_package(&spec.name).await?;
        let version = select_version(&index, spec.version.as_deref(), include_prereleases)?;

        let artifacts = index
            .release(&version)
            .map(|release| filter_artifacts(&release.artifacts, python_tags))
            .unwrap_or_default();
        if artifacts.is_empty() {
            return Err(PackageError::NoMatchingArtifacts {
                name: spec.name.clone(),
                version,
                python_versions: python_versions.to_vec(),
            }
            .into());
        }

        tracing::info!(
            "Hashing {} artifact(s) of {} {version}",
            artifacts.len(),
            index.name
        );
        let digests = self
            .downloads
            .collect_digests(&artifacts, self.settings.algorithm, self.settings.parallel)
            .await?;

        let name = if normalize_name(&index.name) == spec.normalized_name() {
            index.name
        } else {
            spec.name.clone()
        };

        Ok(Pin {
            name,
            extras: spec.extras.clone(),
            version,
            marker: spec.marker.clone(),
            digests,
        })
    }
}

/// Run one update of a requirements file
pub async fn run_update(
    resolver: &Resolver<'_>,
    options: &UpdateOptions,
    confirm: &mut dyn Confirm,
) -> Result<UpdateOutcome, ReqlockError> {
    options.validate()?;
    let python_tags = expand_python_versions(options.python_versions.as_slice())?;

    let path = &options.requirements_file;
    let original = filesystem::read_file(path)?;
    let mut requirements = Requirements::parse(&original);

    let specs: Vec<PackageSpec> = if options.update_all {
        requirements
            .entries()
            .map(|entry| PackageSpec {
                name: entry.name().to_string(),
                extras: entry.extras().map(str::to_string),
                version: None,
                marker: None,
            })
            .collect()
    } else {
        options.specs.clone()
    };

    let mut pins = Vec::with_capacity(specs.len());
    for spec in &specs {
        tracing::info!("Resolving {spec}");
        let pin = resolver
            .resolve_pin(
                spec,
                &python_tags,
                &options.python_versions,
                options.include_prereleases,
            )
            .await?;
        pins.push(pin);
    }

    let mut outcome = UpdateOutcome::default();
    let mut ask = options.interactive;
    for pin in &pins {
        let old_version = requirements.find(&pin.name).map(|entry| entry.version().to_string());

        if ask {
            if let Some(old_version) = old_version.as_deref().filter(|old| *old != pin.version) {
                match confirm.confirm(&pin.name, old_version, &pin.version) {
                    Answer::Yes => {}
                    Answer::No => {
                        tracing::info!("Skipping {}", pin.name);
                        continue;
                    }
                    Answer::All => ask = false,
                    Answer::Quit => return Err(ReqlockError::Aborted),
                }
            }
        }

        let change = requirements.reconcile(pin, options.hash_policy);
        outcome.changes.push(PackageChange {
            name: pin.name.clone(),
            version: pin.version.clone(),
            change,
        });
    }

    let rendered = requirements.render();
    let updated = if rendered == original {
        rendered
    } else {
        writer::finalize(&rendered, requirements.newline())
    };

    if options.dry_run {
        outcome.diff = Some(writer::unified_diff(&original, &updated));
    } else {
        outcome.written = writer::apply(path, &original, &updated)?;
    }

    Ok(outcome)
}
