//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod output;
pub mod prompt;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{defaults, urls, GlobalConfig, Settings, SettingsOverrides};
use crate::core::digest::Algorithm;
use crate::core::requirements::HashPolicy;
use crate::core::spec::PackageSpec;
use crate::core::update::{run_update, Resolver, UpdateOptions};
use crate::error::ReqlockError;
use crate::infra::download::{build_client, DownloadManager};
use crate::registry::IndexClient;

use output::{create_spinner, format_change, status};
use prompt::PromptConfirm;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    ")"
);

/// Reqlock - pin Python packages with hashes in requirements files
///
/// Looks up each package on the index, hashes the files of the chosen
/// release and writes `name==version --hash=...` entries that
/// `pip install --require-hashes` accepts.
#[derive(Parser, Debug)]
#[command(name = "reqlock")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// Packages to add or update, e.g. `hashin`, `requests[security]==2.31.0`
    #[arg(value_name = "PACKAGES")]
    pub packages: Vec<String>,

    /// Requirements file to update
    #[arg(short = 'r', long, value_name = "FILE", default_value = defaults::DEFAULT_REQUIREMENTS_FILE)]
    pub requirements_file: PathBuf,

    /// Hash algorithm (sha256, sha384, sha512)
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Only hash binary distributions for this Python version (repeatable)
    #[arg(short = 'p', long = "python-version", value_name = "VERSION")]
    pub python_versions: Vec<String>,

    /// Allow pre-release versions when no stable version exists
    #[arg(long)]
    pub include_prereleases: bool,

    /// Update every package already in the requirements file
    #[arg(short, long)]
    pub update_all: bool,

    /// Ask before each version change (requires --update-all)
    #[arg(short, long)]
    pub interactive: bool,

    /// Print a diff of the changes instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Keep existing hashes and add the new ones
    #[arg(long)]
    pub merge_hashes: bool,

    /// Package index JSON API root
    #[arg(long, value_name = "URL", env = urls::INDEX_URL_ENV)]
    pub index_url: Option<String>,

    /// Download one artifact at a time
    #[arg(long)]
    pub synchronous: bool,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Options for the update run
    pub fn update_options(&self) -> Result<UpdateOptions, ReqlockError> {
        let specs = self
            .packages
            .iter()
            .map(|package| PackageSpec::parse(package))
            .collect::<Result<Vec<_>, _>>()?;

        let options = UpdateOptions {
            requirements_file: self.requirements_file.clone(),
            specs,
            update_all: self.update_all,
            python_versions: self.python_versions.clone(),
            include_prereleases: self.include_prereleases,
            hash_policy: if self.merge_hashes {
                HashPolicy::Merge
            } else {
                HashPolicy::Replace
            },
            dry_run: self.dry_run,
            interactive: self.interactive,
        };
        options.validate()?;
        Ok(options)
    }

    /// Command line overrides for [`Settings`]
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            index_url: self.index_url.clone(),
            algorithm: self.algorithm,
            synchronous: self.synchronous,
        }
    }

    /// Execute the update
    pub async fn run(self) -> Result<()> {
        let options = self.update_options()?;
        let global = GlobalConfig::load().map_err(ReqlockError::from)?;
        let settings = Settings::resolve(&global, &self.overrides())?;
        tracing::debug!("Using {settings:?}");

        let client = build_client();
        let index = IndexClient::with_client(client.clone(), settings.index_url.clone());
        let downloads = DownloadManager::with_client(client);
        let resolver = Resolver::new(&settings, &index, &downloads);

        let spinner = (!options.interactive).then(|| create_spinner("Resolving packages..."));
        let mut confirm = PromptConfirm::stdio();
        let result = run_update(&resolver, &options, &mut confirm).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let outcome = result?;

        for change in &outcome.changes {
            eprintln!("{}", format_change(change));
        }

        match outcome.diff {
            Some(diff) if diff.is_empty() => eprintln!("{} No changes", status::INFO),
            Some(diff) => print!("{diff}"),
            None if outcome.written => eprintln!(
                "{} Updated {}",
                status::SUCCESS,
                options.requirements_file.display()
            ),
            None => {}
        }

        Ok(())
    }
}

/// Process exit code for an error returned by [`Cli::run`]
pub fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<ReqlockError>()
        .map_or(1, ReqlockError::exit_code)
}
