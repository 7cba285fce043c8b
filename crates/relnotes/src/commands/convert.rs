//! Changelog to release notes conversion.

use std::path::{Path, PathBuf};

use clap::Args;
use relnotes_changelog::{read_document, read_section};
use relnotes_config::{CliSettings, Config, ProductHeading};
use relnotes_translate::{DevsiteBackend, HeadingPolicy, Translator};
use relnotes_vcs::resolve_local_repo;

use crate::error::CliError;

/// Arguments for converting a changelog.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// The CHANGELOG.md file to convert.
    changelog: PathBuf,

    /// Local GitHub repository as owner/repo (default: from config or the git remote).
    #[arg(short, long, env = "RELNOTES_REPO")]
    repo: Option<String>,

    /// Convert only the section whose heading contains VERSION.
    #[arg(long, value_name = "VERSION", conflicts_with = "all")]
    only: Option<String>,

    /// Convert every section; headings are kept as written.
    #[arg(long)]
    all: bool,

    /// Path to configuration file (default: auto-discover relnotes.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConvertArgs {
    /// Produce release notes for the selected changelog section.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the local repository
    /// cannot be resolved, or the changelog (or requested section) cannot be read.
    pub(crate) fn execute(self) -> Result<String, CliError> {
        let cli_settings = CliSettings {
            repo: self.repo.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let local_repo = match &config.repo.name {
            Some(name) => name.clone(),
            None => resolve_local_repo(changelog_dir(&self.changelog), &config.repo.remote)?,
        };

        let (text, heading) = if self.all {
            (read_document(&self.changelog)?, HeadingPolicy::Passthrough)
        } else {
            let text = read_section(&self.changelog, self.only.as_deref())?;
            (text, heading_policy(config.product_for(&self.changelog)))
        };

        tracing::debug!(
            changelog = %self.changelog.display(),
            config = ?config.config_path,
            local_repo = %local_repo,
            heading = ?heading,
            "Converting changelog"
        );

        let translator = Translator::new(DevsiteBackend::new(local_repo, heading));
        Ok(translator.translate(&text))
    }
}

/// Heading policy for a configured product, passing headings through when unconfigured.
fn heading_policy(product: Option<&ProductHeading>) -> HeadingPolicy {
    match product {
        Some(ProductHeading::Token(token)) => HeadingPolicy::Replace(token.clone()),
        Some(ProductHeading::Suppressed) => HeadingPolicy::Suppress,
        None => HeadingPolicy::Passthrough,
    }
}

/// Directory to start the git repository search from.
fn changelog_dir(changelog: &Path) -> &Path {
    match changelog.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const CHANGELOG: &str = "\
# Unreleased
- [changed] Not yet.

# v1.2.0
- [added] Support for X (#12)
- [fixed] Crash, see https://github.com/other/repo/issues/3

# v1.1.0
- [fixed] Typo.
";

    fn args(changelog: PathBuf, config: PathBuf) -> ConvertArgs {
        ConvertArgs {
            changelog,
            repo: None,
            only: None,
            all: false,
            config: Some(config),
            verbose: false,
        }
    }

    /// Write a changelog under `Firestore/` and a config naming its product.
    fn fixture(dir: &Path) -> (PathBuf, PathBuf) {
        let product_dir = dir.join("Firestore");
        std::fs::create_dir_all(&product_dir).unwrap();
        let changelog = product_dir.join("CHANGELOG.md");
        std::fs::write(&changelog, CHANGELOG).unwrap();

        let config = dir.join("relnotes.toml");
        std::fs::write(
            &config,
            "[repo]\nname = \"org/repo\"\n\n[products]\n\"Firestore/CHANGELOG.md\" = \"{{firestore}}\"\n",
        )
        .unwrap();
        (changelog, config)
    }

    #[test]
    fn test_heading_policy_mapping() {
        assert_eq!(
            heading_policy(Some(&ProductHeading::Token("{{auth}}".to_owned()))),
            HeadingPolicy::Replace("{{auth}}".to_owned())
        );
        assert_eq!(
            heading_policy(Some(&ProductHeading::Suppressed)),
            HeadingPolicy::Suppress
        );
        assert_eq!(heading_policy(None), HeadingPolicy::Passthrough);
    }

    #[test]
    fn test_changelog_dir() {
        assert_eq!(changelog_dir(Path::new("CHANGELOG.md")), Path::new("."));
        assert_eq!(
            changelog_dir(Path::new("Firestore/CHANGELOG.md")),
            Path::new("Firestore")
        );
    }

    #[test]
    fn test_convert_latest_section() {
        let dir = tempfile::tempdir().unwrap();
        let (changelog, config) = fixture(dir.path());

        let notes = args(changelog, config).execute().unwrap();
        assert_eq!(
            notes,
            "### {{firestore}}\n\
             * {{feature}} Support for X ([#12](//github.com/org/repo/issues/12))\n\
             * {{fixed}} Crash, see [other/repo#3](//github.com/other/repo/issues/3)\n"
        );
    }

    #[test]
    fn test_convert_only_version() {
        let dir = tempfile::tempdir().unwrap();
        let (changelog, config) = fixture(dir.path());

        let mut args = args(changelog, config);
        args.only = Some("1.1.0".to_owned());
        assert_eq!(args.execute().unwrap(), "### {{firestore}}\n* {{fixed}} Typo.\n");
    }

    #[test]
    fn test_convert_all_keeps_headings() {
        let dir = tempfile::tempdir().unwrap();
        let (changelog, config) = fixture(dir.path());

        let mut args = args(changelog, config);
        args.all = true;
        let notes = args.execute().unwrap();
        assert!(notes.starts_with("# Unreleased\n* {{changed}} Not yet.\n"));
        assert!(notes.contains("\n# v1.1.0\n* {{fixed}} Typo.\n"));
    }

    #[test]
    fn test_convert_repo_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let (changelog, config) = fixture(dir.path());

        let mut args = args(changelog, config);
        args.repo = Some("other/repo".to_owned());
        let notes = args.execute().unwrap();
        assert!(notes.contains("[#3](//github.com/other/repo/issues/3)"));
        assert!(notes.contains("([#12](//github.com/other/repo/issues/12))"));
    }

    #[test]
    fn test_convert_unconfigured_product_passes_heading() {
        let dir = tempfile::tempdir().unwrap();
        let (_, config) = fixture(dir.path());
        let changelog = dir.path().join("CHANGELOG.md");
        std::fs::write(&changelog, "## 2.0.0\n+ Faster.\n").unwrap();

        let notes = args(changelog, config).execute().unwrap();
        assert_eq!(notes, "## 2.0.0\n* Faster.\n");
    }

    #[test]
    fn test_convert_missing_version() {
        let dir = tempfile::tempdir().unwrap();
        let (changelog, config) = fixture(dir.path());

        let mut args = args(changelog, config);
        args.only = Some("9.9.9".to_owned());
        let err = args.execute().unwrap_err();
        assert!(matches!(err, CliError::Changelog(_)));
    }
}
