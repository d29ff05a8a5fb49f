//! Command-line arguments.

use std::path::PathBuf;

use apiprobe_domain::ScenarioId;
use apiprobe_infrastructure::ConfigOverrides;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "apiprobe")]
#[command(about = "Sequential HTTP integration test runner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the API under test
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// YAML config file
    #[arg(short, long, value_name = "FILE", env = "APIPROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "N")]
    pub timeout_secs: Option<u64>,

    /// Run only these scenarios (plus their prerequisites)
    #[arg(long, num_args = 1.., value_name = "SCENARIO")]
    pub only: Vec<ScenarioId>,

    /// Also probe the pages of the public site
    #[arg(long)]
    pub pages: bool,

    /// Print the plan without running it
    #[arg(long)]
    pub list: bool,

    /// Print the run summary as JSON instead of the human report
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Config values given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["apiprobe"]).unwrap();
        assert!(cli.only.is_empty());
        assert!(!cli.pages && !cli.list && !cli.json);
        assert_eq!(cli.overrides(), ConfigOverrides::default());
    }

    #[test]
    fn test_only_accepts_several_scenarios() {
        let cli = Cli::try_parse_from([
            "apiprobe",
            "--base-url",
            "https://api.example.com",
            "--timeout-secs",
            "3",
            "--only",
            "orders",
            "auth_guard",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.only, vec![ScenarioId::Orders, ScenarioId::AuthGuard]);
        assert!(cli.json);
        assert_eq!(
            cli.overrides(),
            ConfigOverrides {
                base_url: Some("https://api.example.com".to_string()),
                timeout_secs: Some(3),
            }
        );
    }

    #[test]
    fn test_unknown_scenario_is_rejected() {
        let err = Cli::try_parse_from(["apiprobe", "--only", "payments"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
