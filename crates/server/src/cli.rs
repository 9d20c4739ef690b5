use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};
use seqbot_core::config::{ConfigOverrides, LoadOptions, RegistrationPolicy};

/// Startup flags. `--help` prints usage and keeps going, so it is a plain switch rather
/// than clap's exiting help action.
#[derive(Debug, Parser)]
#[command(
    name = "seqbot",
    about = "Discord bot answering /random-sequence with a shuffled 1..=n",
    disable_help_flag = true,
    after_help = concat!(
        "Examples:\n",
        "  seqbot --token $TOKEN\n",
        "  seqbot --token $TOKEN --guild 123456789 --rmcmd=false"
    )
)]
pub struct Cli {
    #[arg(long, help = "(Required) Bot access token")]
    pub token: Option<String>,

    #[arg(
        long,
        help = "(Optional) Test guild ID. If not passed, the bot registers commands globally"
    )]
    pub guild: Option<String>,

    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Remove all commands after shutting down [default: true]"
    )]
    pub rmcmd: Option<bool>,

    #[arg(long, help = "What to do when a command cannot be created or deleted")]
    pub registration_policy: Option<RegistrationPolicy>,

    #[arg(long, help = "Path to a seqbot.toml config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Log level (trace|debug|info|warn|error)")]
    pub log_level: Option<String>,

    #[arg(long, action = ArgAction::SetTrue, help = "Print help")]
    pub help: bool,
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                discord_token: self.token.clone(),
                discord_guild_id: self.guild.clone(),
                remove_commands: self.rmcmd,
                registration_policy: self.registration_policy,
                log_level: self.log_level.clone(),
            },
        }
    }
}

pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use seqbot_core::config::RegistrationPolicy;

    use super::{usage, Cli};

    #[test]
    fn help_flag_is_parsed_without_exiting() {
        let cli = Cli::try_parse_from(["seqbot", "--help", "--token", "X"]).expect("valid args");

        assert!(cli.help);
        assert_eq!(cli.token.as_deref(), Some("X"));
    }

    #[test]
    fn rmcmd_accepts_bare_and_explicit_values() {
        let bare = Cli::try_parse_from(["seqbot", "--rmcmd"]).expect("valid args");
        assert_eq!(bare.rmcmd, Some(true));

        let explicit = Cli::try_parse_from(["seqbot", "--rmcmd=false"]).expect("valid args");
        assert_eq!(explicit.rmcmd, Some(false));

        let absent = Cli::try_parse_from(["seqbot"]).expect("valid args");
        assert_eq!(absent.rmcmd, None);
    }

    #[test]
    fn flags_map_onto_config_overrides() {
        let cli = Cli::try_parse_from([
            "seqbot",
            "--token",
            "X",
            "--guild",
            "",
            "--registration-policy",
            "best_effort",
        ])
        .expect("valid args");
        let options = cli.load_options();

        assert_eq!(options.overrides.discord_token.as_deref(), Some("X"));
        assert_eq!(options.overrides.discord_guild_id.as_deref(), Some(""));
        assert_eq!(options.overrides.registration_policy, Some(RegistrationPolicy::BestEffort));
        assert!(!options.require_file);
    }

    #[test]
    fn usage_lists_every_flag() {
        let text = usage();
        for flag in ["--token", "--guild", "--rmcmd", "--help"] {
            assert!(text.contains(flag), "usage should mention {flag}");
        }
    }
}
