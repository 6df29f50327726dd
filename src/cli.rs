use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Roster sorted by donations.
    Members,
    /// Donation ranking plus per-season war ranking.
    #[default]
    WarStats,
}

#[derive(Debug, Default, PartialEq)]
pub struct Cli {
    pub command: Command,
    pub clan: Option<String>,         // overrides config / CLAN_TAG
    pub api_url: Option<String>,      // overrides config
    pub out: Option<PathBuf>,         // stdout when absent
    pub season_order: Option<String>, // first_seen | newest_first | oldest_first
    pub envelope: bool,
    pub compact: bool,
    pub verbose: bool,
    pub help: bool,
}

pub fn parse() -> Cli {
    parse_from(std::env::args().skip(1))
}

pub fn parse_from<I: IntoIterator<Item = String>>(args: I) -> Cli {
    let mut cli = Cli::default();

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "members" | "clan-infos" => cli.command = Command::Members,
            "war-stats" | "clan-war-stats" => cli.command = Command::WarStats,
            "--clan" | "-c" => {
                if let Some(t) = it.next() { cli.clan = Some(t); }
            }
            "--api-url" => {
                if let Some(u) = it.next() { cli.api_url = Some(u); }
            }
            "--out" | "-o" => {
                if let Some(p) = it.next() { cli.out = Some(PathBuf::from(p)); }
            }
            "--season-order" => {
                if let Some(o) = it.next() { cli.season_order = Some(o); }
            }
            "--envelope" => cli.envelope = true,
            "--compact" => cli.compact = true,
            "--verbose" | "-v" => cli.verbose = true,
            "--help" | "-h" => cli.help = true,
            _ => {}
        }
    }

    cli
}

pub fn print_help() {
    eprintln!(
r#"clanstats: clan donation and war rankings

Usage:
  clanstats [members|war-stats] [--clan TAG] [--api-url URL] [--out PATH]
            [--season-order ORDER] [--envelope] [--compact] [-v]

Commands:
  war-stats (default)     Donation ranking + per-season war ranking.
  members                 Roster sorted by donations.

Options:
  --clan, -c TAG          Clan tag, with or without '#'. Overrides CLAN_TAG / config.toml.
  --api-url URL           Override the API base URL.
  --out, -o PATH          Write JSON to PATH instead of stdout.
  --season-order ORDER    first_seen (default), newest_first or oldest_first.
  --envelope              Wrap the JSON in an HTTP gateway response (status, CORS headers, body).
  --compact               Single-line JSON.
  -v, --verbose           Debug logging on stderr (RUST_LOG overrides).
  -h, --help              Show this help.

Environment:
  CLAN_API_TOKEN          API token, sent in the `auth` header (required).
  CLAN_TAG                Clan tag when --clan is not given.
  A .env file in the working directory is loaded first.
"#);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_war_stats() {
        assert_eq!(parse_from(args(&[])), Cli::default());
        assert_eq!(parse_from(args(&[])).command, Command::WarStats);
    }

    #[test]
    fn parses_command_and_options() {
        let cli = parse_from(args(&[
            "members", "--clan", "#2PP", "-o", "out.json", "--envelope", "--compact", "-v",
            "--season-order", "newest",
        ]));

        assert_eq!(cli.command, Command::Members);
        assert_eq!(cli.clan.as_deref(), Some("#2PP"));
        assert_eq!(cli.out, Some(PathBuf::from("out.json")));
        assert_eq!(cli.season_order.as_deref(), Some("newest"));
        assert!(cli.envelope && cli.compact && cli.verbose);
        assert!(!cli.help);
    }

    #[test]
    fn dangling_option_and_unknown_args_are_ignored() {
        let cli = parse_from(args(&["--bogus", "--clan"]));
        assert_eq!(cli.clan, None);
    }
}
