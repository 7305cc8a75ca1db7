use clap::Parser;

/// Rod playground: opens a webview on the headless engine and pumps its
/// event loop for a few ticks.
#[derive(Parser, Debug)]
#[command(name = "rod", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log directive override (e.g. `rod=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of poll ticks to run before shutting down.
    #[arg(long, default_value_t = 10)]
    pub ticks: u32,

    /// Window title override.
    #[arg(long)]
    pub title: Option<String>,

    /// URL to load instead of the configured one.
    #[arg(long)]
    pub url: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["rod"]).unwrap();
        assert_eq!(args.ticks, 10);
        assert!(args.config.is_none());
        assert!(args.url.is_none());
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "rod",
            "--config",
            "/tmp/rod.toml",
            "--log-level",
            "rod=trace",
            "--ticks",
            "3",
            "--title",
            "Hello",
            "--url",
            "https://rust-lang.org",
        ])
        .unwrap();
        assert_eq!(args.config.as_deref(), Some("/tmp/rod.toml"));
        assert_eq!(args.log_level.as_deref(), Some("rod=trace"));
        assert_eq!(args.ticks, 3);
        assert_eq!(args.title.as_deref(), Some("Hello"));
        assert_eq!(args.url.as_deref(), Some("https://rust-lang.org"));
    }

    #[test]
    fn rejects_negative_ticks() {
        assert!(Args::try_parse_from(["rod", "--ticks", "-1"]).is_err());
    }
}
