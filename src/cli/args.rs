use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blogtl")]
#[command(about = "Translate Korean MDX blog posts into English and Japanese with a local Ollama model")]
#[command(version)]
pub struct Args {
    /// Post file or directory to translate (defaults to the configured source directory)
    pub target: Option<String>,

    /// Translate every post, even ones that already have all translations
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Translate only the most recently modified post
    #[arg(short = 'l', long, conflicts_with = "target")]
    pub last: bool,

    /// Only translate into these target codes (repeatable, e.g. --to en)
    #[arg(short = 't', long = "to", value_name = "CODE")]
    pub to: Vec<String>,

    /// Ollama endpoint URL
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Metrics database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Do not record inference metrics
    #[arg(long)]
    pub no_metrics: bool,

    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List configured target languages and their models
    Targets,
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(short = 'f', long)]
        force: bool,
    },
    /// Show recent inference metrics
    Logs {
        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Metrics database path
        #[arg(long, value_name = "PATH")]
        db: Option<String>,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translate_flags() {
        let args = Args::try_parse_from([
            "blogtl", "posts/ko", "--force", "--to", "en", "--to", "JP", "--no-metrics",
        ])
        .unwrap();

        assert_eq!(args.target.as_deref(), Some("posts/ko"));
        assert!(args.force);
        assert!(!args.last);
        assert_eq!(args.to, ["en", "JP"]);
        assert!(args.no_metrics);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_last_conflicts_with_target() {
        assert!(Args::try_parse_from(["blogtl", "post.mdx", "--last"]).is_err());
        assert!(Args::try_parse_from(["blogtl", "--last"]).unwrap().last);
    }

    #[test]
    fn test_logs_default_limit() {
        let args = Args::try_parse_from(["blogtl", "logs"]).unwrap();
        assert!(matches!(args.command, Some(Command::Logs { limit: 20, db: None })));

        let args = Args::try_parse_from(["blogtl", "-q", "logs", "-n", "5"]).unwrap();
        assert!(args.quiet);
        assert!(matches!(args.command, Some(Command::Logs { limit: 5, .. })));
    }

    #[test]
    fn test_init_force() {
        let args = Args::try_parse_from(["blogtl", "init", "--force"]).unwrap();
        assert!(matches!(args.command, Some(Command::Init { force: true })));
    }
}
