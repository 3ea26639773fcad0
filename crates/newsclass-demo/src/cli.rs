use clap::{Parser, Subcommand};
use newsclass_core::Prediction;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "newsclass")]
#[command(author, version, about = "BBC news article classifier")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the classifier web UI
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "NEWSCLASS_CONFIG", default_value = "newsclass.yaml")]
        config: PathBuf,

        /// Listen address
        #[arg(short, long, default_value = "127.0.0.1")]
        address: String,

        /// Listen port
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Sidebar logo image, overrides assets.logo
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Classify one article and print its category
    Classify {
        /// Article text; read from stdin when omitted
        text: Option<String>,

        /// Configuration file path
        #[arg(short, long, env = "NEWSCLASS_CONFIG", default_value = "newsclass.yaml")]
        config: PathBuf,

        /// Also print the token sequence and per-class probabilities
        #[arg(long)]
        show_tokens: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Text printed by `classify`.
///
/// The category line always appears; tokens, match counts and per-class
/// probabilities only with `--show-tokens`.
pub fn render_prediction(prediction: &Prediction, tokens: &[String], show_tokens: bool) -> String {
    let mut out = String::new();
    if show_tokens {
        let _ = writeln!(out, "Tokens: {}", tokens.join(" "));
        let _ = writeln!(
            out,
            "Matched: {}/{}",
            prediction.matched_count, prediction.token_count
        );
    }
    let _ = writeln!(out, "Predicted Category: {}", prediction.label);
    if show_tokens {
        for (label, score) in &prediction.scores {
            let _ = writeln!(out, "  {:<14} {:.4}", label.display_name(), score);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsclass_core::Category;

    fn prediction() -> Prediction {
        let mut prediction = Prediction::new(
            Category::Tech,
            0.7,
            vec![(Category::Business, 0.3), (Category::Tech, 0.7)],
        );
        prediction.token_count = 3;
        prediction.matched_count = 2;
        prediction
    }

    #[test]
    fn test_render_prediction_plain() {
        let tokens = vec!["chip".to_string(), "launch".to_string(), "qzx".to_string()];
        let out = render_prediction(&prediction(), &tokens, false);
        assert_eq!(out, "Predicted Category: Tech\n");
    }

    #[test]
    fn test_render_prediction_shows_scores_with_tokens() {
        let tokens = vec!["chip".to_string(), "launch".to_string(), "qzx".to_string()];
        let out = render_prediction(&prediction(), &tokens, true);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Tokens: chip launch qzx");
        assert_eq!(lines[1], "Matched: 2/3");
        assert_eq!(lines[2], "Predicted Category: Tech");
        assert_eq!(lines[3], "  Business       0.3000");
        assert_eq!(lines[4], "  Tech           0.7000");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_serve_args() {
        let cli = Cli::try_parse_from([
            "newsclass",
            "serve",
            "--config",
            "bbc.yaml",
            "--port",
            "9000",
            "--logo",
            "assets/bbc.png",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve {
                config,
                address,
                port,
                logo,
                verbose,
            } => {
                assert_eq!(config, PathBuf::from("bbc.yaml"));
                assert_eq!(address, "127.0.0.1");
                assert_eq!(port, 9000);
                assert_eq!(logo, Some(PathBuf::from("assets/bbc.png")));
                assert!(!verbose);
            }
            other => panic!("Expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_args() {
        let cli =
            Cli::try_parse_from(["newsclass", "classify", "Stocks rally", "--show-tokens"]).unwrap();

        match cli.command {
            Commands::Classify {
                text, show_tokens, ..
            } => {
                assert_eq!(text.as_deref(), Some("Stocks rally"));
                assert!(show_tokens);
            }
            other => panic!("Expected classify, got {:?}", other),
        }

        let cli = Cli::try_parse_from(["newsclass", "classify"]).unwrap();
        assert!(matches!(cli.command, Commands::Classify { text: None, .. }));
    }
}
