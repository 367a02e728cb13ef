//! CLI module for cropify
//!
//! Subcommands:
//! - `serve`: run the advisory HTTP service
//! - `train`: fit, evaluate and store the crop classifiers

pub mod serve;
pub mod train;

use clap::{Parser, Subcommand};

/// Cropify - crop recommendation from soil and weather
#[derive(Parser)]
#[command(name = "cropify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service
    Serve,

    /// Train models from the dataset and write their artifacts
    Train(train::TrainArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["cropify", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_train_flags() {
        let cli = Cli::try_parse_from([
            "cropify",
            "train",
            "--dataset",
            "data/crops.csv",
            "--label-column",
            "Crop",
            "--kind",
            "mlp",
            "--hidden-layers",
            "64,32",
            "--print-rules",
        ])
        .unwrap();

        let Command::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(args.label_column.as_deref(), Some("Crop"));
        assert_eq!(args.kind, "mlp");
        assert_eq!(args.hidden_layers, Some(vec![64, 32]));
        assert!(args.print_rules);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
