//! Spanish Quest CLI
//!
//! Commands:
//! - serve: Start the classroom API server, optionally with a demo class
//! - vocab: Convert vocabulary lists into quiz content

mod seed;
mod vocab;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use quest_server::{run_server, ServerConfig, ServerState};

#[derive(Parser)]
#[command(name = "quest")]
#[command(about = "Spanish Quest classroom game platform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,
        /// Seed a demo class with this many students
        #[arg(long, default_value = "0")]
        students: usize,
        /// Seed for demo class generation
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Vocabulary content tools
    #[command(subcommand)]
    Vocab(vocab::VocabCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, students, seed } => {
            let state = if students > 0 {
                tracing::info!(students, seed, "seeding demo class");
                Arc::new(seed::build_demo_state(students, seed))
            } else {
                Arc::new(ServerState::new())
            };

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_server(ServerConfig { port }, state))
        }
        Commands::Vocab(command) => vocab::run(command),
    }
}
