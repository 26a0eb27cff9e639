use clap::Parser;
use salt_processor::{
    args::Args,
    commands::{run, CommandReport}
};
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::new(&args.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    match run(&args) {
        Ok(report) => print_report(&report),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(report: &CommandReport) {
    match report {
        CommandReport::Fitted { contestants, epochs } => {
            info!("Fitted {} contestants in {} epochs", contestants, epochs)
        }
        CommandReport::Predicted(decision) => {
            println!("{:.4}", decision.prediction);
            info!("Bet {} on {:?}", decision.wager, decision.side)
        }
        CommandReport::Recorded { recorded, bet } => {
            if let Some(bet) = bet {
                println!("{:?} {}", bet.side, bet.wager);
            }
            info!("State processed, recorded: {}", recorded)
        }
        CommandReport::CheckedUp { healthy, issues } => {
            if !healthy {
                error!("Health check failed with {} issue(s)", issues);
                std::process::exit(1);
            }
        }
        CommandReport::TeamsRemoved { removed, saved } => {
            info!("{} teams removed (saved: {})", removed, saved)
        }
    }
}
