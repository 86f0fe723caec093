use clap::Parser;
use log::info;

use monte48::agents::Agent;
use monte48::env::BoardRequest;
use monte48::game::Board;
use monte48::logging;

#[derive(Debug, Parser)]
#[clap(version, about = "Computes the next move for a board snapshot.")]
struct Opts {
    /// Default configuration.
    #[clap(long, default_value_t)]
    config: Agent,
    /// JSON board snapshot.
    #[clap(value_parser = parse_request)]
    request: BoardRequest,
}

fn parse_request(s: &str) -> Result<BoardRequest, serde_json::Error> {
    serde_json::from_str(s)
}

#[tokio::main]
async fn main() {
    logging();

    let Opts { config, request } = Opts::parse();

    let board = Board::from_request(&request);
    info!("{board:?}");

    let dir = config.step(&board).await;

    info!("Move: {dir:?}");
    println!("{}", serde_json::to_string(&dir).unwrap_or_default());
}
