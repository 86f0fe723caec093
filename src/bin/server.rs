use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use log::{info, warn};
use monte48::agents::Agent;
use monte48::env::{BoardRequest, IndexResponse, MoveResponse};
use monte48::game::Board;
use monte48::logging;

use warp::Filter;

pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[clap(version, about = "Monte-Carlo 2048 move server.")]
struct Opt {
    /// IP and Port of the webserver.
    #[clap(long, default_value = "127.0.0.1:5001")]
    host: SocketAddr,
    /// Default agent configuration.
    #[clap(long, default_value_t)]
    config: Agent,
}

#[tokio::main]
async fn main() {
    logging();

    let Opt { host, config } = Opt::parse();

    let state = Arc::new(config);

    let index = warp::get().and(warp::path::end()).map(|| {
        warn!("index");
        warp::reply::json(&IndexResponse::new("monte48", PACKAGE_VERSION))
    });

    let step = warp::path("move")
        .and(with_state(state.clone()))
        .and(warp::post())
        .and(warp::body::json::<BoardRequest>())
        .and_then(step);

    warp::serve(index.or(step)).run(host).await
}

fn with_state(
    state: Arc<Agent>,
) -> impl Filter<Extract = (Arc<Agent>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn step(state: Arc<Agent>, request: BoardRequest) -> Result<impl warp::Reply, Infallible> {
    let board = Board::from_request(&request);
    warn!("move score {}", board.score);

    let timer = Instant::now();
    let dir = state.step(&board).await;
    info!("response time {:?}ms", timer.elapsed().as_millis());

    Ok(warp::reply::json(&MoveResponse::new(dir)))
}
