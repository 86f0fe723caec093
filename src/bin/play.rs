use clap::Parser;
use owo_colors::OwoColorize;

use monte48::agents::Agent;
use monte48::game::Board;
use monte48::logging;

use log::warn;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Instant;

#[derive(Debug, Parser)]
#[clap(version, about = "Play full games with an agent.")]
struct Opts {
    /// Number of games to play.
    #[clap(short, long, default_value_t = 1)]
    game_count: usize,
    /// Stop a game after this many moves.
    #[clap(long, default_value_t = 4096)]
    move_limit: usize,
    #[clap(short, long)]
    verbose: bool,
    /// Agent configuration.
    #[clap(default_value_t)]
    config: Agent,
}

#[tokio::main]
async fn main() {
    logging();

    let Opts {
        game_count,
        move_limit,
        verbose,
        config,
    } = Opts::parse();

    let start = Instant::now();

    let mut wins = 0;
    let mut total_score = 0u64;

    for i in 0..game_count {
        let (win, score) = play_game(&config, move_limit, verbose).await;
        wins += win as usize;
        total_score += score as u64;
        println!(
            "{}: {} {}ms",
            "Finish Game".bright_green(),
            i,
            start.elapsed().as_millis()
        );
    }

    println!("Result: {}/{}", wins, game_count);
    println!("Mean score: {}", total_score / game_count.max(1) as u64);
}

async fn play_game(agent: &Agent, move_limit: usize, verbose: bool) -> (bool, u32) {
    let mut rng = SmallRng::from_entropy();
    let mut board = Board::new(&mut rng);

    if verbose {
        println!("init: {board:?}");
    }

    for turn in 0..move_limit {
        let dir = agent.step(&board).await;
        board = board.step(dir, &mut rng);

        if verbose {
            println!("{turn}: {dir:?} {board:?}");
        }

        if board.has_won() {
            println!(
                "game: win after {} turns, score {}, max tile {}",
                turn,
                board.score,
                max_tile(&board)
            );
            return (true, board.score);
        }
        if board.has_lost() {
            println!(
                "game: loss after {} turns, score {}, max tile {}",
                turn,
                board.score,
                max_tile(&board)
            );
            return (false, board.score);
        }
        if !board.changed {
            // the agent picked an illegal move on a live board
            warn!("agent returned a no-op move");
            return (false, board.score);
        }
    }
    (false, board.score)
}

fn max_tile(board: &Board) -> u32 {
    board.tiles.iter().map(|t| t.value).max().unwrap_or(0)
}
