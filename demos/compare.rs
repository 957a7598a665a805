use std::env;
use std::thread;

use terrain_search::{Algorithm, Cell, PlaybackStep, Preset, Session};

// Runs every algorithm on both presets and prints the summary of each run, then replays one run
// in the terminal. Pass an algorithm name (bfs, dijkstra, astar-manhattan, astar-euclidean) to
// choose which run is replayed. Set RUST_LOG=info to see the library's log output.
//
// Legend of the replay: # wall, w water, S start, G goal, o expanded, * path

fn render(session: &Session, expanded: &[Cell], path: &[Cell]) -> String {
    let grid = session.grid();
    let mut out = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = Cell::new(row, col);
            let symbol = if cell == grid.start() {
                'S'
            } else if cell == grid.goal() {
                'G'
            } else if path.contains(&cell) {
                '*'
            } else if expanded.contains(&cell) {
                'o'
            } else {
                grid.terrain(cell).map_or(' ', |t| t.symbol())
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

fn main() {
    env_logger::init();
    let replayed = match env::args().nth(1).map(|arg| arg.parse::<Algorithm>()) {
        Some(Ok(algorithm)) => algorithm,
        Some(Err(e)) => {
            eprintln!("{e}");
            return;
        }
        None => Algorithm::AstarManhattan,
    };

    let mut session = Session::default();
    for preset in Preset::ALL {
        if let Err(e) = session.load_preset(preset) {
            eprintln!("{e}");
            return;
        }
        println!("== {}", preset.name());
        for algorithm in Algorithm::ALL {
            match session.run(algorithm) {
                Ok(report) => {
                    println!("{}", report.stats);
                    match report.stats.path_cost {
                        Some(cost) if algorithm.is_weighted() => println!("Path Cost   : {cost}"),
                        Some(cost) => println!("Path Cost   : {cost} (terrain ignored)"),
                        None => {}
                    }
                    println!();
                }
                Err(e) => eprintln!("{e}"),
            }
            session.stop();
        }
    }

    if let Err(e) = session.run(replayed) {
        eprintln!("{e}");
        return;
    }
    let mut expanded = Vec::new();
    let mut path = Vec::new();
    while let Some(delay) = session.next_delay() {
        match session.tick() {
            Some(PlaybackStep::Expanded { cell, .. }) => expanded.push(cell),
            Some(PlaybackStep::Path { cell, .. }) => path.push(cell),
            Some(PlaybackStep::Finished) | None => break,
        }
        thread::sleep(delay);
    }
    print!("{}", render(&session, &expanded, &path));
    if let Some(stats) = session.last_run() {
        println!("{stats}");
    }
}
