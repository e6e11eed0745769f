// Simple command-line application to play chess

use chessmate::{ChessEngine, PrettyStyle};
use std::io::{self, BufRead, Write};

fn main() {
    let mut stdin = io::stdin().lock();
    let mut engine = ChessEngine::new();

    loop {
        println!("{}", engine.board().pretty(PrettyStyle::Ascii));
        if engine.checkmate() {
            let winner = engine.winner().expect("checkmate implies a winner");
            println!("Checkmate! {} wins.", winner);
            break;
        }

        print!("{} move (from_file from_rank to_file to_rank): ", engine.turn());
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }

        // Four whitespace-separated integers; anything else is re-prompted.
        let coords: Vec<i8> = s
            .split_whitespace()
            .filter_map(|tok| tok.parse().ok())
            .collect();
        let [ff, fr, tf, tr] = match coords[..] {
            [a, b, c, d] => [a, b, c, d],
            _ => {
                println!("Expected four integers between 0 and 7.");
                println!();
                continue;
            }
        };

        match engine.move_piece((ff, fr), (tf, tr)) {
            Ok(outcome) => {
                if let Some(kind) = outcome.captured {
                    println!("Captured a {}.", kind);
                }
                if outcome.check && !outcome.checkmate {
                    println!("Check!");
                }
            }
            Err(e) => println!("Bad move: {}", e),
        }
        println!();
    }
}
