// Simple command-line application to play chess between two players

use hotseat::{position::PrettyStyle, Game, GameStatus, PromotePiece, Square};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

fn parse_promote(s: &str) -> Option<PromotePiece> {
    match s {
        "" | "q" => Some(PromotePiece::Queen),
        "r" => Some(PromotePiece::Rook),
        "b" => Some(PromotePiece::Bishop),
        "n" => Some(PromotePiece::Knight),
        _ => None,
    }
}

// Accepts "e2e4", "e2 e4" and "e7e8n"
fn parse_move(s: &str) -> Option<(Square, Square, PromotePiece)> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.len() < 4 || !s.is_ascii() {
        return None;
    }
    let src = Square::from_str(&s[0..2]).ok()?;
    let dst = Square::from_str(&s[2..4]).ok()?;
    let promote = parse_promote(&s[4..])?;
    Some((src, dst, promote))
}

fn main() {
    let mut stdin = io::stdin().lock();

    let mut game = Game::new();

    loop {
        if let GameStatus::GameOver(outcome) = game.status() {
            println!("{}", game.position().pretty(PrettyStyle::Utf8));
            println!("Game finished: {} ({})", outcome, outcome.score());
            print!("Play again? [y/N] ");
            io::stdout().flush().unwrap();
            let mut s = String::new();
            stdin.read_line(&mut s).unwrap();
            if s.trim() != "y" {
                break;
            }
            game.reset();
            continue;
        }

        println!("{}", game.position().pretty(PrettyStyle::Utf8));
        print!("{}: ", game.status());
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }

        let (src, dst, promote) = match parse_move(&s) {
            Some(mv) => mv,
            None => {
                println!("Bad move: expected something like \"e2 e4\"");
                println!();
                continue;
            }
        };

        let id = match game.position().piece_at(src) {
            Some(id) => id,
            None => {
                println!("No piece on {}", src);
                println!();
                continue;
            }
        };

        if let Err(e) = game.try_move_promote(id, dst, promote) {
            let targets = game.legal_moves(id);
            if targets.is_empty() {
                println!("Bad move: {}", e);
            } else {
                println!("Bad move: {} (try one of: {})", e, targets);
            }
        }

        println!();
    }
}
