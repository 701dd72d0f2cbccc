//! A human player typing moves into a terminal

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use board::{Game, Move};
use engines::Engine;

/// An input for a human typing in the terminal
///
/// Moves can be written in standard algebraic notation (`Nf3`, `O-O`) or as the source and target
/// squares (`g1f3`). Typing `q`, `quit`, or closing the input resigns.
pub struct TerminalUIPlayer<R, W> {
    input: R,
    output: W,
}

impl TerminalUIPlayer<BufReader<Stdin>, Stdout> {
    /// A player reading from stdin and writing to stdout
    ///
    /// Nothing past the end of each line is buffered, so both sides of a game can be played from
    /// the same terminal.
    pub fn stdio() -> Self {
        Self::new(BufReader::with_capacity(1, io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalUIPlayer<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output, e.g. to look at what was printed
    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, game: &Game) -> io::Result<Option<Move>> {
        writeln!(self.output)?;
        write!(self.output, "{game}")?;
        if let Some(last) = game.history()[..game.turn()].last() {
            writeln!(self.output, "Opponent made move: {last}")?;
        }
        if game.is_check() {
            writeln!(self.output, "Check!")?;
        }
        loop {
            write!(
                self.output,
                "{:?} to move, please input your move in algebraic notation: ",
                game.side_to_move()
            )?;
            self.output.flush()?;

            let mut buffer = String::new();
            if self.input.read_line(&mut buffer)? == 0 {
                return Ok(None);
            }
            let text = buffer.trim();
            match text {
                "" => continue,
                "q" | "quit" => return Ok(None),
                _ => {}
            }
            match game.resolve(text) {
                Ok(mv) => return Ok(Some(mv)),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Engine for TerminalUIPlayer<R, W> {
    fn name(&self) -> &str {
        "human"
    }

    fn select(&mut self, game: &Game) -> Option<Move> {
        match self.prompt(game) {
            Ok(mv) => mv,
            Err(err) => {
                tracing::error!(%err, "can't talk to the terminal");
                None
            }
        }
    }
}
