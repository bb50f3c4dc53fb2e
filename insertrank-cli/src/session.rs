/// Terminal oracle: asks a human each comparison and feeds the answer back.
///
/// Generic over the reader/writer so the whole loop can be driven from a
/// script in tests. Positions typed by the user are 1-indexed.
use insertrank_core::reorder::moved;
use insertrank_core::{ComparisonRequest, EngineState, Item, RankError, RankingEngine};
use std::io::{self, BufRead, Write};

use crate::output::truncate_label;

const HELP: &str = "\
Commands:
  1          new item wins
  2          ranked item wins
  l          list the ranking so far
  m FROM TO  stage moving ranked item FROM to position TO
  u N        stage moving ranked item N up one place
  d N        stage moving ranked item N down one place
  s          save staged moves (restarts the current search)
  c          discard staged moves
  q          stop and print the ranking so far
  ?          show this help";

const DONE_HELP: &str = "\
All items ranked. Moves now apply immediately:
  l, m FROM TO, u N, d N
Press Enter or q to finish.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Finished,
    Aborted,
}

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CandidateWins,
    OpponentWins,
    List,
    /// 1-indexed positions.
    Move { from: usize, to: usize },
    Up(usize),
    Down(usize),
    Save,
    Cancel,
    Help,
    Quit,
}

/// Parse one input line. `None` for anything unrecognized.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?.to_ascii_lowercase();
    let mut position = || parts.next()?.parse::<usize>().ok().filter(|&n| n >= 1);

    let command = match head.as_str() {
        "1" | "n" | "new" => Command::CandidateWins,
        "2" | "r" | "ranked" => Command::OpponentWins,
        "l" | "list" => Command::List,
        "m" | "move" => {
            let from = position()?;
            let to = position()?;
            Command::Move { from, to }
        }
        "u" | "up" => Command::Up(position()?),
        "d" | "down" => Command::Down(position()?),
        "s" | "save" => Command::Save,
        "c" | "cancel" => Command::Cancel,
        "?" | "h" | "help" => Command::Help,
        "q" | "quit" => Command::Quit,
        _ => return None,
    };

    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

/// Run the interactive tournament until it completes or the user quits.
///
/// Moves typed during a search are staged on a copy of the ranking and handed
/// to the engine in one `reorder_by_ids` call on `s`, so a batch of edits
/// restarts the search once. Once every item is placed the user can keep
/// adjusting the ranking directly before it is printed.
///
/// EOF on `input` counts as quitting.
pub fn run_session<R: BufRead, W: Write>(
    engine: &mut RankingEngine,
    mut input: R,
    out: &mut W,
    label_width: usize,
) -> io::Result<SessionEnd> {
    if engine.is_complete() {
        return Ok(SessionEnd::Finished);
    }

    writeln!(out, "{HELP}\n")?;

    let mut staged: Option<Vec<Item>> = None;
    while let Some(request) = current_request(engine) {
        if staged.is_none() {
            writeln!(out, "{}", engine.progress())?;
            write_comparison(out, &request, engine.candidate_comparisons() + 1, label_width)?;
        } else {
            writeln!(out, "Unsaved moves. s to save, c to discard.")?;
        }

        let command = loop {
            let Some(line) = prompt(&mut input, out)? else {
                writeln!(out)?;
                return Ok(SessionEnd::Aborted);
            };
            match parse_command(&line) {
                Some(cmd) => break cmd,
                None => writeln!(out, "Unrecognized input. Type ? for help.")?,
            }
        };

        match command {
            Command::CandidateWins | Command::OpponentWins if staged.is_some() => {
                writeln!(out, "Save (s) or discard (c) your moves before answering.")?;
            }
            Command::CandidateWins | Command::OpponentWins => {
                let candidate_wins = command == Command::CandidateWins;
                if let Err(e) = engine.record_decision(candidate_wins) {
                    // Only reachable if the loop above got out of sync with the engine.
                    return Err(io::Error::other(e));
                }
            }
            Command::List => {
                let order = staged.as_deref().unwrap_or(engine.ranking());
                write_items(out, order, label_width)?;
            }
            Command::Move { .. } | Command::Up(_) | Command::Down(_) => {
                let order = staged.as_deref().unwrap_or(engine.ranking());
                match stage_move(order, &command) {
                    Ok(next) => {
                        staged = Some(next);
                        writeln!(out, "Move staged.")?;
                    }
                    Err(e) => report_rejected(out, &e)?,
                }
            }
            Command::Save => match staged.take() {
                Some(order) => {
                    let ids: Vec<i64> = order.iter().map(|item| item.id).collect();
                    apply_override(out, engine.reorder_by_ids(&ids))?;
                }
                None => writeln!(out, "No moves to save.")?,
            },
            Command::Cancel => match staged.take() {
                Some(_) => writeln!(out, "Moves discarded.")?,
                None => writeln!(out, "No moves to discard.")?,
            },
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(SessionEnd::Aborted),
        }
        writeln!(out)?;
    }

    edit_final_ranking(engine, &mut input, out, label_width)
}

/// Post-tournament edits. Each move goes straight to the engine since there
/// is no search left to restart.
fn edit_final_ranking<R: BufRead, W: Write>(
    engine: &mut RankingEngine,
    input: &mut R,
    out: &mut W,
    label_width: usize,
) -> io::Result<SessionEnd> {
    writeln!(out, "{DONE_HELP}")?;
    loop {
        let Some(line) = prompt(input, out)? else {
            writeln!(out)?;
            return Ok(SessionEnd::Finished);
        };
        if line.trim().is_empty() {
            return Ok(SessionEnd::Finished);
        }

        match parse_command(&line) {
            Some(Command::List) => write_items(out, engine.ranking(), label_width)?,
            Some(Command::Move { from, to }) => apply_override(out, engine.move_element(from - 1, to - 1))?,
            Some(Command::Up(n)) => apply_override(out, engine.move_up(n - 1))?,
            Some(Command::Down(n)) => apply_override(out, engine.move_down(n - 1))?,
            Some(Command::Help) => writeln!(out, "{DONE_HELP}")?,
            Some(Command::Quit) => return Ok(SessionEnd::Finished),
            Some(Command::CandidateWins | Command::OpponentWins | Command::Save | Command::Cancel) => {
                writeln!(out, "No comparison pending. Moves apply immediately now.")?;
            }
            None => writeln!(out, "Unrecognized input. Type ? for help.")?,
        }
    }
}

/// Print the prompt and read one line. `None` on EOF.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<String>> {
    write!(out, "> ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Apply one move command to a staged order. Up/down are no-ops at the ends,
/// matching the engine's swaps.
fn stage_move(order: &[Item], command: &Command) -> Result<Vec<Item>, RankError> {
    let len = order.len();
    let in_range = |index: usize| {
        if index < len {
            Ok(index)
        } else {
            Err(RankError::IndexOutOfRange { index, len })
        }
    };

    match *command {
        Command::Move { from, to } => moved(order, from - 1, to - 1),
        Command::Up(n) => {
            let index = in_range(n - 1)?;
            moved(order, index, index.saturating_sub(1))
        }
        Command::Down(n) => {
            let index = in_range(n - 1)?;
            moved(order, index, (index + 1).min(len - 1))
        }
        _ => Ok(order.to_vec()),
    }
}

/// The comparison to show next, (re)starting the search when an override
/// discarded the previous window.
fn current_request(engine: &mut RankingEngine) -> Option<ComparisonRequest> {
    match engine.state() {
        EngineState::Comparing => engine.pending(),
        EngineState::Seeded => engine.start_insertion().ok(),
        EngineState::Complete => None,
    }
}

fn write_comparison<W: Write>(
    out: &mut W,
    req: &ComparisonRequest,
    question: usize,
    label_width: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "Compare (question {question} for this item):\n  [1] NEW     {}\n  [2] #{:<6} {}",
        truncate_label(&req.candidate.title, label_width),
        req.opponent_rank + 1,
        truncate_label(&req.opponent.title, label_width),
    )
}

fn write_items<W: Write>(out: &mut W, order: &[Item], label_width: usize) -> io::Result<()> {
    for (i, item) in order.iter().enumerate() {
        writeln!(out, "{:>4}. {}", i + 1, truncate_label(&item.title, label_width))?;
    }
    Ok(())
}

fn apply_override<W: Write>(out: &mut W, result: Result<(), RankError>) -> io::Result<()> {
    match result {
        Ok(()) => writeln!(out, "Ranking updated."),
        Err(e) => report_rejected(out, &e),
    }
}

fn report_rejected<W: Write>(out: &mut W, e: &RankError) -> io::Result<()> {
    tracing::debug!("override rejected: {e}");
    writeln!(out, "Cannot reorder: {e}")
}
