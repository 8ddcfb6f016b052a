//! Line-driven front end for one mounted module.
//!
//! Meta commands start with `:` so they never collide with answers or typed
//! text: `:help`, `:next`, `:retry`, `:quit`.

use anyhow::{Context, Result};
use maximus_common::Choice;
use maximus_shared::blocks::CodeBlock;
use maximus_shared::{LedgerSnapshot, Notice, NoticeLevel, CURRENCY_NAME, TIER_NAME};
use std::convert::Infallible;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::canvas::Point;
use crate::modules::{
    CodeAction, CodingStrategy, DrawAction, DrawingStrategy, KindnessStrategy, MathStrategy,
    ReadingStrategy, TypingStrategy,
};
use crate::session::{ModuleStrategy, SessionController, SessionState};

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<I, A> {
    Submit(I),
    Act(A),
    Next,
    Retry,
    Help,
    Quit,
}

/// Strategies the shell knows how to drive
pub trait Playable: ModuleStrategy {
    /// What to show for the current challenge
    fn prompt(challenge: &Self::Challenge) -> String;

    /// Module-specific help text
    fn help() -> &'static str;

    /// Parse a non-meta line
    fn parse(line: &str) -> Result<Command<Self::Input, Self::Action>, String>;
}

/// `V-Bucks: N | Tier T | P/100`, flagged once the next tier is close
pub fn status_line(snapshot: &LedgerSnapshot) -> String {
    let line = format!(
        "{}: {} | {} {} | {}/{}",
        CURRENCY_NAME,
        snapshot.total,
        TIER_NAME,
        snapshot.tier,
        snapshot.progress_in_tier,
        snapshot.tier_size
    );
    if snapshot.near_next_tier() {
        format!("{} | Almost there!", line)
    } else {
        line
    }
}

pub fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "*",
        NoticeLevel::Success => "+",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "x",
    };
    format!("[{}] {}", tag, notice)
}

fn parse_meta<I, A>(line: &str) -> Option<Result<Command<I, A>, String>> {
    let meta = line.trim().strip_prefix(':')?;
    Some(match meta.trim().to_lowercase().as_str() {
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "h" | "help" => Ok(Command::Help),
        "n" | "next" => Ok(Command::Next),
        "r" | "retry" => Ok(Command::Retry),
        other => Err(format!("unknown command :{}", other)),
    })
}

fn parse_point(x: Option<&str>, y: Option<&str>) -> Result<Point, String> {
    let coord = |v: Option<&str>| -> Result<i32, String> {
        v.ok_or_else(|| "expected x and y".to_string())?
            .parse::<i32>()
            .map_err(|e| format!("bad coordinate: {}", e))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

/// Drive a session from `input` until `:quit` or end of input
pub async fn play<S, R, W>(
    controller: &mut SessionController<S>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    S: Playable,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", controller.strategy().kind().title())?;
    if let Err(e) = controller.start().await {
        writeln!(out, "{}", e)?;
    }
    flush_notices(controller, out)?;
    show(controller, out)?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let command = match parse_meta(&line).unwrap_or_else(|| S::parse(&line)) {
            Ok(command) => command,
            Err(e) => {
                if !e.is_empty() {
                    writeln!(out, "{}", e)?;
                }
                continue;
            }
        };

        let result = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{}", S::help())?;
                writeln!(out, ":next  new challenge   :retry  reload   :quit  leave")?;
                continue;
            }
            Command::Next => controller.next().await,
            Command::Retry => controller.retry().await,
            Command::Submit(value) => controller.submit(value).await.map(|_| ()),
            Command::Act(action) => controller.act(action).map(|_| ()),
        };

        match result {
            Ok(()) => {}
            Err(e) if e.is_silent() => {}
            Err(e) => writeln!(out, "{}", e)?,
        }
        flush_notices(controller, out)?;
        show(controller, out)?;
    }

    writeln!(
        out,
        "Rounds completed: {}. {}",
        controller.rounds_completed(),
        status_line(&controller.ledger().snapshot())
    )?;
    Ok(())
}

fn flush_notices<S: ModuleStrategy, W: Write>(
    controller: &mut SessionController<S>,
    out: &mut W,
) -> Result<()> {
    for notice in controller.drain_notices() {
        writeln!(out, "{}", format_notice(&notice))?;
    }
    Ok(())
}

fn show<S: Playable, W: Write>(controller: &SessionController<S>, out: &mut W) -> Result<()> {
    match (controller.state(), controller.challenge()) {
        (SessionState::Active, Some(challenge)) => writeln!(out, "{}", S::prompt(challenge))?,
        (SessionState::Unavailable, _) => writeln!(out, "Nothing to play right now. Try :retry")?,
        _ => {}
    }
    writeln!(out, "{}", status_line(&controller.ledger().snapshot()))?;
    out.flush()?;
    Ok(())
}

impl Playable for MathStrategy {
    fn prompt(problem: &Self::Challenge) -> String {
        problem.text.clone()
    }

    fn help() -> &'static str {
        "Type the answer and press Enter."
    }

    fn parse(line: &str) -> Result<Command<String, Infallible>, String> {
        Ok(Command::Submit(line.to_string()))
    }
}

impl Playable for ReadingStrategy {
    fn prompt(passage: &Self::Challenge) -> String {
        format!("Level {}: {}\n(press Enter when you finish reading)", passage.level, passage.text)
    }

    fn help() -> &'static str {
        "Read the story, then press Enter. Faster reading earns more."
    }

    fn parse(_line: &str) -> Result<Command<(), Infallible>, String> {
        Ok(Command::Submit(()))
    }
}

impl Playable for TypingStrategy {
    fn prompt(challenge: &Self::Challenge) -> String {
        format!("Type this: {}", challenge.text)
    }

    fn help() -> &'static str {
        "Copy the text as fast and as exactly as you can, then press Enter."
    }

    fn parse(line: &str) -> Result<Command<String, Infallible>, String> {
        Ok(Command::Submit(line.to_string()))
    }
}

impl Playable for KindnessStrategy {
    fn prompt(scenario: &Self::Challenge) -> String {
        format!(
            "{}\n  A) {}\n  B) {}",
            scenario.scenario_text, scenario.choice_a, scenario.choice_b
        )
    }

    fn help() -> &'static str {
        "Pick A or B. Use :next for a new scenario once you have answered."
    }

    fn parse(line: &str) -> Result<Command<Choice, Infallible>, String> {
        match line.trim().to_uppercase().as_str() {
            "A" => Ok(Command::Submit(Choice::A)),
            "B" => Ok(Command::Submit(Choice::B)),
            "" => Err("pick A or B".to_string()),
            other => Err(format!("{} is not a choice, pick A or B", other)),
        }
    }
}

impl Playable for DrawingStrategy {
    fn prompt(board: &Self::Challenge) -> String {
        format!(
            "Canvas {}x{} | color {} | brush {} | strokes {}",
            board.canvas.width(),
            board.canvas.height(),
            board.canvas.color(),
            board.canvas.brush_size(),
            board.strokes
        )
    }

    fn help() -> &'static str {
        "down X Y | move X Y | up | color NAME | brush SIZE | clear | save"
    }

    fn parse(line: &str) -> Result<Command<Infallible, DrawAction>, String> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or("").to_lowercase();
        let action = match verb.as_str() {
            "down" => DrawAction::PointerDown(parse_point(words.next(), words.next())?),
            "move" => DrawAction::PointerMove(parse_point(words.next(), words.next())?),
            "up" => DrawAction::PointerUp,
            "color" => DrawAction::SelectColor(
                words
                    .next()
                    .ok_or_else(|| "expected a color name".to_string())?
                    .to_string(),
            ),
            "brush" => DrawAction::SelectBrush(
                words
                    .next()
                    .ok_or_else(|| "expected a brush size".to_string())?
                    .parse()
                    .map_err(|e| format!("bad brush size: {}", e))?,
            ),
            "clear" => DrawAction::Clear,
            "save" => DrawAction::Save,
            "" => return Err(String::new()),
            other => return Err(format!("unknown drawing command: {}", other)),
        };
        Ok(Command::Act(action))
    }
}

impl Playable for CodingStrategy {
    fn prompt(workspace: &Self::Challenge) -> String {
        let blocks: Vec<&str> = workspace.program.blocks.iter().map(|b| b.name()).collect();
        format!(
            "Program: [{}] | character at ({}, {})",
            blocks.join(", "),
            workspace.position.x,
            workspace.position.y
        )
    }

    fn help() -> &'static str {
        "add BLOCK (moveForward, turnLeft, turnRight, repeat2, onStart) | clear | run"
    }

    fn parse(line: &str) -> Result<Command<Infallible, CodeAction>, String> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let action = match verb.to_lowercase().as_str() {
            "add" => CodeAction::AddBlock(
                rest.parse::<CodeBlock>().map_err(|e| e.to_string())?,
            ),
            "clear" => CodeAction::Clear,
            "run" => CodeAction::Run,
            "" => return Err(String::new()),
            other => return Err(format!("unknown coding command: {}", other)),
        };
        Ok(Command::Act(action))
    }
}
