use clap::ValueEnum;
use rand::Rng;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::warn;

use crate::passages::{Difficulty, TextProvider};
use crate::recital::Transition;
use crate::session::{Session, SessionSnapshot};

/// One line of headless input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Transcript(String),
    Reset,
    Next,
    Listen(bool),
    Difficulty(Difficulty),
}

impl Command {
    /// Lines starting with `:` are control commands, anything else is a
    /// transcript update.
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Transcript(line.to_string()));
        };
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (name, arg) {
            ("reset", None) => Ok(Command::Reset),
            ("next", None) => Ok(Command::Next),
            ("listen", Some("on")) => Ok(Command::Listen(true)),
            ("listen", Some("off")) => Ok(Command::Listen(false)),
            ("difficulty", Some(level)) => Difficulty::from_str(level, true).map(Command::Difficulty),
            _ => Err(format!("unknown command: {line}")),
        }
    }
}

/// Output line: the snapshot after the command, plus what it changed.
#[derive(Debug, Serialize)]
pub struct Frame<'a> {
    pub listening: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<&'a Transition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

/// Drive a session from line-oriented input, writing one JSON frame per line.
pub fn run_headless<P, R, I, O>(session: &mut Session<P, R>, input: I, mut output: O) -> io::Result<()>
where
    P: TextProvider,
    R: Rng,
    I: BufRead,
    O: Write,
{
    let mut listening = true;

    for line in input.lines() {
        let line = line?;
        let now = Instant::now();
        session.tick(now);

        let mut transition = None;
        let mut error = None;
        match Command::parse(&line) {
            Ok(Command::Transcript(text)) => {
                transition = session.apply_transcript(&text, listening, now);
            }
            Ok(Command::Reset) => session.reset(),
            Ok(Command::Next) => session.advance_reference(),
            Ok(Command::Listen(on)) => listening = on,
            Ok(Command::Difficulty(level)) => session.set_difficulty(level),
            Err(err) => {
                warn!(%err, "Skipping headless input");
                error = Some(err);
            }
        }

        let frame = Frame {
            listening,
            transition: transition.as_ref(),
            error: error.as_deref(),
            snapshot: session.snapshot(),
        };
        serde_json::to_writer(&mut output, &frame)?;
        writeln!(output)?;
    }

    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confusion::ConfusionTable;
    use crate::passages::SinglePassage;
    use crate::session::SessionConfig;
    use serde_json::Value;

    fn frames(text: &str, input: &str) -> Vec<Value> {
        let mut session = Session::new(
            SinglePassage::new(text),
            SessionConfig::default(),
            ConfusionTable::for_locale("english").unwrap(),
        );
        let mut out = Vec::new();
        run_headless(&mut session, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("the cat"), Ok(Command::Transcript("the cat".into())));
        assert_eq!(Command::parse(":reset"), Ok(Command::Reset));
        assert_eq!(Command::parse(":next"), Ok(Command::Next));
        assert_eq!(Command::parse(":listen off"), Ok(Command::Listen(false)));
        assert_eq!(
            Command::parse(":difficulty Hard"),
            Ok(Command::Difficulty(Difficulty::Hard))
        );
        assert!(Command::parse(":listen maybe").is_err());
        assert!(Command::parse(":bogus").is_err());
    }

    #[test]
    fn one_frame_per_line() {
        let out = frames("Hello, world.", "hello\nhello\nhello world\n");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["transition"]["outcome"], "correct");
        assert_eq!(out[0]["tokens"][1]["status"], "correct");
        // repeated transcript has no transition
        assert!(out[1].get("transition").is_none());
        assert_eq!(out[2]["finished"], true);
        assert_eq!(out[2]["progress"], 1.0);
    }

    #[test]
    fn muted_updates_are_ignored() {
        let out = frames("cat", ":listen off\ncat\n:listen on\ncat\n");
        assert_eq!(out[1]["listening"], false);
        assert!(out[1].get("transition").is_none());
        assert_eq!(out[3]["transition"]["outcome"], "correct");
    }

    #[test]
    fn bad_command_reports_error() {
        let out = frames("cat", ":jump\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["error"], "unknown command: :jump");
    }

    #[test]
    fn reset_command() {
        let out = frames("a b", "a\n:reset\n");
        assert_eq!(out[1]["cursor"], 0);
        assert_eq!(out[1]["streak"], 0);
    }
}
