// Drives the compiled binary through a PTY so the real event loop and
// crossterm input handling are exercised end to end.
//
// Notes:
// - Requires a TTY; expectrl allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_recital_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("recite");
    let cmd = format!("{} -t hi", bin.display());

    let mut p = spawn(cmd)?;

    // let the alternate screen come up
    std::thread::sleep(Duration::from_millis(200));

    // a trailing space finishes the word
    p.send("hi ")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;
    Ok(())
}
