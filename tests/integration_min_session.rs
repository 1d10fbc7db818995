// Drives the built `clack` binary inside a pseudo terminal: a short test is
// started by typing and then abandoned with Esc. Needs a tty, so it only runs
// on unix and only when asked for:
//
//   cargo test --test integration_min_session -- --ignored

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn typing_starts_a_test_and_esc_quits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("clack");
    let cmd = format!("{} -s 15 --initial-words 5", bin.display());

    let mut p = spawn(cmd)?;

    // let raw mode and the alternate screen settle
    std::thread::sleep(Duration::from_millis(200));

    // A few keystrokes start the countdown
    p.send("abc")?;
    std::thread::sleep(Duration::from_millis(200));

    // Esc quits in every phase
    p.send("\x1b")?;

    p.expect(Eof)?;
    Ok(())
}
