use std::sync::mpsc;
use std::time::{Duration, Instant};

use clack::config::Config;
use clack::language::Language;
use clack::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use clack::session::SessionConfig;
use clack::viewport::ScrollAdapter;
use clack::{Change, Phase, SessionDuration, SessionObserver, TypingTest};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn new_test(duration: SessionDuration) -> TypingTest {
    let config = Config {
        duration,
        ..Config::default()
    };
    TypingTest::new(
        Language::builtin("english").unwrap(),
        SessionConfig::from(&config),
    )
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the internal runtime + TypingTest without a TTY.
// A short tick interval stands in for the one second countdown.
#[test]
fn headless_timed_session_runs_to_completion() {
    let mut test = new_test(SessionDuration::Fifteen);
    let mut scroll = ScrollAdapter::default();

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(20));
    let mut runner = Runner::new(es, ticker);

    // Producer: the first word, typed correctly
    let first_word: Vec<char> = test
        .sequence()
        .chars()
        .iter()
        .copied()
        .take_while(|c| *c != ' ')
        .collect();
    for c in &first_word {
        tx.send(key(*c)).unwrap();
    }

    let mut finished = None;
    for _ in 0..1000u32 {
        match runner.step(scroll.deadline()) {
            AppEvent::Tick => {
                test.tick();
            }
            AppEvent::Key(k) => {
                if let KeyCode::Char(c) = k.code {
                    test.forward_keystroke(c);
                }
            }
            AppEvent::Resize | AppEvent::Wake => {}
        }

        let now = Instant::now();
        for change in test.take_changes() {
            scroll.on_change(&change, now);
            match change {
                Change::Started => runner.restart_ticks(now),
                Change::Finished(m) => finished = Some(m),
                _ => {}
            }
        }
        scroll.poll(now, test.sequence(), test.state().cursor, 70);

        if finished.is_some() {
            break;
        }
    }

    let metrics = finished.expect("session should end once the countdown runs out");
    assert_eq!(test.phase(), Phase::Over);
    assert_eq!(metrics.time_left, 0);
    assert_eq!(metrics.accuracy, 100);
    let typed = test.state().cursor;
    assert!(typed > 0 && typed <= first_word.len());
    assert_eq!(metrics.cpm, (typed as f64 * 60.0 / 15.0).round() as u32);
}

#[test]
fn headless_keystrokes_after_over_are_ignored() {
    let mut test = new_test(SessionDuration::Fifteen);
    test.start();
    for _ in 0..15 {
        test.tick();
    }
    assert!(test.status().is_over);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_secs(5)),
    );
    tx.send(key('a')).unwrap();
    tx.send(AppEvent::Key(KeyEvent::new(
        KeyCode::Backspace,
        KeyModifiers::NONE,
    )))
    .unwrap();

    for _ in 0..2 {
        if let AppEvent::Key(k) = runner.step(None) {
            match k.code {
                KeyCode::Char(c) => test.forward_keystroke(c),
                KeyCode::Backspace => test.backspace(),
                _ => {}
            }
        }
    }

    assert_eq!(test.state().typed_chars, 0);
    assert_eq!(test.state().cursor, 0);
}

#[test]
fn headless_reset_cycle() {
    let mut test = new_test(SessionDuration::Thirty);
    test.forward_keystroke('#');
    test.force_over();
    test.take_changes();

    assert!(test.reset(SessionDuration::OneTwenty));
    assert_eq!(test.take_changes(), vec![Change::Reset]);
    assert_eq!(test.metrics().time_left, 120);
    assert_eq!(test.metrics().accuracy, 100);
}
