use pretty_assertions::assert_eq;
use skyhop::session::{Session, SessionController, SessionStage};
use speculoos::prelude::*;

#[test]
fn test_new_session_waits_paused() {
    let session = Session::new();

    assert_eq!(session.stage(), SessionStage::Waiting);
    assert_that(&session.is_paused()).is_true();
    assert_that(&session.is_over()).is_false();
}

#[test]
fn test_start_only_leaves_waiting() {
    let mut session = Session::new();
    session.start();
    assert_eq!(session.stage(), SessionStage::Playing);

    session.on_game_over();
    session.start();
    assert_eq!(session.stage(), SessionStage::Over);
}

#[test]
fn test_toggle_pause() {
    let mut session = Session::new();
    session.toggle_pause();
    assert_eq!(session.stage(), SessionStage::Waiting);

    session.start();
    session.toggle_pause();
    assert_eq!(session.stage(), SessionStage::Paused);
    assert_that(&session.is_paused()).is_true();

    session.toggle_pause();
    assert_eq!(session.stage(), SessionStage::Playing);
    assert_that(&session.is_paused()).is_false();
}

#[test]
fn test_score_stops_at_game_over() {
    let mut session = Session::new();
    session.start();
    session.on_score();
    session.on_score();
    session.on_game_over();
    session.on_score();

    assert_that(&session.score()).is_equal_to(2);
    assert_that(&session.summary()).is_equal_to("Game Over\nScore: 2".to_string());
}

#[test]
fn test_game_over_is_idempotent() {
    let mut session = Session::new();
    session.start();
    session.on_game_over();
    session.on_game_over();

    assert_eq!(session.stage(), SessionStage::Over);
    assert_that(&session.is_paused()).is_false();
}

#[test]
fn test_restart_resets_score() {
    let mut session = Session::new();
    session.start();
    session.on_score();
    session.on_game_over();

    session.restart();
    assert_eq!(session.stage(), SessionStage::Playing);
    assert_that(&session.score()).is_equal_to(0);
    assert_that(&session.summary()).is_equal_to("Score: 0".to_string());
}
