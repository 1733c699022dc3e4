//! End-to-end scenarios driven through the public engine API.

use std::time::Duration;

use brickfall_engine::{
    ActivePiece, Board, Difficulty, Engine, EngineConfig, EngineEvent, Phase, ShapeSequence,
};

fn engine_on(board: &[&str], shapes: &str) -> Engine<ShapeSequence> {
    let board = Board::from_rows(board).unwrap();
    Engine::from_parts(EngineConfig::default(), board, shapes.parse().unwrap()).unwrap()
}

/// Moves the active piece to column `x`, waiting out the repeat delay between steps.
fn walk_to(engine: &mut Engine<ShapeSequence>, x: i32) {
    let step = engine.config().move_repeat_delay;
    while let Some(piece) = engine.active_piece().copied() {
        let moved = match piece.x().cmp(&x) {
            std::cmp::Ordering::Less => engine.move_right(),
            std::cmp::Ordering::Greater => engine.move_left(),
            std::cmp::Ordering::Equal => return,
        };
        assert!(moved, "blocked at x={}", piece.x());
        assert_eq!(engine.tick(step), EngineEvent::NoOp);
    }
}

#[test]
fn o_piece_in_corner_clears_nothing() {
    let mut engine = engine_on(&[], "O");
    walk_to(&mut engine, 0);
    assert!(engine.hard_drop());

    let board = engine.board();
    for (x, y) in [(0, 18), (1, 18), (0, 19), (1, 19)] {
        assert!(board.is_filled(x, y));
    }
    assert_eq!(board.filled_cell_count(), 4);
    assert_eq!(engine.stats().score(), 0);
    assert_eq!(engine.stats().total_cleared_lines(), 0);
}

#[test]
fn upright_i_fills_hole_and_clears_bottom_row() {
    let mut engine = engine_on(&["#########."], "I");
    assert!(engine.rotate());
    walk_to(&mut engine, 9);
    let level = engine.stats().level();

    // Let gravity land and lock it instead of hard dropping.
    let mut event = EngineEvent::NoOp;
    for _ in 0..40 {
        event = engine.tick(Duration::from_millis(300));
        if !event.is_no_op() {
            break;
        }
    }
    assert_eq!(event, EngineEvent::PieceLocked { lines_cleared: 1 });
    assert_eq!(engine.stats().score(), 100 * u64::from(level));

    // The three I cells above the cleared row shift down one row.
    let board = engine.board();
    assert_eq!(board.filled_cell_count(), 3);
    for y in 17..20 {
        assert!(board.is_filled(9, y));
    }
}

#[test]
fn blocked_spawn_is_game_over_without_ticks() {
    let engine = engine_on(&["....##...."], "O");
    assert!(!engine.is_game_over());

    let mut rows = vec!["#########."; 19];
    rows.insert(0, ".....#....");
    let mut engine = engine_on(&rows, "T");
    assert_eq!(engine.phase(), Phase::GameOver);
    let snapshot = engine.snapshot();
    assert!(snapshot.game_over);
    assert!(snapshot.active_piece.is_none());
    assert_eq!(snapshot.pieces, 0);
    assert_eq!(engine.tick(Duration::from_millis(1)), EngineEvent::GameOver);
}

#[test]
fn two_complete_rows_clear_together() {
    // Rows 18 and 19 are complete except columns 4-5, which an O fills.
    let mut engine = engine_on(&["#.#.......", "####..####", "####..####"], "O");
    assert!(engine.hard_drop());

    let board = engine.board();
    assert_eq!(engine.stats().total_cleared_lines(), 2);
    assert_eq!(engine.stats().line_cleared_counter()[2], 1);
    assert_eq!(engine.stats().score(), 200);
    // Row 17 moved to the bottom, two empty rows came in on top.
    assert!(board.is_filled(0, 19));
    assert!(board.is_filled(2, 19));
    assert_eq!(board.filled_cell_count(), 2);
    assert!(board.row(0).unwrap().is_empty());
    assert!(board.row(1).unwrap().is_empty());
}

#[test]
fn non_adjacent_rows_clear_in_one_lock() {
    // An upright I at column 9 completes rows 16 and 18 but not 17 or 19.
    let mut engine = engine_on(
        &["#########.", "#####.....", "#########.", ".........."],
        "I",
    );
    assert!(engine.rotate());
    walk_to(&mut engine, 9);
    assert!(engine.hard_drop());
    assert_eq!(engine.stats().total_cleared_lines(), 2);

    let board = engine.board();
    // Old row 17 sits at 18 with the I cell beside it; old row 19 is untouched.
    assert_eq!(board.filled_cell_count(), 5 + 1 + 1);
    assert!(board.is_filled(4, 18));
    assert!(board.is_filled(9, 18));
    assert!(board.is_filled(9, 19));
}

#[test]
fn soft_drop_follows_base_interval() {
    for difficulty in Difficulty::ALL {
        let config = EngineConfig::new(difficulty);
        let mut engine =
            Engine::with_shape_source(config, "O".parse::<ShapeSequence>().unwrap()).unwrap();
        assert_eq!(engine.fall_interval(), difficulty.base_interval());
        engine.set_soft_drop(true);
        assert_eq!(engine.fall_interval(), difficulty.base_interval() / 5);
    }
}

#[test]
fn level_up_speeds_up_gravity() {
    let mut engine = engine_on(&[], "O");
    // Five O pieces side by side complete rows 18 and 19: 200 points per round.
    for round in 0..10 {
        assert_eq!(engine.stats().level(), 1, "round {round}");
        for x in [0, 2, 4, 6, 8] {
            walk_to(&mut engine, x);
            assert!(engine.hard_drop());
        }
        assert!(engine.board().rows().all(|row| row.is_empty()));
    }

    assert_eq!(engine.stats().score(), 2000);
    assert_eq!(engine.stats().level(), 2);
    assert_eq!(engine.stats().total_cleared_lines(), 20);
    assert_eq!(engine.fall_interval(), Duration::from_millis(270));
    engine.set_soft_drop(true);
    assert_eq!(engine.fall_interval(), Duration::from_millis(60));
}

#[test]
fn ghost_piece_tracks_landing_row() {
    let engine = engine_on(&["..........", "....####.."], "T");
    let ghost = engine.drop_position().unwrap();
    let active: ActivePiece = *engine.active_piece().unwrap();
    assert_eq!(ghost.x(), active.x());
    assert_eq!(ghost.y(), 17);
    assert_eq!(engine.snapshot().ghost_piece, Some(ghost));
}
