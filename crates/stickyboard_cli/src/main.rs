//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `stickyboard_core` linkage and storage wiring without a UI.
//! - Replay one scripted create/move/trash session and print the outcome.
//!
//! Usage: `stickyboard_cli [DB_PATH] [CONFIG_JSON]`. Without `DB_PATH` the
//! board lives in memory. Set `STICKYBOARD_LOG_DIR` (absolute) to enable
//! file logging.

use stickyboard_core::db::{open_db, open_db_in_memory};
use stickyboard_core::{
    default_log_level, init_logging, BoardConfig, BoundingRect, MoveOutcome, NoteFrame, NoteKey,
    PointerButton, PointerDown, PointerPosition, PointerTarget, SqliteSlotRepository, StickyBoard,
};
use std::error::Error;
use std::process::ExitCode;

const BOARD: BoundingRect = BoundingRect {
    left: 0.0,
    top: 0.0,
    width: 800.0,
    height: 600.0,
};
const TRASH: BoundingRect = BoundingRect {
    left: 592.0,
    top: 536.0,
    width: 192.0,
    height: 48.0,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("stickyboard error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("STICKYBOARD_LOG_DIR") {
        init_logging(default_log_level(), log_dir)?;
    }

    let mut args = std::env::args().skip(1);
    let db_path = args.next();
    let config = match args.next() {
        Some(path) => BoardConfig::load(path)?,
        None => BoardConfig::default(),
    };

    let conn = match db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteSlotRepository::try_new(&conn)?;
    let mut board = StickyBoard::open(&repo, &config)?;
    board.set_board_rect(Some(BOARD));
    board.set_trash_rect(Some(TRASH));

    println!("stickyboard_core version={}", stickyboard_core::core_version());
    println!("loaded notes={}", board.notes().len());

    board.start_create(PointerDown {
        button: PointerButton::Primary,
        target: PointerTarget::Canvas,
        client_x: 40.0,
        client_y: 40.0,
    });
    let end = PointerPosition {
        client_x: 240.0,
        client_y: 220.0,
    };
    board.pointer_move(end);
    let Some(note_id) = board.pointer_up(end) else {
        println!("create skipped");
        return Ok(());
    };
    if let Some(note) = board.note(&note_id) {
        println!(
            "created note={} x={} y={} width={} height={} color={} z_index={}",
            note.id, note.x, note.y, note.width, note.height, note.color, note.z_index
        );
    }

    board.update_text(&note_id, "scripted note");
    board.start_move(NoteKey {
        note_id: note_id.clone(),
    });
    let (width, height) = board
        .note(&note_id)
        .map_or((0.0, 0.0), |note| (note.width, note.height));
    let outcome = board.stop_move(NoteFrame {
        note_id,
        x: TRASH.left,
        y: TRASH.top,
        width,
        height,
    });
    println!(
        "dropped on trash outcome={}",
        match outcome {
            MoveOutcome::Moved => "moved",
            MoveOutcome::Deleted => "deleted",
            MoveOutcome::Ignored => "ignored",
        }
    );

    board.flush()?;
    println!("stored notes={}", board.notes().len());
    Ok(())
}
