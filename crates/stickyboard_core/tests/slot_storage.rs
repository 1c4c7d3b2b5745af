use rusqlite::Connection;
use serde_json::json;
use stickyboard_core::db::open_db_in_memory;
use stickyboard_core::{
    BoardConfig, BoundingRect, Note, NoteId, NoteKey, NoteSlot, PointerButton, PointerDown,
    PointerPosition, PointerTarget, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
    StickyBoard, MIN_NOTE_WIDTH, STORAGE_KEY,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

fn note(id: &str, z_index: i64) -> Note {
    Note {
        id: NoteId::from(id),
        x: 10.0,
        y: 20.0,
        width: 140.0,
        height: 120.0,
        text: format!("text {id}"),
        color: "#fff59a".to_string(),
        z_index,
    }
}

/// In-memory slot store whose writes can be switched to fail.
#[derive(Default)]
struct FlakySlots {
    slots: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    writes: Cell<u32>,
}

impl SlotRepository for FlakySlots {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::SchemaNotReady("kv_slots"));
        }
        self.writes.set(self.writes.get() + 1);
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_slot(&self, key: &str) -> RepoResult<bool> {
        Ok(self.slots.borrow_mut().remove(key).is_some())
    }
}

#[test]
fn sqlite_slot_read_write_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::try_new(&conn).unwrap();

    assert_eq!(repo.read_slot("board").unwrap(), None);
    repo.write_slot("board", "[1]").unwrap();
    repo.write_slot("board", "[1,2]").unwrap();
    assert_eq!(repo.read_slot("board").unwrap().as_deref(), Some("[1,2]"));

    assert!(repo.delete_slot("board").unwrap());
    assert!(!repo.delete_slot("board").unwrap());
    assert_eq!(repo.read_slot("board").unwrap(), None);
}

#[test]
fn sqlite_slot_requires_migrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteSlotRepository::try_new(&conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(err, RepoError::SchemaNotReady("kv_slots")));
}

#[test]
fn note_slot_round_trips_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::try_new(&conn).unwrap();
    let mut slot = NoteSlot::new(&repo, STORAGE_KEY);

    let notes = vec![note("a", 1), note("b", 2)];
    slot.stage(&notes).unwrap();
    assert!(slot.flush().unwrap());
    assert!(!slot.flush().unwrap());

    assert_eq!(slot.load().unwrap(), notes);

    let raw = repo.read_slot(STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["zIndex"], 1);
    assert_eq!(value[1]["text"], "text b");
}

#[test]
fn absent_and_undecodable_slots_load_empty() {
    let repo = FlakySlots::default();
    let slot = NoteSlot::new(&repo, "board");
    assert!(slot.load().unwrap().is_empty());

    repo.write_slot("board", "{not json").unwrap();
    assert!(slot.load().unwrap().is_empty());

    repo.write_slot("board", r#"{"notes": []}"#).unwrap();
    assert!(slot.load().unwrap().is_empty());
}

#[test]
fn malformed_entries_are_dropped_on_load() {
    let repo = FlakySlots::default();
    let stored = json!([
        {"id": "keep", "x": 0, "y": 0, "width": 140, "height": 120, "text": "", "color": "#a8dadc", "zIndex": 3},
        {"id": 7, "x": 0, "y": 0, "width": 140, "height": 120, "text": "", "color": "#a8dadc", "zIndex": 4},
        {"id": "also-keep", "x": 1, "y": 1, "width": 150, "height": 130, "text": "x", "color": "#cdb4db", "zIndex": 5}
    ]);
    repo.write_slot("board", &stored.to_string()).unwrap();

    let notes = NoteSlot::new(&repo, "board").load().unwrap();
    let ids: Vec<&str> = notes.iter().map(|note| note.id.as_str()).collect();
    assert_eq!(ids, vec!["keep", "also-keep"]);
}

#[test]
fn staging_rejects_invalid_geometry() {
    let repo = FlakySlots::default();
    let mut slot = NoteSlot::new(&repo, "board");
    let mut bad = note("bad", 1);
    bad.width = f64::INFINITY;

    let err = slot.stage(&[bad]).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(!slot.has_pending());
}

#[test]
fn failed_flush_keeps_latest_snapshot_queued() {
    let repo = FlakySlots::default();
    let mut slot = NoteSlot::new(&repo, "board");

    slot.stage(&[note("a", 1)]).unwrap();
    slot.stage(&[note("a", 1), note("b", 2)]).unwrap();
    assert_eq!(slot.coalesced_writes(), 1);

    repo.fail_writes.set(true);
    assert!(slot.flush().is_err());
    assert!(slot.has_pending());

    repo.fail_writes.set(false);
    assert!(slot.flush().unwrap());
    assert_eq!(repo.writes.get(), 1);
    assert_eq!(slot.load().unwrap().len(), 2);
}

#[test]
fn negative_sizes_are_repaired_on_load() {
    let repo = FlakySlots::default();
    let stored = json!([
        {"id": "old", "x": 5, "y": 5, "width": -5, "height": 130, "text": "", "color": "#a8dadc", "zIndex": 1}
    ]);
    repo.write_slot("board", &stored.to_string()).unwrap();

    let notes = NoteSlot::new(&repo, "board").load().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].width, MIN_NOTE_WIDTH);
    assert_eq!(notes[0].height, 130.0);
}

#[test]
fn board_keeps_saving_after_loading_negative_size() {
    let conn = open_db_in_memory().unwrap();
    let stored = json!([
        {"id": "old", "x": 5, "y": 5, "width": -5, "height": 130, "text": "", "color": "#a8dadc", "zIndex": 1}
    ]);
    SqliteSlotRepository::try_new(&conn)
        .unwrap()
        .write_slot(STORAGE_KEY, &stored.to_string())
        .unwrap();

    let config = BoardConfig::default();
    {
        let repo = SqliteSlotRepository::try_new(&conn).unwrap();
        let mut board = StickyBoard::open(repo, &config).unwrap();
        board.set_board_rect(Some(BoundingRect::new(0.0, 0.0, 800.0, 600.0)));

        assert!(board.start_create(PointerDown {
            button: PointerButton::Primary,
            target: PointerTarget::Canvas,
            client_x: 300.0,
            client_y: 300.0,
        }));
        let created = board
            .pointer_up(PointerPosition {
                client_x: 500.0,
                client_y: 500.0,
            })
            .unwrap();
        board.update_text(&created, "fresh");
        board.update_text(&NoteId::from("old"), "edited");
        assert!(!board.has_pending_writes());
    }

    let repo = SqliteSlotRepository::try_new(&conn).unwrap();
    let reopened = StickyBoard::open(repo, &config).unwrap();
    assert_eq!(reopened.notes().len(), 2);

    let old = reopened.note(&NoteId::from("old")).unwrap();
    assert_eq!(old.text, "edited");
    assert_eq!(old.width, MIN_NOTE_WIDTH);
    assert!(reopened.notes().iter().any(|note| note.text == "fresh"));
}

#[test]
fn out_of_range_z_index_does_not_break_bring_to_front() {
    let repo = FlakySlots::default();
    let stored = json!([
        {"id": "a", "x": 0, "y": 0, "width": 140, "height": 120, "text": "", "color": "#a8dadc", "zIndex": 1e300},
        {"id": "b", "x": 0, "y": 0, "width": 140, "height": 120, "text": "", "color": "#a8dadc", "zIndex": 3}
    ]);
    repo.write_slot(STORAGE_KEY, &stored.to_string()).unwrap();

    let mut board = StickyBoard::open(&repo, &BoardConfig::default()).unwrap();
    assert_eq!(board.notes().len(), 1);

    board.start_move(NoteKey {
        note_id: NoteId::from("b"),
    });
    let b = board.note(&NoteId::from("b")).unwrap();
    assert_eq!(b.z_index, 4);
}
