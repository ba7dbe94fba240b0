// Copyright (c) 2024 Mike Tsao. All rights reserved.

use ensnare_sonify::prelude::*;
use std::path::PathBuf;

/// A per-test scratch directory under the system temp dir.
fn scratch_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ensnare-sonify-{}-{test_name}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn save_midi_writes_one_tempo_and_one_note() {
    let dir = scratch_dir("save_midi");
    let path = save_midi(&[NoteEvent::new(60, 0.0, 1.0, 100)], dir.join("out"), 120.0).unwrap();
    assert_eq!(path, dir.join("out.mid"));
    assert!(path.exists());

    let decoded = load_midi(&path).unwrap();
    assert_eq!(decoded.tempo, Some(Tempo(120.0)));
    assert_eq!(decoded.notes, vec![NoteEvent::new(60, 0.0, 1.0, 100)]);
    assert!(decoded.control_changes.is_empty());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn save_midi_cc_appends_suffix_and_keeps_automation() {
    let dir = scratch_dir("save_midi_cc");
    let notes = [
        NoteEvent::new(48, 0.0, 4.0, 90),
        NoteEvent::new(55, 1.0, 2.0, 70),
    ];
    let ccs: Vec<ControlChangeEvent> = (0..16)
        .map(|i| ControlChangeEvent::new(i as f64 * 0.25, 74, (i * 8) as u8))
        .collect();
    let path = save_midi_cc(&notes, &ccs, dir.join("sweep"), 100.0).unwrap();
    assert_eq!(path, dir.join("sweep_cc.mid"));

    let decoded = load_midi(&path).unwrap();
    assert_eq!(decoded.notes, notes.to_vec());
    assert_eq!(decoded.control_changes, ccs);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn existing_files_are_overwritten() {
    let dir = scratch_dir("overwrite");
    let first = save_midi(&[NoteEvent::new(60, 0.0, 1.0, 100)], dir.join("song"), 60.0).unwrap();
    let second = save_midi(&[NoteEvent::new(72, 0.0, 2.0, 50)], dir.join("song"), 60.0).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        load_midi(&second).unwrap().notes,
        vec![NoteEvent::new(72, 0.0, 2.0, 50)]
    );

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn invalid_events_leave_no_file_behind() {
    let dir = scratch_dir("invalid");
    let result = save_midi(
        &[
            NoteEvent::new(60, 0.0, 1.0, 100),
            NoteEvent::new(60, 1.0, 1.0, 128),
        ],
        dir.join("bad"),
        60.0,
    );
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::Velocity { index: 1, value: 128 }))
    ));
    assert!(!dir.join("bad.mid").exists());

    let result = save_midi_cc(
        &[],
        &[ControlChangeEvent::new(-1.0, 1, 1)],
        dir.join("bad"),
        60.0,
    );
    assert!(result.is_err());
    assert!(!dir.join("bad_cc.mid").exists());

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn unwritable_destination_is_an_io_error() {
    let dir = scratch_dir("unwritable");
    let result = save_midi(
        &[NoteEvent::new(60, 0.0, 1.0, 100)],
        dir.join("missing-subdir").join("out"),
        60.0,
    );
    assert!(matches!(result, Err(Error::Io(_))));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn round_trip_within_tick_quantization() {
    let settings = MidiFileSettings {
        ticks_per_beat: 96,
        ..Default::default()
    };
    let writer = MidiWriter::new_with(settings, Tempo(75.0));
    let notes: Vec<NoteEvent> = (0..24)
        .map(|i| {
            NoteEvent::new(
                40 + i as u8,
                i as f64 * 0.37,
                0.2 + (i % 5) as f64 * 0.13,
                10 + i as u8 * 4,
            )
        })
        .collect();
    let bytes = writer.encode(&notes, &[]).unwrap();
    let decoded = read_midi(&bytes).unwrap();

    let tolerance = 1.0 / 96.0;
    assert_eq!(decoded.notes.len(), notes.len());
    for (written, decoded) in notes.iter().zip(decoded.notes.iter()) {
        assert_eq!(written.midi, decoded.midi);
        assert_eq!(written.vel, decoded.vel);
        assert!((written.t - decoded.t).abs() <= tolerance);
        assert!((written.dur - decoded.dur).abs() <= 2.0 * tolerance);
    }
}
