// Copyright (c) 2024 Mike Tsao. All rights reserved.

use ensnare_sonify::prelude::*;
use more_asserts::assert_le;

/// Turns a data series into one note per beat, with higher values playing
/// higher notes of the scale.
fn sonify(data: &[f64], scale: &[Pitch]) -> Result<Vec<NoteEvent>, Error> {
    let (min, max) = data
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let indexes = map_values_to_integer(data, min, max, 0, scale.len() as i64 - 1, 1.0)?;
    let velocities = map_values_to_integer(data, min, max, 40, 120, 0.5)?;
    indexes
        .iter()
        .zip(velocities.iter())
        .enumerate()
        .map(|(beat, (index, vel))| -> Result<NoteEvent, Error> {
            Ok(NoteEvent::new(
                scale[*index as usize].to_midi_key()?.as_int(),
                beat as f64,
                1.0,
                *vel as u8,
            ))
        })
        .collect()
}

#[test]
fn data_series_becomes_a_melody() {
    let scale = get_scale_pitches("C3".parse().unwrap(), 2, Scale::MajorPent.steps()).unwrap();
    assert_eq!(scale.len(), 11);

    let data = [3.0, 7.5, 1.0, 12.0, 6.5];
    let notes = sonify(&data, &scale).unwrap();
    assert_eq!(notes.len(), data.len());

    // The smallest value plays the root and the largest plays the top note.
    assert_eq!(notes[2].midi, 48);
    assert_eq!(notes[2].vel, 40);
    assert_eq!(notes[3].midi, 72);
    assert_eq!(notes[3].vel, 120);
    for note in &notes {
        let pitch = Pitch::from(note.midi);
        assert!(scale.contains(&pitch), "{pitch} isn't in the scale");
        assert_le!(note.vel, 120);
    }

    let names: Vec<String> = notes.iter().map(|n| midi_to_str(n.midi as i16)).collect();
    assert_eq!(names[2], "C3");
    assert_eq!(names[3], "C5");

    let bytes = MidiWriter::default().encode(&notes, &[]).unwrap();
    assert_eq!(read_midi(&bytes).unwrap().notes, notes);
}

#[test]
fn scale_names_agree_with_scale_pitches() {
    for scale in <Scale as strum::IntoEnumIterator>::iter() {
        let names = get_scale_notes("D3", 2, scale).unwrap();
        let pitches = get_scale_pitches(Pitch(50), 2, scale.steps()).unwrap();
        assert_eq!(names.len(), 2 * scale.steps().len() + 1);
        assert_eq!(
            names,
            pitches.iter().map(Pitch::name).collect::<Vec<_>>(),
            "{scale}"
        );
        assert_eq!(names.last().unwrap(), "D5");
    }
}

#[test]
fn automation_follows_a_curve() {
    let mapper = RangeMapperBuilder::default()
        .min_value(0.0)
        .max_value(15.0)
        .min_result(0.0)
        .max_result(127.0)
        .power(2.0)
        .build()
        .unwrap();
    let steps: Vec<f64> = (0..16).map(|i| i as f64).collect();
    let values = mapper.map_all_to_integer(&steps).unwrap();
    assert_eq!(values.first(), Some(&0));
    assert_eq!(values.last(), Some(&127));
    values.windows(2).for_each(|w| assert_le!(w[0], w[1]));

    let ccs: Vec<ControlChangeEvent> = values
        .iter()
        .enumerate()
        .map(|(i, v)| ControlChangeEvent::new(i as f64 / 4.0, 11, *v as u8))
        .collect();
    let bytes = MidiWriter::default()
        .encode(&[NoteEvent::new(60, 0.0, 4.0, 100)], &ccs)
        .unwrap();
    assert_eq!(read_midi(&bytes).unwrap().control_changes, ccs);
}
