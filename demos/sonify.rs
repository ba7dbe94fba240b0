// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! The `sonify` example turns a series of numbers into a melody, writing both
//! a plain MIDI file and one with a filter-cutoff automation lane.

use anyhow::Context;
use clap::Parser;
use ensnare_sonify::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, about, long_about = None)]
struct Args {
    /// A JSON file containing an array of numbers. If omitted, a sine wave is
    /// used instead.
    input: Option<PathBuf>,

    /// Output path without extension. Writes <output>.mid and <output>_cc.mid
    #[clap(short = 'o', long, default_value = "sonified")]
    output: PathBuf,

    /// Lowest note of the scale
    #[clap(short = 'r', long, default_value = "C3")]
    root: String,

    /// Scale name, such as major, dorian, or minorPent
    #[clap(short = 's', long, default_value = "majorPent")]
    scale: String,

    /// How many octaves the melody may span
    #[clap(long, default_value_t = 2)]
    octaves: usize,

    /// Beats per minute
    #[clap(short = 'b', long, default_value_t = 100.0)]
    bpm: f64,

    /// Length of each note, in beats
    #[clap(short = 'd', long, default_value_t = 0.5)]
    duration: f64,

    /// Makes high values more prominent (>1) or less prominent (<1)
    #[clap(short = 'p', long, default_value_t = 1.0)]
    power: f64,
}

fn read_data(input: &Option<PathBuf>) -> anyhow::Result<Vec<f64>> {
    match input {
        Some(path) => {
            let f = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(std::io::BufReader::new(f))
                .with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok((0..32)
            .map(|i| (i as f64 * std::f64::consts::TAU / 16.0).sin())
            .collect()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let data = read_data(&args.input)?;
    let (min, max) = data
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if data.is_empty() || min == max {
        anyhow::bail!("need at least two distinct values to sonify");
    }

    let steps = Scale::from_name(&args.scale)?;
    let root: Pitch = args.root.parse()?;
    let pitches = get_scale_pitches(root, args.octaves, steps.steps())?;
    eprintln!(
        "Mapping {} values onto {} {} ({} notes)",
        data.len(),
        root,
        steps,
        pitches.len()
    );

    let degrees =
        map_values_to_integer(&data, min, max, 0, pitches.len() as i64 - 1, args.power)?;
    let velocities = map_values_to_integer(&data, min, max, 50, 110, 1.0)?;
    let mut notes = Vec::with_capacity(data.len());
    for (beat, (degree, vel)) in degrees.iter().zip(velocities.iter()).enumerate() {
        let key = pitches[*degree as usize].to_midi_key()?.as_int();
        notes.push(NoteEvent::new(
            key,
            beat as f64 * args.duration,
            args.duration,
            *vel as u8,
        ));
    }

    // Sweep the filter cutoff (CC 74) opposite to the melody.
    let cutoffs = map_values_to_integer(&data, min, max, 127, 20, 1.0)?;
    let ccs: Vec<ControlChangeEvent> = cutoffs
        .iter()
        .enumerate()
        .map(|(beat, v)| ControlChangeEvent::new(beat as f64 * args.duration, 74, *v as u8))
        .collect();

    let plain = save_midi(&notes, &args.output, args.bpm)?;
    let automated = save_midi_cc(&notes, &ccs, &args.output, args.bpm)?;
    eprintln!("Wrote {} and {}", plain.display(), automated.display());
    Ok(())
}
