//! Example: Segment a single take into notes
//!
//! Usage:
//!   cargo run --example segment_synthetic -- [--target NOTE] [--tuning-cents C] [--no-split] [--json] [signals.json]
//!
//! The optional input file holds the per-frame tracker output:
//!   {"frequency": [...], "confidence": [...], "amplitude_envelope": [...], "onset_activation": [...]}
//! (envelope and activation may be omitted). Without a file a short synthetic
//! melody is segmented instead.

use note_segmenter::preprocessing::pitch::{midi_to_hz, parse_note_name};
use note_segmenter::{segment_notes_detailed, FrameSignals, SegmentationConfig};
use serde::Deserialize;
use std::env;

#[derive(Deserialize)]
struct SignalFile {
    frequency: Vec<f32>,
    confidence: Vec<f32>,
    #[serde(default)]
    amplitude_envelope: Option<Vec<f32>>,
    #[serde(default)]
    onset_activation: Option<Vec<f32>>,
}

/// C major arpeggio with a repeated top note, 100 frames per second
fn synthetic_melody() -> SignalFile {
    let melody = [(60.0f32, 40usize), (64.0, 40), (67.0, 40), (72.0, 30), (72.0, 30)];
    let mut signals = SignalFile {
        frequency: Vec::new(),
        confidence: Vec::new(),
        amplitude_envelope: Some(Vec::new()),
        onset_activation: Some(Vec::new()),
    };

    for (midi, frames) in melody {
        let hz = midi_to_hz(midi);
        for i in 0..frames {
            let vibrato = (i as f32 * 0.6).sin() * 0.002;
            signals.frequency.push(hz * (1.0 + vibrato));
            signals.confidence.push(if i < 3 { 0.15 } else { 0.9 });
            if let Some(env) = signals.amplitude_envelope.as_mut() {
                env.push(if i < 2 { 0.0 } else { 0.6 * (-(i as f32) / 80.0).exp() });
            }
            if let Some(act) = signals.onset_activation.as_mut() {
                act.push(if i == 2 { 0.95 } else { 0.02 });
            }
        }
    }
    signals
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut config = SegmentationConfig::default();
    let mut json = false;
    let mut path: Option<String> = None;

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--no-split" => config.disable_splitting = true,
            "--target" => {
                let name = args.first().ok_or("--target requires a note name")?;
                let midi = parse_note_name(name).ok_or_else(|| format!("bad note name: {name}"))?;
                config.target_midi_note = Some(midi);
                args.remove(0);
            }
            "--tuning-cents" => {
                let cents = args
                    .first()
                    .ok_or("--tuning-cents requires a value")?
                    .parse::<f32>()?;
                config.tuning_offset_cents = Some(cents);
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: segment_synthetic [--target NOTE] [--tuning-cents C] [--no-split] [--json] [signals.json]\n\
                     \n\
                     --target NOTE      Only transcribe this note (e.g. A4, C#3)\n\
                     --tuning-cents C   Use this tuning offset instead of estimating it\n\
                     --no-split         Do not re-split notes at onsets\n\
                     --json             Print the full result as JSON\n"
                );
                return Ok(());
            }
            _ => path = Some(a),
        }
    }

    let signals = match &path {
        Some(p) => serde_json::from_str::<SignalFile>(&std::fs::read_to_string(p)?)?,
        None => synthetic_melody(),
    };

    let mut frame_signals = FrameSignals::new(&signals.frequency, &signals.confidence);
    if let Some(env) = &signals.amplitude_envelope {
        frame_signals = frame_signals.with_amplitude_envelope(env);
    }
    if let Some(act) = &signals.onset_activation {
        frame_signals = frame_signals.with_onset_activation(act);
    }

    let result = segment_notes_detailed(&frame_signals, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Segmentation Results:");
    println!(
        "  Input: {} frames ({:.2} s), tuning {:+.1} cents{}",
        result.metadata.frame_count,
        result.metadata.duration_seconds,
        result.metadata.tuning_offset_cents,
        if result.metadata.tuning_estimated { " (estimated)" } else { "" }
    );
    println!(
        "  Stages: {} transitions, {} segments, {} candidates, {} filtered, {} after splitting",
        result.metadata.transition_count,
        result.metadata.segment_count,
        result.metadata.candidate_count,
        result.metadata.filtered_count,
        result.metadata.split_count
    );
    for note in &result.notes {
        println!(
            "  {:>4} (MIDI {:>3}) vel={:>3} {:.3}s - {:.3}s conf={:.2}",
            note.note_name(),
            note.pitch_midi,
            note.velocity,
            note.start_time,
            note.end_time,
            note.confidence
        );
    }
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    Ok(())
}
