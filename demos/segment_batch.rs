//! Example: Segment many takes in parallel
//!
//! Usage:
//!   cargo run --release --example segment_batch -- [--jobs N] [--takes N] [--json]
//!
//! Notes:
//! - Parallelism is across takes (batch-level). Each segmentation is single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.
//! - Takes are synthetic scales with varying tuning, tempo and dynamics.

use note_segmenter::preprocessing::pitch::midi_to_hz;
use note_segmenter::{segment_notes_detailed, FrameSignals, SegmentationConfig};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

struct Take {
    frequency: Vec<f32>,
    confidence: Vec<f32>,
    envelope: Vec<f32>,
}

/// Major scale from `root`, `note_frames` frames per note, detuned by `cents`
fn synthetic_take(seed: usize) -> Take {
    let root = 48.0 + (seed % 24) as f32;
    let note_frames = 20 + (seed * 7) % 40;
    let cents = ((seed * 13) % 41) as f32 - 20.0;
    let level = 0.3 + ((seed * 5) % 7) as f32 * 0.1;

    let mut take = Take {
        frequency: Vec::new(),
        confidence: Vec::new(),
        envelope: Vec::new(),
    };
    for step in [0.0f32, 2.0, 4.0, 5.0, 7.0, 9.0, 11.0, 12.0] {
        let hz = midi_to_hz(root + step + cents / 100.0);
        for i in 0..note_frames {
            take.frequency.push(hz);
            take.confidence.push(if i < 3 { 0.1 } else { 0.88 });
            take.envelope.push(if i < 2 { 0.0 } else { level });
        }
    }
    take
}

#[derive(Serialize)]
struct TakeOut {
    take: usize,
    notes: usize,
    pitches: Vec<u8>,
    tuning_offset_cents: f32,
    processing_time_ms: f32,
    error: Option<String>,
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut takes = 64usize;

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--takes" => {
                takes = args
                    .first()
                    .ok_or("--takes requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: segment_batch [--jobs N] [--takes N] [--json]\n\
                     \n\
                     --jobs N    Parallel workers (default: CPU-1)\n\
                     --takes N   Number of synthetic takes (default: 64)\n\
                     --json      Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            other => {
                eprintln!("ERROR: unknown argument {other}. Use --help for usage.");
                std::process::exit(2);
            }
        }
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} takes, jobs={}", takes, jobs);

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<TakeOut> = pool.install(|| {
        (0..takes)
            .into_par_iter()
            .map(|seed| {
                let take = synthetic_take(seed);
                let signals = FrameSignals::new(&take.frequency, &take.confidence)
                    .with_amplitude_envelope(&take.envelope);
                let config = SegmentationConfig {
                    disable_splitting: true,
                    ..Default::default()
                };
                match segment_notes_detailed(&signals, config) {
                    Ok(result) => TakeOut {
                        take: seed,
                        notes: result.notes.len(),
                        pitches: result.notes.iter().map(|n| n.pitch_midi).collect(),
                        tuning_offset_cents: result.metadata.tuning_offset_cents,
                        processing_time_ms: result.metadata.processing_time_ms,
                        error: None,
                    },
                    Err(e) => TakeOut {
                        take: seed,
                        notes: 0,
                        pitches: vec![],
                        tuning_offset_cents: 0.0,
                        processing_time_ms: 0.0,
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect()
    });

    if json {
        for o in &outs {
            println!("{}", serde_json::to_string(o)?);
        }
    } else {
        for o in &outs {
            match &o.error {
                None => println!(
                    "[{}/{}] take {}: {} notes {:?} tuning={:+.1}c time={:.2}ms",
                    o.take + 1,
                    outs.len(),
                    o.take,
                    o.notes,
                    o.pitches,
                    o.tuning_offset_cents,
                    o.processing_time_ms
                ),
                Some(e) => println!("[{}/{}] take {}: ERROR: {}", o.take + 1, outs.len(), o.take, e),
            }
        }
    }

    let ok = outs.iter().filter(|o| o.error.is_none()).count();
    let total_notes: usize = outs.iter().map(|o| o.notes).sum();
    eprintln!(
        "Done: ok={}/{} notes={} wall={:.0}ms",
        ok,
        outs.len(),
        total_notes,
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
