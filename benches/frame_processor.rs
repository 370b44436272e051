#![allow(clippy::unwrap_used)]
//! Benchmarks for the per-frame gesture core and script parsing

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hangboard_gesture::config::GestureThresholds;
use hangboard_gesture::gesture::{Landmark, PoseLandmarks};
use hangboard_gesture::pipeline::{FrameGate, FrameProcessor};
use hangboard_gesture::source::LandmarkScript;
use std::hint::black_box;

fn pose(wrist_y: f32, visibility: f32) -> PoseLandmarks {
    (0..33)
        .map(|index| {
            let y = match index {
                11 | 12 => 0.40,
                15 | 16 => wrist_y,
                _ => 0.5,
            };
            Landmark::new(0.5, y, visibility)
        })
        .collect()
}

fn bench_process_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_frame");
    let cases = [
        ("arms_up", Some(pose(0.10, 0.9))),
        ("low_visibility", Some(pose(0.10, 0.2))),
        ("no_person", None),
    ];

    for (name, landmarks) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), landmarks, |b, landmarks| {
            let mut processor = FrameProcessor::new(&GestureThresholds::default());
            let mut timestamp_ms = 0;
            b.iter(|| {
                timestamp_ms += 33;
                black_box(processor.process(black_box(landmarks.as_deref()), timestamp_ms))
            });
        });
    }
    group.finish();
}

fn bench_hang_sequence(c: &mut Criterion) {
    // One minute of 30 fps frames alternating between hangs and rests
    let frames: Vec<PoseLandmarks> = (0..1800)
        .map(|i| {
            if (i / 210) % 2 == 0 {
                pose(0.10, 0.9)
            } else {
                pose(0.70, 0.9)
            }
        })
        .collect();

    let mut group = c.benchmark_group("hang_sequence");
    group.throughput(Throughput::Elements(frames.len() as u64));
    group.bench_function("1800_frames", |b| {
        b.iter(|| {
            let mut processor = FrameProcessor::default();
            for (i, landmarks) in frames.iter().enumerate() {
                black_box(processor.process(Some(landmarks.as_slice()), i as u64 * 33));
            }
        });
    });
    group.finish();
}

fn bench_gate_admit(c: &mut Criterion) {
    let gate = FrameGate::new();
    gate.open();

    c.bench_function("gate_admit_release", |b| {
        b.iter(|| {
            let permit = gate.admit();
            black_box(&permit);
        });
    });
}

fn bench_script_parse(c: &mut Criterion) {
    let line = serde_json::to_string(pose(0.10, 0.9).as_slice()).unwrap();
    let text: String = (0..300).map(|_| format!("{line}\n")).collect();

    let mut group = c.benchmark_group("script_parse");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("300_lines", |b| {
        b.iter(|| LandmarkScript::parse(black_box(&text)).unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_process_frame,
    bench_hang_sequence,
    bench_gate_admit,
    bench_script_parse
);
criterion_main!(benches);
