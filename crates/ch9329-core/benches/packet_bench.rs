//! Criterion benchmarks for CH9329 frame building.
//!
//! Every keystroke produces two frames, so building must stay far below the
//! 20 ms settle delay that follows each write.
//!
//! Run with:
//! ```bash
//! cargo bench --package ch9329-core --bench packet_bench
//! ```

use ch9329_core::{
    protocol::checksum::checksum, HidKeyCode, KeyStroke, MediaKey, ModifierMask, MouseButtons,
    Packet, ScreenSize,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// ── Benchmarks: keyboard ──────────────────────────────────────────────────────

fn bench_keyboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_keyboard");

    group.bench_function("key_stroke", |b| {
        b.iter(|| Packet::key_stroke(black_box(KeyStroke::shifted(HidKeyCode::KeyA))))
    });

    group.bench_function("keyboard_report_six_keys", |b| {
        let codes = [
            HidKeyCode::KeyA,
            HidKeyCode::KeyS,
            HidKeyCode::KeyD,
            HidKeyCode::KeyF,
            HidKeyCode::KeyJ,
            HidKeyCode::KeyK,
        ];
        b.iter(|| Packet::keyboard_report(black_box(ModifierMask::LEFT_CTRL), black_box(&codes)))
    });

    group.bench_function("keyboard_release", |b| b.iter(Packet::keyboard_release));

    group.finish();
}

// ── Benchmarks: mouse and media ───────────────────────────────────────────────

fn bench_mouse_and_media(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_mouse_media");

    group.bench_function("mouse_relative", |b| {
        b.iter(|| {
            Packet::mouse_relative(
                black_box(MouseButtons::NONE),
                black_box(200),
                black_box(-5),
                black_box(0),
            )
        })
    });

    group.bench_function("mouse_absolute", |b| {
        let screen = ScreenSize::default();
        b.iter(|| {
            Packet::mouse_absolute(
                black_box(MouseButtons::NONE),
                black_box(960),
                black_box(540),
                screen,
            )
        })
    });

    group.bench_function("media_key_report", |b| {
        b.iter(|| Packet::media_key_report(black_box(MediaKey::VolumeUp.report())))
    });

    group.finish();
}

fn bench_checksum(c: &mut Criterion) {
    let frame = [0x57u8; 64];
    c.bench_function("checksum_64_bytes", |b| b.iter(|| checksum(black_box(&frame))));
}

criterion_group!(benches, bench_keyboard, bench_mouse_and_media, bench_checksum);
criterion_main!(benches);
