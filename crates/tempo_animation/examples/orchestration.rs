//! Drives a scheduler from a plain loop: a staggered entrance timeline plus a
//! color fade tagged to a target, ticked at ~60fps until everything settles.
//!
//! Run with: cargo run --example orchestration

use std::thread;
use std::time::Duration;

use tempo_animation::{Color, Easing, Scheduler, Timeline, Transition};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut scheduler = Scheduler::new();

    let entrance = Timeline::parallel()
        .add(
            Transition::new(0.0_f32, 1.0, Duration::from_millis(400))
                .unwrap()
                .with_easing(Easing::CubicOut)
                .on_progress(|alpha| println!("opacity  {alpha:.3}")),
            Duration::ZERO,
        )
        .add(
            Transition::new(0.8_f32, 1.0, Duration::from_millis(300))
                .unwrap()
                .with_easing(Easing::BackOut)
                .on_progress(|scale| println!("scale    {scale:.3}")),
            Duration::ZERO,
        )
        .with_stagger(Duration::from_millis(100))
        .on_completion(|| println!("entrance complete"));

    let handle = scheduler.schedule(entrance);
    println!("scheduled entrance as {handle:?}");

    let highlight = Transition::new(Color::BLACK, Color::RED, Duration::from_millis(250))
        .unwrap()
        .on_progress(|c| println!("color    ({:.2}, {:.2}, {:.2})", c.r, c.g, c.b));
    scheduler.schedule(highlight);

    // The host's frame loop: tick until the scheduler reports idle, then the
    // timer would normally be stopped until the next schedule().
    while scheduler.tick() {
        thread::sleep(Duration::from_millis(16));
    }
    println!("scheduler idle");
}
