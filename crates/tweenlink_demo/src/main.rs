// SPDX-License-Identifier: MIT OR Apache-2.0
//! tweenlink demo
//!
//! Drives the facade against the in-memory engine and logs what the timeline
//! ends up holding:
//! - chains declared out of order land in order
//! - each chain entry keeps its own position
//! - detaching an element removes only its animations
//!
//! Usage: `tweenlink_demo [config.ron]`

use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tweenlink_action::{
    Motion, MotionConfig, Placement, PropertyMap, Result, SequencerExt, TimelineEvent,
};
use tweenlink_sequencer::memory::{MemoryEngine, MemoryTimeline};

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("tweenlink_demo=info".parse().unwrap())
        .add_directive("tweenlink_action=info".parse().unwrap())
        .add_directive("tweenlink_sequencer=debug".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting tweenlink demo v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    if let Err(e) = run(config_path) {
        tracing::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            tracing::info!("Loading config from {:?}", path);
            MotionConfig::load(&path)?
        }
        None => MotionConfig::default(),
    };
    let motion = Motion::from_config(MemoryEngine::<String>::new(), &config)?;

    let intro = match motion.get_timeline("intro") {
        Some(timeline) => timeline,
        None => motion.create_timeline("intro", &config.default_timeline)?,
    };
    intro.on(TimelineEvent::Complete, || tracing::info!("Intro complete"));

    // Declared last, ordered first
    let heading = intro
        .animate()
        .from_at(
            PropertyMap::new().with("opacity", 0).with("y", -20),
            Placement::from(("", 1)),
        )
        .build();
    let body = intro
        .animate()
        .to_at(PropertyMap::new().with("opacity", 1), ("", 3))
        .to_at(PropertyMap::new().with("scale", 1.1).with("duration", 0.2), "<")
        .build();
    let subtitle = intro
        .animate()
        .set_ordered(PropertyMap::new().with("visible", true), 2)
        .to(PropertyMap::new().with("x", 40))
        .build();

    let body_detach = body.attach("body".to_string())?;
    let _subtitle_detach = subtitle.attach("subtitle".to_string())?;
    let _heading_detach = heading.attach("heading".to_string())?;

    intro.with_timeline(log_children);

    body_detach.call()?;
    tracing::info!("Detached body");
    intro.with_timeline(log_children);

    intro.play();
    let duration = intro.duration();
    let mut elapsed = 0.0;
    while elapsed <= duration {
        let fired = intro.with_timeline_mut(|tl| tl.tick(0.1));
        intro.dispatch(&fired);
        elapsed += 0.1;
    }
    tracing::info!("Played {:.2}s of {:.2}s", intro.time(), duration);

    let dropped = motion.engine().clear_log();
    tracing::info!("Cleared {} logged tweens", dropped);

    // Standalone chains hit the engine directly
    let pulse = motion
        .animate()
        .to(PropertyMap::new().with("scale", 1.2))
        .to(PropertyMap::new().with("scale", 1.0))
        .build()
        .into_fn();
    let pulse_detach = pulse("button".to_string())?;
    tracing::info!("Engine created {} tweens", motion.engine().created_count());
    pulse_detach.call()?;

    Ok(())
}

fn log_children(timeline: &MemoryTimeline<String>) {
    for child in timeline.children() {
        tracing::info!(
            "{:>10} {:<7} at {:.2}s for {:.2}s",
            child.tween.target(),
            child.tween.kind().name(),
            child.start,
            child.duration
        );
    }
}
