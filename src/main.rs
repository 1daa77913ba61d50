//! Stagedive entry point
//!
//! The browser build is driven through `platform::web::boot`; the native
//! binary runs seeded autopilot sessions as a smoke check.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use stagedive::games::GameKind;
    use stagedive::platform::headless;

    env_logger::init();
    log::info!("stagedive (native) starting...");

    for kind in GameKind::ALL {
        let summary = headless::run_demo(kind, 0x5EED, 3600);
        let note = if summary.completed {
            ""
        } else {
            " (tick budget reached)"
        };
        log::info!(
            "{:<9} score {:>6} after {:>4} ticks{}",
            kind.id(),
            summary.score,
            summary.ticks,
            note
        );
    }

    log::info!("serve the wasm build for the playable version");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::boot, this is just to satisfy the compiler
}
