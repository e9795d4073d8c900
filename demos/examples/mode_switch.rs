// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hash-mode switch.
//!
//! The hash mode is read from session storage at start-up. Toggling it persists the new
//! mode, clears the fragment and reloads; the reload handler here simply starts routing
//! again in the new mode.
//!
//! Run:
//! - `cargo run -p waymark_demos --example mode_switch`

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use waymark_history::Window;
use waymark_location::{HashModeSwitch, NavigateOptions, RoutingContext, RoutingOptions, init};
use waymark_state::HashMode;

fn start(window: &Window) -> Result<RoutingContext, waymark_location::LocationError> {
    let switch = HashModeSwitch::load(window.storage(), HashMode::Single);
    println!("starting in {} mode", switch.mode());
    init(window, RoutingOptions::default().with_hash_mode(switch.mode()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let window = Window::in_memory("https://app.test/")?;
    let context: Rc<RefCell<Option<RoutingContext>>> = Rc::new(RefCell::new(None));

    let slot = Rc::clone(&context);
    window.set_reload_handler(move |window| {
        if let Some(previous) = slot.borrow_mut().take() {
            previous.teardown();
        }
        match start(window) {
            Ok(next) => *slot.borrow_mut() = Some(next),
            Err(err) => eprintln!("restart failed: {err}"),
        }
    });

    *context.borrow_mut() = Some(start(&window)?);
    if let Some(ctx) = context.borrow().as_ref() {
        ctx.location()
            .navigate_in("/settings", "main", NavigateOptions::default())?;
        println!("single-mode fragment: {:?}", ctx.location().url().fragment());
    }

    let mut switch = HashModeSwitch::load(window.storage(), HashMode::Single);
    switch.toggle(&window)?;

    if let Some(ctx) = context.borrow().as_ref() {
        ctx.location()
            .navigate_in("/settings", "main", NavigateOptions::default())?;
        ctx.location()
            .navigate_in("/help", "side", NavigateOptions::default())?;
        println!("multi-mode fragment: {:?}", ctx.location().url().fragment());
        println!("reloads: {}", window.reload_count());
    }
    Ok(())
}
