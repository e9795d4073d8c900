// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation basics.
//!
//! A lite location over an in-memory history: path navigation, subscribers, and
//! back/forward mirrored into the location.
//!
//! Run:
//! - `cargo run -p waymark_demos --example navigation_basics`

use serde_json::json;
use tracing_subscriber::EnvFilter;
use waymark_history::Window;
use waymark_location::{GoToOptions, NavigateOptions, RoutingOptions, init};
use waymark_state::PreserveQuery;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .init();

    let window = Window::in_memory("https://app.test/?lang=en")?;
    let context = init(&window, RoutingOptions::default())?;
    let location = context.location();

    location.subscribe(|snapshot| {
        println!("  -> {} (state {})", snapshot.url, snapshot.state);
    });

    println!("== Push ==");
    location.navigate("/inbox", NavigateOptions::push(json!({ "folder": "inbox" })))?;
    location.go_to(
        "/inbox/42",
        GoToOptions {
            state: json!({ "message": 42 }),
            preserve_query: PreserveQuery::from("lang"),
            ..GoToOptions::default()
        },
    )?;

    println!("== Back, back, forward ==");
    location.back();
    location.back();
    location.forward();
    println!("now at {} with state {}", location.path(), location.state());

    println!("== Out of range ==");
    location.go(10);
    println!("still at {}", location.path());

    context.teardown();
    Ok(())
}
