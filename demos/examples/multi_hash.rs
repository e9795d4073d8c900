// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-hash routing.
//!
//! Three independent universes share one fragment. Navigating one rewrites only its
//! `id=path` segment and only its slot of the state.
//!
//! Run:
//! - `cargo run -p waymark_demos --example multi_hash`

use serde_json::json;
use tracing_subscriber::EnvFilter;
use waymark_history::Window;
use waymark_location::{GoToOptions, NavigateOptions, RoutingOptions, init};
use waymark_state::{Hash, HashMode};

fn show(location: &waymark_location::Location) {
    println!("url:   {}", location.url());
    for (id, path) in location.hash_paths().iter() {
        println!("  {id:>6} = {path}");
    }
    println!("state: {}", location.state());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let window = Window::in_memory("https://app.test/mail")?;
    let options = RoutingOptions::default()
        .with_hash_mode(HashMode::Multi)
        .with_default_hash("main");
    let context = init(&window, options)?;
    let location = context.location();

    println!("== Fill three universes ==");
    for (id, path) in [("main", "/inbox"), ("side", "/contacts"), ("dialog", "/compose")] {
        location.go_to(
            path,
            GoToOptions {
                hash: Some(Hash::from(id)),
                state: json!({ "opened": path }),
                ..GoToOptions::default()
            },
        )?;
    }
    show(location);

    println!("== Move only the side universe ==");
    location.go_to(
        "/contacts/ada",
        GoToOptions {
            hash: Some(Hash::from("side")),
            state: json!({ "contact": "ada" }),
            ..GoToOptions::default()
        },
    )?;
    show(location);

    println!("== Paths with separators survive ==");
    location.navigate_in("/search/q=a;b", "main", NavigateOptions::default())?;
    show(location);

    println!("== Back restores the previous fragment ==");
    location.back();
    show(location);

    context.teardown();
    Ok(())
}
