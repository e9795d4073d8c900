// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full-mode interception.
//!
//! Every push and replace on the shared history, including calls made by code that knows
//! nothing about Waymark, passes through `beforeNavigate` handlers that may cancel it.
//!
//! Run:
//! - `cargo run -p waymark_demos --example interception`

use serde_json::json;
use tracing_subscriber::EnvFilter;
use waymark_history::{HistoryApi, Window};
use waymark_location::{NavigateOptions, RoutingOptions, init};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .init();

    let window = Window::in_memory("https://app.test/")?;
    let context = init(&window, RoutingOptions::default().full())?;
    let location = context.location();

    let _guard = location.on_before_navigate(|event| {
        println!("beforeNavigate {} {}", event.method, event.url);
        if event.url.contains("/admin") {
            event.cancel("admin area is locked");
        }
    })?;
    let _report = location.on_navigation_cancelled(|event| {
        println!("navigationCancelled {} ({})", event.url, event.cause);
    })?;

    println!("== Our own navigation ==");
    let outcome = location.navigate("/docs", NavigateOptions::push(json!({ "hash": {} })))?;
    println!("{outcome:?}, now at {}", location.path());

    println!("== A third-party router ==");
    let third_party = window.history().clone();
    third_party.push_state(json!({ "hash": {} }), "", Some("/admin/users"))?;
    println!("still at {}", location.path());

    println!("== Non-conformant state is replaced ==");
    third_party.push_state(json!([1, 2, 3]), "", Some("/list"))?;
    println!("at {} with state {}", location.path(), location.state());

    println!("== Teardown restores direct dispatch ==");
    context.teardown();
    third_party.push_state(json!(null), "", Some("/admin/unguarded"))?;
    println!("history now at {}", window.location().path());
    Ok(())
}
