//! Capture Workflow Example
//!
//! Demonstrates the full create → reflect → tag → save → browse cycle with
//! Session::sim().
//!
//! Run with:
//!   cargo run --example workflow

use std::collections::BTreeSet;

use echodraft::reflection::Persona;
use echodraft::session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echodraft=debug".into()),
        )
        .init();

    println!("=== EchoDraft: Capture Workflow ===\n");

    // Deterministic session with seed 42; same seed = same results
    let mut session = Session::sim(42);
    println!("✓ Created session with seed 42\n");

    // === Capture Memories ===
    println!("--- Capturing memories ---");

    let memories = [
        ("I met Ms. Lee at Lincoln School in Portland last summer.", Persona::Therapist),
        ("We sailed past the lighthouse toward Iceland that evening.", Persona::Friend),
        ("Grandmother taught me bread baking in her kitchen.", Persona::Editor),
    ];

    for (text, persona) in memories {
        session.begin_draft(text, persona)?;
        session.request_follow_up().await?;

        let entry_preview = &text[..30.min(text.len())];
        println!("  Memory: \"{entry_preview}...\"");
        let state = session.draft_state().expect("draft in progress");
        println!("    persona={persona} state={state}");

        session.submit_response("It stayed with me for years.")?;
        let id = session.save().await?;
        println!("    saved as {id}\n");
    }

    // === Browse the Timeline ===
    println!("--- Browsing the timeline ---");
    for (position, id) in session.current_order().iter().enumerate() {
        let entry = session.entry(id)?;
        let tags = entry.tags.as_ref().expect("saved entries are tagged");
        println!(
            "  {}. {} \u{2013} {}",
            position + 1,
            tags.emotion,
            entry.text
        );
        if let Some(follow_up) = &entry.follow_up {
            println!("     {} asked: {}", entry.persona, follow_up.lines().next().unwrap_or(""));
        }
    }
    println!();

    // === Filter and Reorder ===
    println!("--- Filtering and reordering ---");
    let all_themes = session.all_themes();
    println!("  Available themes: {}", all_themes.join(", "));

    let filter: BTreeSet<String> = all_themes.into_iter().take(1).collect();
    let subset = session.filter_by_themes(&filter);
    println!("  Filtered to {} entries", subset.len());

    let mut reversed = subset.clone();
    reversed.reverse();
    session.reorder(&reversed)?;
    println!("  Reordered the filtered subset (reversed)");

    let full = session.filter_by_themes(&BTreeSet::new());
    println!("  Full timeline still holds {} entries \u{2713}", full.len());

    Ok(())
}
