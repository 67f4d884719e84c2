//! Human-readable transcript of a run.
//!
//! The per-iteration summary shows truncated previews only; the full text of
//! every transition stays in the `RunRecord`.

use crate::explorer::RunRecord;
use crate::gauntlet::preview;
use crate::prompts::RULE;

/// Timestamp layout used in transcripts and file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File name of a run's transcript. Includes the start time, so every run
/// gets a fresh file.
pub fn transcript_file_name(record: &RunRecord) -> String {
    format!(
        "explorer_{}_{}_gauntlet.txt",
        record.cycle,
        record.started_at.format(TIMESTAMP_FORMAT)
    )
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push_str(&format!("{}\n{}\n{}\n\n{}\n\n", RULE, title, RULE, body));
}

fn preview_with_ellipsis(text: &str, max_chars: usize) -> String {
    let shown = preview(text, max_chars);
    if shown.len() < text.len() {
        format!("{}...", shown)
    } else {
        shown.to_string()
    }
}

pub fn render_transcript(record: &RunRecord, preview_chars: usize) -> String {
    let gauntlet = &record.gauntlet;
    let mut out = String::new();

    out.push_str(&format!(
        "EXPLORER - CYCLE {} [GAUNTLET MODE]\n{}\n\n",
        record.cycle, RULE
    ));
    out.push_str(&format!(
        "Timestamp: {}\n",
        record.started_at.format(TIMESTAMP_FORMAT)
    ));
    out.push_str(&format!("Topic: {}\n", record.topic));
    out.push_str(&format!("Elapsed: {:.2}s\n", record.elapsed_secs()));
    out.push_str(&format!("Gauntlet Iterations: {}\n\n", gauntlet.iterations));

    section(&mut out, "PHASES 1-2: BOUNDARY EXPLORATION", &record.boundary);

    let lenses = record
        .initial_perturbations
        .iter()
        .map(|c| format!("- [{}] {}", c.category, c.instruction))
        .collect::<Vec<_>>()
        .join("\n");
    section(
        &mut out,
        "PHASE 3: INITIAL IDEA (Pre-Gauntlet)",
        &format!(
            "Initial Perturbations:\n{}\n\n{}",
            lenses, gauntlet.initial_idea
        ),
    );

    let mut chain = format!("Iterations: {}\n", gauntlet.iterations);
    for record in &gauntlet.reflection_chain {
        chain.push_str(&format!(
            "\n[Iteration {}] Perturbations: {}\n",
            record.iteration,
            record.categories.join(", ")
        ));
        chain.push_str(&format!(
            "Before: {}\n",
            preview_with_ellipsis(&record.idea_before, preview_chars)
        ));
        chain.push_str(&format!(
            "After: {}\n",
            preview_with_ellipsis(&record.idea_after, preview_chars)
        ));
    }
    section(&mut out, "GAUNTLET: EVOLUTIONARY REFINEMENT", chain.trim_end());

    section(&mut out, "FINAL IDEA (Post-Gauntlet)", &gauntlet.final_idea);
    section(&mut out, "TRANSLATION (Plain Language)", &record.translation);
    out.push_str(RULE);
    out.push('\n');

    out
}
