//! Scratch-out erasure: decide whether a finished stroke is ink or an eraser.

use crate::config::EraseConfig;
use crate::geometry::{is_scratch_pattern, polylines_intersect};
use crate::stroke::Stroke;

/// Outcome of resolving a finished stroke against a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The page's stroke list after the candidate was applied.
    pub strokes: Vec<Stroke>,
    /// True when the candidate erased at least one stroke and was discarded.
    pub was_erase: bool,
    /// Strokes removed by the erase, in their original order.
    pub removed: Vec<Stroke>,
}

/// Apply a finished stroke to a page's existing strokes.
///
/// A scratch-shaped candidate removes every existing stroke it crosses and is
/// itself dropped. When it crosses nothing, or is not scratch-shaped, it is
/// appended like any other stroke. Erasure removes whole strokes.
pub fn classify(candidate: Stroke, existing: &[Stroke], config: &EraseConfig) -> Resolution {
    if !is_scratch_pattern(&candidate.points, config) {
        return append(candidate, existing);
    }

    log::debug!("stroke {} looks like a scratch-out", candidate.id());
    let (removed, kept): (Vec<Stroke>, Vec<Stroke>) = existing
        .iter()
        .cloned()
        .partition(|stroke| polylines_intersect(&candidate.points, &stroke.points));

    if removed.is_empty() {
        log::debug!("scratch crosses no strokes, keeping it as ink");
        return append(candidate, existing);
    }

    log::info!("scratch-out erased {} stroke(s)", removed.len());
    Resolution {
        strokes: kept,
        was_erase: true,
        removed,
    }
}

fn append(candidate: Stroke, existing: &[Stroke]) -> Resolution {
    let mut strokes = Vec::with_capacity(existing.len() + 1);
    strokes.extend_from_slice(existing);
    strokes.push(candidate);
    Resolution {
        strokes,
        was_erase: false,
        removed: Vec::new(),
    }
}
