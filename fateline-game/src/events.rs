//! Event selection logic.
//!
//! Selection is a function of (round number, decision history, catalog,
//! rng): follow-up intent lives in the event data, and the history the
//! caller threads in decides whether a follow-up fires. There is no
//! internal mutable follow-up state.
use rand::Rng;
use std::collections::HashSet;

use crate::data::{Event, EventData};
use crate::round::DecisionRecord;

pub struct EventRequest<'a> {
    pub round: u32,
    pub data: &'a EventData,
    pub history: &'a [DecisionRecord],
}

/// Pick the event for one round, or `None` when the catalog is exhausted.
///
/// A follow-up declared by the previous round's chosen option wins when
/// its target exists and has not been shown yet; otherwise the pick is a
/// weighted roll over the events the player has not seen.
pub fn pick_event<R: Rng>(request: &EventRequest<'_>, rng: &mut R) -> Option<Event> {
    let seen = seen_ids(request.history);

    if let Some(event) = pending_followup(request, &seen) {
        log::debug!(
            "event selection | round {} follow-up {}",
            request.round,
            event.id
        );
        return Some(event.clone());
    }

    let candidates: Vec<&Event> = request
        .data
        .events
        .iter()
        .filter(|event| !seen.contains(event.id.as_str()))
        .collect();
    if candidates.is_empty() {
        log::debug!("event selection | round {} catalog exhausted", request.round);
        return None;
    }

    let weighted: Vec<u32> = candidates
        .iter()
        .map(|event| event.weight.max(1))
        .collect();
    let idx = choose_weighted(&weighted, rng)?;
    let chosen = candidates[idx].clone();
    log::debug!(
        "event selection | round {} rolled {} of {} candidates",
        request.round,
        chosen.id,
        candidates.len()
    );
    Some(chosen)
}

fn seen_ids(history: &[DecisionRecord]) -> HashSet<&str> {
    history
        .iter()
        .filter_map(|record| record.event_and_choice().map(|(id, _)| id))
        .collect()
}

fn pending_followup<'a>(
    request: &EventRequest<'a>,
    seen: &HashSet<&str>,
) -> Option<&'a Event> {
    let (event_id, choice_key) = request.history.last()?.event_and_choice()?;
    let previous = request.data.get_by_id(event_id)?;
    let followup_id = previous.choice(choice_key)?.followup.as_deref()?;
    if seen.contains(followup_id) {
        return None;
    }
    request.data.get_by_id(followup_id)
}

fn choose_weighted<R: Rng>(weights: &[u32], rng: &mut R) -> Option<usize> {
    let total_weight: u32 = weights.iter().sum();
    if total_weight == 0 {
        return None;
    }

    let roll = rng.gen_range(0..total_weight);
    let mut current = 0;
    for (idx, weight) in weights.iter().enumerate() {
        current += *weight;
        if roll < current {
            return Some(idx);
        }
    }

    weights.first().map(|_| 0)
}
