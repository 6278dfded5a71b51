//! Badge assignment. Historical badges go to the first participant to reach
//! them while scanning days in order; current-best badges follow whoever
//! leads right now.

use crate::catalog::{BadgeDefinition, CATALOG, DayState, TEN_K};
use crate::models::{EarnedBadge, ParticipantData};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Holder {
    participant: usize,
    value: u64,
    day_index: Option<usize>,
}

/// Every earned badge, historical and current-best, in catalog order.
pub fn calculate_badges(
    participants: &[ParticipantData],
    season_start: Option<NaiveDate>,
) -> Vec<EarnedBadge> {
    let mut holders = scan_history(participants);
    holders.extend(current_best_holders(participants));
    collect_in_catalog_order(&holders, participants, season_start)
}

fn collect_in_catalog_order(
    holders: &HashMap<&'static str, Holder>,
    participants: &[ParticipantData],
    season_start: Option<NaiveDate>,
) -> Vec<EarnedBadge> {
    CATALOG
        .iter()
        .filter_map(|definition| {
            holders
                .get(definition.badge.id)
                .map(|holder| earned(definition, holder, participants, season_start))
        })
        .collect()
}

fn scan_history(participants: &[ParticipantData]) -> HashMap<&'static str, Holder> {
    let historical: Vec<&BadgeDefinition> = CATALOG
        .iter()
        .filter(|definition| !definition.rule.is_current_best())
        .collect();
    let day_count = participants
        .iter()
        .map(|participant| participant.daily_steps.len())
        .max()
        .unwrap_or(0);

    let mut cumulative = vec![0u64; participants.len()];
    let mut days_over_10k = vec![0usize; participants.len()];
    let mut holders = HashMap::with_capacity(historical.len());

    for day in 0..day_count {
        let mut states: Vec<DayState> = participants
            .iter()
            .enumerate()
            .map(|(index, participant)| {
                let steps = participant.steps_on(day).unwrap_or(0);
                cumulative[index] = cumulative[index].saturating_add(steps);
                if steps >= TEN_K {
                    days_over_10k[index] += 1;
                }
                DayState {
                    steps,
                    previous: day
                        .checked_sub(1)
                        .map(|prev| participant.steps_on(prev).unwrap_or(0)),
                    cumulative: cumulative[index],
                    days_over_10k: days_over_10k[index],
                    lowest_nonzero: None,
                }
            })
            .collect();

        let lowest = states
            .iter()
            .map(|state| state.steps)
            .filter(|steps| *steps > 0)
            .min();
        for state in &mut states {
            state.lowest_nonzero = lowest;
        }

        for definition in &historical {
            let id = definition.badge.id;
            if holders.contains_key(id) {
                continue;
            }
            let winner = states.iter().enumerate().find_map(|(index, state)| {
                definition.rule.evaluate(state).map(|value| (index, value))
            });
            if let Some((participant, value)) = winner {
                debug!(
                    badge = id,
                    holder = %participants[participant].name,
                    day,
                    "badge awarded"
                );
                holders.insert(
                    id,
                    Holder {
                        participant,
                        value,
                        day_index: Some(day),
                    },
                );
            }
        }

        if holders.len() == historical.len() {
            break;
        }
    }

    holders
}

fn current_best_holders(
    participants: &[ParticipantData],
) -> impl Iterator<Item = (&'static str, Holder)> + '_ {
    CATALOG
        .iter()
        .filter(|definition| definition.rule.is_current_best())
        .filter_map(move |definition| {
            let mut best: Option<Holder> = None;
            for (index, participant) in participants.iter().enumerate() {
                let Some(value) = definition.rule.current_value(participant) else {
                    continue;
                };
                if best.is_none_or(|holder| value > holder.value) {
                    best = Some(Holder {
                        participant: index,
                        value,
                        day_index: None,
                    });
                }
            }
            best.filter(|holder| holder.value > 0)
                .map(|holder| (definition.badge.id, holder))
        })
}

fn earned(
    definition: &BadgeDefinition,
    holder: &Holder,
    participants: &[ParticipantData],
    season_start: Option<NaiveDate>,
) -> EarnedBadge {
    let earned_at = match (season_start, holder.day_index) {
        (Some(start), Some(day)) => start.checked_add_signed(Duration::days(day as i64)),
        _ => None,
    };
    EarnedBadge {
        badge: definition.badge.clone(),
        earned_at,
        earned_by: participants[holder.participant].name.clone(),
        value: holder.value,
        day_index: holder.day_index,
    }
}
