use crate::models::{CumulativePoint, LeaderboardEntry, ParticipantData};
use std::collections::BTreeMap;

/// Participants ordered by total steps. Equal totals share a rank and keep
/// their listed order.
pub fn build_leaderboard(participants: &[ParticipantData]) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&ParticipantData> = participants.iter().collect();
    ordered.sort_by(|a, b| b.total_steps.cmp(&a.total_steps));

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(ordered.len());
    for (position, participant) in ordered.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(previous) if previous.total_steps == participant.total_steps => previous.rank,
            _ => position + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            name: participant.name.clone(),
            total_steps: participant.total_steps,
            average_steps: participant.average_steps,
            highest_single_day: participant.highest_single_day,
            all_time_wins: participant.all_time_wins,
            current_win_streak: participant.current_win_streak,
            best_win_streak: participant.best_win_streak,
            current_losing_streak: participant.current_losing_streak,
        });
    }
    entries
}

/// Running totals per participant for every day of the season.
pub fn cumulative_series(participants: &[ParticipantData]) -> Vec<CumulativePoint> {
    let day_count = participants
        .iter()
        .map(|participant| participant.daily_steps.len())
        .max()
        .unwrap_or(0);

    let mut running = vec![0u64; participants.len()];
    (0..day_count)
        .map(|day| {
            let totals: BTreeMap<String, u64> = participants
                .iter()
                .zip(running.iter_mut())
                .map(|(participant, total)| {
                    *total = total.saturating_add(participant.steps_on(day).unwrap_or(0));
                    (participant.name.clone(), *total)
                })
                .collect();
            CumulativePoint { day, totals }
        })
        .collect()
}
