//! Static badge catalog and the rules that decide who earns each badge.

use crate::models::BadgeCategory::{CurrentBest, Funny, Milestone};
use crate::models::{Badge, BadgeCategory, ParticipantData};

pub const TEN_K: u64 = 10_000;
pub const MARATHON_STEPS: u64 = 26_000;
pub const ULTRA_MARATHON_STEPS: u64 = 50_000;
pub const ROUND_NUMBERS: [u64; 8] = [5_000, 10_000, 15_000, 20_000, 25_000, 30_000, 40_000, 50_000];

/// Condition attached to a catalog badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    TotalSteps(u64),
    DaysOver10k(usize),
    BackToBack,
    Palindrome,
    Lucky777,
    RoundNumber,
    Zero,
    OneStep,
    RepeatingDigits,
    AtLeast(u64),
    LowestDay,
    MostTotalSteps,
    HighestSingleDay,
    BestWinStreak,
}

/// What one participant looks like on one day of the scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayState {
    /// Days past the end of a participant's sequence count as 0.
    pub steps: u64,
    /// `None` on the first day of the season.
    pub previous: Option<u64>,
    pub cumulative: u64,
    pub days_over_10k: usize,
    /// Lowest nonzero count across all participants that day.
    pub lowest_nonzero: Option<u64>,
}

impl Rule {
    pub fn is_current_best(self) -> bool {
        matches!(
            self,
            Rule::MostTotalSteps | Rule::HighestSingleDay | Rule::BestWinStreak
        )
    }

    /// Returns the achieved value if a participant in `state` satisfies the rule.
    pub fn evaluate(self, state: &DayState) -> Option<u64> {
        match self {
            Rule::TotalSteps(threshold) => {
                (state.cumulative >= threshold).then_some(state.cumulative)
            }
            Rule::DaysOver10k(threshold) => {
                (state.days_over_10k >= threshold).then_some(state.days_over_10k as u64)
            }
            Rule::LowestDay => {
                (state.lowest_nonzero == Some(state.steps)).then_some(state.steps)
            }
            Rule::BackToBack => (state.previous == Some(state.steps)).then_some(state.steps),
            Rule::MostTotalSteps | Rule::HighestSingleDay | Rule::BestWinStreak => None,
            single_day => single_day.matches_day(state.steps).then_some(state.steps),
        }
    }

    fn matches_day(self, steps: u64) -> bool {
        match self {
            Rule::Palindrome => is_palindrome(steps),
            Rule::Lucky777 => steps % 1000 == 777,
            Rule::RoundNumber => ROUND_NUMBERS.contains(&steps),
            Rule::Zero => steps == 0,
            Rule::OneStep => steps == 1,
            Rule::RepeatingDigits => has_repeating_digits(steps),
            Rule::AtLeast(threshold) => steps >= threshold,
            _ => false,
        }
    }

    /// Value a participant currently holds for a current-best rule.
    pub fn current_value(self, participant: &ParticipantData) -> Option<u64> {
        match self {
            Rule::MostTotalSteps => Some(participant.total_steps),
            Rule::HighestSingleDay => Some(participant.highest_single_day),
            Rule::BestWinStreak => Some(u64::from(participant.best_win_streak)),
            _ => None,
        }
    }
}

pub fn is_palindrome(steps: u64) -> bool {
    if steps < 100 {
        return false;
    }
    let digits = steps.to_string();
    digits.bytes().eq(digits.bytes().rev())
}

/// "3333" or "3131" style numbers of at least four digits.
pub fn has_repeating_digits(steps: u64) -> bool {
    let digits = steps.to_string().into_bytes();
    if digits.len() < 4 {
        return false;
    }
    let (first, second) = (digits[0], digits[1]);
    digits
        .iter()
        .enumerate()
        .all(|(i, d)| if i % 2 == 0 { *d == first } else { *d == second })
}

#[derive(Debug, Clone)]
pub struct BadgeDefinition {
    pub badge: Badge,
    pub rule: Rule,
}

const fn badge(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
    category: BadgeCategory,
    rule: Rule,
) -> BadgeDefinition {
    BadgeDefinition {
        badge: Badge {
            id,
            name,
            description,
            icon,
            color,
            category,
        },
        rule,
    }
}

pub const CATALOG: &[BadgeDefinition] = &[
    badge("step_king", "Step King", "Most total steps right now", "👑", "#f5b700", CurrentBest, Rule::MostTotalSteps),
    badge("big_day", "Big Day Energy", "Highest single day on record", "⚡", "#ff6b4a", CurrentBest, Rule::HighestSingleDay),
    badge("streak_lord", "Streak Lord", "Longest winning streak", "🔥", "#e4572e", CurrentBest, Rule::BestWinStreak),
    badge("steps_500k", "Half a Million", "First to 500,000 total steps", "🥉", "#cd7f32", Milestone, Rule::TotalSteps(500_000)),
    badge("steps_1m", "Millionaire", "First to 1,000,000 total steps", "🥈", "#a8a9ad", Milestone, Rule::TotalSteps(1_000_000)),
    badge("steps_2m", "Double Millionaire", "First to 2,000,000 total steps", "🥇", "#d4af37", Milestone, Rule::TotalSteps(2_000_000)),
    badge("steps_3m", "Triple Threat", "First to 3,000,000 total steps", "🏅", "#2f4858", Milestone, Rule::TotalSteps(3_000_000)),
    badge("steps_4m", "Four Million Club", "First to 4,000,000 total steps", "🎖️", "#33658a", Milestone, Rule::TotalSteps(4_000_000)),
    badge("steps_5m", "Five Million Legend", "First to 5,000,000 total steps", "🏆", "#86bbd8", Milestone, Rule::TotalSteps(5_000_000)),
    badge("consistent_100", "Century of Effort", "First to 100 days of 10K+ steps", "📅", "#2d7a4b", Milestone, Rule::DaysOver10k(100)),
    badge("consistent_200", "Double Century", "First to 200 days of 10K+ steps", "📆", "#3c9d5d", Milestone, Rule::DaysOver10k(200)),
    badge("consistent_300", "Relentless", "First to 300 days of 10K+ steps", "🗓️", "#52b96f", Milestone, Rule::DaysOver10k(300)),
    badge("consistent_365", "Every Day Hero", "First to 365 days of 10K+ steps", "🌟", "#6fd08c", Milestone, Rule::DaysOver10k(365)),
    badge("back_to_back", "Déjà Vu", "Same step count two days in a row", "🔁", "#8e6c8a", Funny, Rule::BackToBack),
    badge("palindrome", "Palindrome", "A step count that reads the same backwards", "🪞", "#b07bac", Funny, Rule::Palindrome),
    badge("lucky_777", "Jackpot", "A step count ending in 777", "🎰", "#e0a458", Funny, Rule::Lucky777),
    badge("round_number", "Perfectionist", "Hit a perfectly round number", "🎯", "#419d78", Funny, Rule::RoundNumber),
    badge("couch_potato", "Couch Potato", "Zero steps in a day", "🛋️", "#7a746d", Funny, Rule::Zero),
    badge("one_step", "One Small Step", "Exactly one step in a day", "👣", "#9a8f97", Funny, Rule::OneStep),
    badge("repeating_digits", "Broken Record", "A step count like 3333 or 3131", "📼", "#5e548e", Funny, Rule::RepeatingDigits),
    badge("marathon", "Marathoner", "26,000 steps in a single day", "🏃", "#d1495b", Funny, Rule::AtLeast(MARATHON_STEPS)),
    badge("ultra_marathon", "Ultra Marathoner", "50,000 steps in a single day", "🦵", "#8f2d56", Funny, Rule::AtLeast(ULTRA_MARATHON_STEPS)),
    badge("lowest_day", "Rest Day", "Lowest nonzero step count of the day", "🐢", "#6c757d", Funny, Rule::LowestDay),
];
