use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantData {
    pub name: String,
    pub total_steps: u64,
    pub average_steps: f64,
    pub highest_single_day: u64,
    pub daily_steps: Vec<u64>,
    pub current_win_streak: u32,
    pub best_win_streak: u32,
    pub current_losing_streak: u32,
    pub all_time_wins: u32,
}

impl ParticipantData {
    /// Steps recorded on `day`, or `None` past the end of the sequence.
    pub fn steps_on(&self, day: usize) -> Option<u64> {
        self.daily_steps.get(day).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailyStepEntry {
    pub day: u32,
    #[serde(default)]
    pub steps: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StepDataResponse {
    pub tab: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub days: Vec<DailyStepEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantTotal {
    pub name: String,
    pub total_steps: u64,
    pub average_steps: f64,
    pub highest_single_day: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TotalsResponse {
    pub total_steps: u64,
    pub total_days: u32,
    pub participants: Vec<ParticipantTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GamificationData {
    pub participants: Vec<ParticipantData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TabsResponse {
    #[serde(default)]
    pub tabs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    CurrentBest,
    Funny,
    Milestone,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub category: BadgeCategory,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    #[serde(flatten)]
    pub badge: Badge,
    pub earned_at: Option<NaiveDate>,
    pub earned_by: String,
    pub value: u64,
    pub day_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub total_steps: u64,
    pub average_steps: f64,
    pub highest_single_day: u64,
    pub all_time_wins: u32,
    pub current_win_streak: u32,
    pub best_win_streak: u32,
    pub current_losing_streak: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CumulativePoint {
    pub day: usize,
    pub totals: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GamificationResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub cumulative: Vec<CumulativePoint>,
    pub badges: Vec<EarnedBadge>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub direction: TrendDirection,
    pub recent_average: f64,
    pub previous_average: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub day_index: usize,
    pub steps: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    pub month: usize,
    pub start_day: usize,
    pub end_day: usize,
    pub total_steps: u64,
    pub average_steps: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalAnalytics {
    pub total_steps: u64,
    pub average_steps: f64,
    pub days_tracked: usize,
    pub trend: Trend,
    pub consistency_percent: f64,
    pub best_day: Option<DayRecord>,
    pub lowest_day: Option<DayRecord>,
    pub days_over_5k: usize,
    pub days_over_10k: usize,
    pub percent_over_10k: f64,
    pub current_streak: usize,
    pub best_streak: usize,
    pub monthly: Vec<MonthlyBucket>,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantAnalyticsResponse {
    pub participant: ParticipantData,
    pub analytics: PersonalAnalytics,
}

#[derive(Debug, Deserialize, Default)]
pub struct StepsQuery {
    pub tab: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
