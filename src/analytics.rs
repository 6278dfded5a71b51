use crate::catalog::TEN_K;
use crate::models::{DayRecord, MonthlyBucket, PersonalAnalytics, Trend, TrendDirection};

pub const TREND_WINDOW_DAYS: usize = 7;
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;
pub const CONSISTENCY_BAND: f64 = 0.2;
pub const MONTH_DAYS: usize = 30;
const FIVE_K: u64 = 5_000;

pub fn calculate_personal_analytics(daily_steps: &[u64]) -> PersonalAnalytics {
    let total_steps = sum_steps(daily_steps);
    let average_steps = mean(daily_steps);
    let days_over_5k = daily_steps.iter().filter(|steps| **steps >= FIVE_K).count();
    let days_over_10k = daily_steps.iter().filter(|steps| **steps >= TEN_K).count();

    let mut analytics = PersonalAnalytics {
        total_steps,
        average_steps,
        days_tracked: daily_steps.len(),
        trend: calculate_trend(daily_steps),
        consistency_percent: calculate_consistency(daily_steps),
        best_day: best_day(daily_steps),
        lowest_day: lowest_day(daily_steps),
        days_over_5k,
        days_over_10k,
        percent_over_10k: percent(days_over_10k, daily_steps.len()),
        current_streak: calculate_current_streak(daily_steps),
        best_streak: calculate_best_streak(daily_steps),
        monthly: monthly_buckets(daily_steps),
        insights: Vec::new(),
    };
    analytics.insights = build_insights(&analytics);
    analytics
}

/// Last seven days against the seven before them.
pub fn calculate_trend(daily_steps: &[u64]) -> Trend {
    let recent_start = daily_steps.len().saturating_sub(TREND_WINDOW_DAYS);
    let previous_start = recent_start.saturating_sub(TREND_WINDOW_DAYS);
    let recent_average = mean(&daily_steps[recent_start..]);
    let previous_average = mean(&daily_steps[previous_start..recent_start]);

    let change_percent = if previous_average > 0.0 {
        (recent_average - previous_average) / previous_average * 100.0
    } else if recent_average > 0.0 {
        100.0
    } else {
        0.0
    };

    Trend {
        direction: classify_trend(change_percent),
        recent_average,
        previous_average,
        change_percent,
    }
}

pub fn classify_trend(change_percent: f64) -> TrendDirection {
    if change_percent > TREND_THRESHOLD_PERCENT {
        TrendDirection::Improving
    } else if change_percent < -TREND_THRESHOLD_PERCENT {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

/// Share of days within 20% of the participant's own average.
pub fn calculate_consistency(daily_steps: &[u64]) -> f64 {
    let average = mean(daily_steps);
    if average <= 0.0 {
        return 0.0;
    }
    let low = average * (1.0 - CONSISTENCY_BAND);
    let high = average * (1.0 + CONSISTENCY_BAND);
    let steady = daily_steps
        .iter()
        .filter(|steps| {
            let steps = **steps as f64;
            steps >= low && steps <= high
        })
        .count();
    percent(steady, daily_steps.len())
}

pub fn calculate_current_streak(daily_steps: &[u64]) -> usize {
    daily_steps
        .iter()
        .rev()
        .take_while(|steps| **steps > 0)
        .count()
}

pub fn calculate_best_streak(daily_steps: &[u64]) -> usize {
    let mut best = 0;
    let mut run = 0;
    for steps in daily_steps {
        if *steps > 0 {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

pub fn monthly_buckets(daily_steps: &[u64]) -> Vec<MonthlyBucket> {
    daily_steps
        .chunks(MONTH_DAYS)
        .enumerate()
        .map(|(month, chunk)| {
            let start_day = month * MONTH_DAYS;
            MonthlyBucket {
                month: month + 1,
                start_day,
                end_day: start_day + chunk.len() - 1,
                total_steps: sum_steps(chunk),
                average_steps: mean(chunk),
            }
        })
        .collect()
}

fn best_day(daily_steps: &[u64]) -> Option<DayRecord> {
    daily_steps
        .iter()
        .enumerate()
        .fold(None, |best: Option<DayRecord>, (day_index, steps)| match best {
            Some(record) if record.steps >= *steps => Some(record),
            _ => Some(DayRecord {
                day_index,
                steps: *steps,
            }),
        })
}

// zero days are treated as missing data, not as a record low
fn lowest_day(daily_steps: &[u64]) -> Option<DayRecord> {
    daily_steps
        .iter()
        .enumerate()
        .filter(|(_, steps)| **steps > 0)
        .fold(None, |lowest: Option<DayRecord>, (day_index, steps)| match lowest {
            Some(record) if record.steps <= *steps => Some(record),
            _ => Some(DayRecord {
                day_index,
                steps: *steps,
            }),
        })
}

fn build_insights(analytics: &PersonalAnalytics) -> Vec<String> {
    if analytics.total_steps == 0 {
        return vec!["No steps recorded yet. Time to get moving!".to_string()];
    }

    let mut insights = Vec::new();
    let trend = &analytics.trend;
    match trend.direction {
        TrendDirection::Improving => insights.push(format!(
            "Your daily average is up {:.0}% compared to the previous week.",
            trend.change_percent
        )),
        TrendDirection::Declining => insights.push(format!(
            "Your daily average is down {:.0}% from the previous week.",
            trend.change_percent.abs()
        )),
        TrendDirection::Stable => {
            insights.push("Your step count is holding steady week over week.".to_string())
        }
    }

    if analytics.consistency_percent >= 70.0 {
        insights.push(format!(
            "Remarkably consistent: {:.0}% of your days land close to your average.",
            analytics.consistency_percent
        ));
    } else if analytics.consistency_percent < 40.0 {
        insights.push("Your daily totals swing a lot. A steadier routine could help.".to_string());
    }

    if analytics.percent_over_10k >= 50.0 {
        insights.push(format!(
            "You hit 10K steps on {:.0}% of your days.",
            analytics.percent_over_10k
        ));
    }

    if analytics.current_streak >= 3 && analytics.current_streak == analytics.best_streak {
        insights.push(format!(
            "You're on your longest streak ever: {} days!",
            analytics.current_streak
        ));
    } else if analytics.best_streak >= 7 {
        insights.push(format!(
            "Your best streak is {} days in a row.",
            analytics.best_streak
        ));
    }

    if let Some(best) = analytics.best_day {
        insights.push(format!(
            "Your best day was day {} with {} steps.",
            best.day_index + 1,
            best.steps
        ));
    }

    insights
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum_steps(values) as f64 / values.len() as f64
}

fn sum_steps(values: &[u64]) -> u64 {
    values.iter().copied().fold(0, u64::saturating_add)
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
