use crate::models::{BadgeCategory, CumulativePoint, EarnedBadge, GamificationResponse, LeaderboardEntry};
use std::fmt::Write;

const PALETTE: [&str; 6] = ["#ff6b4a", "#2f4858", "#419d78", "#e0a458", "#5e548e", "#33658a"];

pub fn render_index(date: &str, view: Result<&GamificationResponse, &str>) -> String {
    let (alert, summary, leaderboard, chart, badges) = match view {
        Ok(view) => (
            String::new(),
            render_summary(view),
            render_leaderboard(&view.leaderboard),
            render_chart(&view.cumulative),
            render_badges(&view.badges),
        ),
        Err(message) => (
            format!(
                r#"<div class="alert" role="alert">Couldn't load competition data: {}. Try reloading in a moment.</div>"#,
                escape_html(message)
            ),
            String::new(),
            empty_state("No leaderboard yet."),
            empty_state("No chart data."),
            empty_state("No badges yet."),
        ),
    };

    INDEX_HTML
        .replace("{{DATE}}", &escape_html(date))
        .replace("{{ALERT}}", &alert)
        .replace("{{SUMMARY}}", &summary)
        .replace("{{LEADERBOARD}}", &leaderboard)
        .replace("{{CHART}}", &chart)
        .replace("{{BADGES}}", &badges)
}

fn render_summary(view: &GamificationResponse) -> String {
    let leader = view
        .leaderboard
        .first()
        .map(|entry| escape_html(&entry.name))
        .unwrap_or_else(|| "--".to_string());
    let days = view.cumulative.len();
    let combined = view
        .leaderboard
        .iter()
        .map(|entry| entry.total_steps)
        .fold(0, u64::saturating_add);

    format!(
        r#"<div class="stat"><span class="label">Leader</span><span class="value">{leader}</span></div>
      <div class="stat"><span class="label">Days</span><span class="value">{days}</span></div>
      <div class="stat"><span class="label">Combined steps</span><span class="value net">{}</span></div>
      <div class="stat"><span class="label">Badges earned</span><span class="value">{}</span></div>"#,
        format_steps(combined),
        view.badges.len()
    )
}

fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return empty_state("No participants yet.");
    }
    let mut rows = String::new();
    for entry in entries {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            entry.rank,
            escape_html(&entry.name),
            format_steps(entry.total_steps),
            format_steps(entry.average_steps.round() as u64),
            format_steps(entry.highest_single_day),
            entry.all_time_wins,
            entry.current_win_streak,
        );
    }
    format!(
        "<table><thead><tr><th>#</th><th>Name</th><th>Total</th><th>Avg/day</th><th>Best day</th><th>Wins</th><th>Streak</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

fn render_badges(badges: &[EarnedBadge]) -> String {
    if badges.is_empty() {
        return empty_state("No badges earned yet.");
    }
    let mut cards = String::new();
    for earned in badges {
        let when = match (earned.earned_at, earned.day_index) {
            (Some(date), _) => date.to_string(),
            (None, Some(day)) => format!("day {}", day + 1),
            (None, None) => "current holder".to_string(),
        };
        let category = match earned.badge.category {
            BadgeCategory::CurrentBest => "current-best",
            BadgeCategory::Funny => "funny",
            BadgeCategory::Milestone => "milestone",
        };
        let _ = write!(
            cards,
            r#"<div class="badge {category}" style="--badge-color: {}" title="{}"><span class="icon">{}</span><span class="name">{}</span><span class="holder">{} &middot; {}</span></div>"#,
            earned.badge.color,
            escape_html(earned.badge.description),
            earned.badge.icon,
            escape_html(earned.badge.name),
            escape_html(&earned.earned_by),
            when,
        );
    }
    cards
}

fn render_chart(points: &[CumulativePoint]) -> String {
    const WIDTH: f64 = 600.0;
    const HEIGHT: f64 = 260.0;
    const PADDING_X: f64 = 44.0;
    const PADDING_Y: f64 = 34.0;
    const TOP: f64 = 24.0;

    let Some(last) = points.last() else {
        return r#"<svg class="chart" viewBox="0 0 600 260"><text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text></svg>"#.to_string();
    };

    let max = last.totals.values().copied().max().unwrap_or(0).max(1) as f64;
    let x_step = if points.len() > 1 {
        (WIDTH - PADDING_X * 2.0) / (points.len() - 1) as f64
    } else {
        0.0
    };
    let x = |index: usize| PADDING_X + index as f64 * x_step;
    let y = |value: u64| HEIGHT - PADDING_Y - value as f64 * (HEIGHT - TOP - PADDING_Y) / max;

    let mut svg = format!(r#"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="Cumulative steps">"#);
    for tick in 0..=4u64 {
        let value = (max as u64).saturating_mul(tick) / 4;
        let y_pos = y(value);
        let _ = write!(
            svg,
            r#"<line class="chart-grid" x1="{PADDING_X}" y1="{y_pos:.2}" x2="{}" y2="{y_pos:.2}" /><text class="chart-label" x="{}" y="{:.2}" text-anchor="end">{}</text>"#,
            WIDTH - PADDING_X,
            PADDING_X - 6.0,
            y_pos + 4.0,
            format_compact(value),
        );
    }

    let mut legend = String::new();
    for (series, name) in last.totals.keys().enumerate() {
        let color = PALETTE[series % PALETTE.len()];
        let path: Vec<String> = points
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let value = point.totals.get(name).copied().unwrap_or(0);
                format!("{:.2},{:.2}", x(index), y(value))
            })
            .collect();
        let _ = write!(
            svg,
            r#"<polyline class="chart-line" style="stroke: {color}" points="{}" />"#,
            path.join(" ")
        );
        let _ = write!(
            legend,
            r#"<span class="legend-item"><span class="swatch" style="background: {color}"></span>{}</span>"#,
            escape_html(name)
        );
    }
    svg.push_str("</svg>");
    format!(r#"{svg}<div class="legend">{legend}</div>"#)
}

fn empty_state(message: &str) -> String {
    format!(r#"<p class="hint">{}</p>"#, escape_html(message))
}

pub fn format_steps(steps: u64) -> String {
    let digits = steps.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_compact(steps: u64) -> String {
    match steps {
        s if s >= 1_000_000 => format!("{:.1}M", s as f64 / 1_000_000.0),
        s if s >= 1_000 => format!("{}K", s / 1_000),
        s => s.to_string(),
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Step Brothers</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(47, 72, 88, 0.14);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(980px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 { margin: 0; font-size: clamp(2rem, 4vw, 2.6rem); }
    h2 { margin: 0 0 12px; font-size: 1.3rem; }
    .subtitle { margin: 4px 0 0; color: #5f5c57; }

    .alert {
      background: #fde8e4;
      border: 1px solid #f2b8ab;
      color: #c63b2b;
      border-radius: 14px;
      padding: 14px 18px;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .card, .stat {
      background: var(--card);
      border-radius: 18px;
      padding: 18px;
      box-shadow: var(--shadow);
    }

    .stat { display: grid; gap: 8px; }
    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }
    .stat .value { font-size: 1.6rem; font-weight: 600; color: var(--accent-2); }
    .stat .value.net { color: var(--accent); }

    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 8px 6px; border-bottom: 1px solid rgba(47, 72, 88, 0.08); }
    th { font-size: 0.8rem; text-transform: uppercase; color: #8b857d; }

    .chart { width: 100%; height: 260px; display: block; }
    .chart-line { fill: none; stroke-width: 3; }
    .chart-grid { stroke: rgba(47, 72, 88, 0.12); }
    .chart-label { fill: #7a746d; font-size: 11px; }
    .legend { display: flex; flex-wrap: wrap; gap: 12px; margin-top: 8px; font-size: 0.9rem; }
    .swatch { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 6px; }

    .badges {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(170px, 1fr));
      gap: 12px;
    }
    .badge {
      border-left: 4px solid var(--badge-color);
      border-radius: 12px;
      padding: 12px;
      background: #faf8f4;
      display: grid;
      gap: 4px;
    }
    .badge .icon { font-size: 1.6rem; }
    .badge .name { font-weight: 600; }
    .badge .holder { font-size: 0.85rem; color: #6b645d; }

    .hint { margin: 0; color: #6f6a65; font-size: 0.9rem; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Step Brothers</h1>
      <p class="subtitle">Daily step competition as of {{DATE}}.</p>
    </header>

    {{ALERT}}

    <section class="panel">
      {{SUMMARY}}
    </section>

    <section class="card">
      <h2>Leaderboard</h2>
      {{LEADERBOARD}}
    </section>

    <section class="card">
      <h2>Cumulative steps</h2>
      {{CHART}}
    </section>

    <section class="card">
      <h2>Badges</h2>
      <div class="badges">{{BADGES}}</div>
    </section>

    <p class="hint">Badges go to whoever got there first. Current-best badges move as the standings change.</p>
  </main>
</body>
</html>
"#;
