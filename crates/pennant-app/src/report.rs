// Plain-text rendering of the standings table and the single-team view.

use chrono::NaiveDateTime;

use pennant_core::aggregate::{HittingSummary, PitchingSummary};
use pennant_core::model::player::{Hitter, Pitcher};
use pennant_core::model::season::SkippedTeam;
use pennant_core::model::{Role, Team};
use pennant_core::rating::TeamRating;
use pennant_core::standings::{RefreshReport, Standing};

/// What every page prints above its table.
#[derive(Debug, Clone)]
pub struct PageHeader {
    pub year: i32,
    pub progress: f64,
    pub updated: NaiveDateTime,
}

impl PageHeader {
    fn render(&self, title: &str) -> String {
        format!(
            "{title} {}  ({:.1}% of season played, updated {})\n\n",
            self.year,
            self.progress * 100.0,
            self.updated.format("%Y-%m-%d %H:%M")
        )
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

pub fn render_standings(
    header: &PageHeader,
    standings: &[Standing<'_>],
    precision: usize,
    skipped: &[SkippedTeam],
    report: &RefreshReport,
) -> String {
    let mut out = header.render("Standings");
    out.push_str(&format!(
        "{:>4}  {:<16} {:>10} {:>10} {:>10} {:>10}\n",
        "Rank", "Manager", "Rating", "Offense", "Pitching", "Innings"
    ));
    for row in standings {
        out.push_str(&format!(
            "{:>4}  {:<16} {:>10} {:>10.1} {:>10.1} {:>10.1}\n",
            row.rank,
            row.team.manager,
            row.rating.formatted(precision),
            row.rating.offense,
            row.rating.pitching,
            row.rating.innings_bonus_or_penalty,
        ));
    }
    out.push_str(&footer(skipped, report));
    out
}

fn footer(skipped: &[SkippedTeam], report: &RefreshReport) -> String {
    let mut out = String::new();
    if report.failed > 0 {
        out.push_str(&format!(
            "\n{} of {} player stat lookups failed; those players count as zero.\n",
            report.failed,
            report.fetched + report.failed
        ));
    }
    if !skipped.is_empty() {
        out.push('\n');
        for team in skipped {
            out.push_str(&format!("Skipped {}: {}\n", team.manager, team.reason));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Team view
// ---------------------------------------------------------------------------

pub fn render_team(
    header: &PageHeader,
    team: &Team,
    rating: &TeamRating,
    precision: usize,
    report: &RefreshReport,
) -> String {
    let mut out = header.render(&team.manager);
    out.push_str(&format!(
        "Rating {}  (offense {:.1}, pitching {:.1}, innings {:.1})\n",
        rating.formatted(precision),
        rating.offense,
        rating.pitching,
        rating.innings_bonus_or_penalty
    ));

    hitter_group(&mut out, "Starters", Role::Starter, &team.starters, &team.starters_summary());
    hitter_group(&mut out, "Bench", Role::Bench, &team.bench, &team.bench_summary());
    pitcher_group(&mut out, "Rotation", &team.rotation, &team.rotation_summary());
    hitter_group(
        &mut out,
        "Minors hitters",
        Role::Minors,
        &team.minors_hitters,
        &team.minors_hitters_summary(),
    );
    if !team.minors_pitchers.is_empty() {
        pitcher_group(
            &mut out,
            "Minors pitchers",
            &team.minors_pitchers,
            &team.minors_pitchers_summary(),
        );
    }

    out.push_str(&footer(&[], report));
    out
}

fn hitter_group(out: &mut String, label: &str, role: Role, hitters: &[Hitter], total: &HittingSummary) {
    out.push_str(&format!("\n{label} ({}%)\n", role.percent()));
    out.push_str(&format!(
        "{:<24} {:<3} {:<4} {:>5} {:>4} {:>4} {:>4} {:>4} {:>4} {:>6}  {}\n",
        "Name", "Pos", "Team", "AB", "R", "H", "HR", "RBI", "SB", "AVG", "Notes"
    ));
    for h in hitters {
        out.push_str(&format!(
            "{:<24} {:<3} {:<4} {:>5.0} {:>4.0} {:>4.0} {:>4.0} {:>4.0} {:>4.0} {:>6}  {}\n",
            h.info.name,
            h.info.position.display_str(),
            h.info.team,
            h.ab(),
            h.runs(),
            h.hits(),
            h.hr(),
            h.rbi(),
            h.sb(),
            h.formatted_avg(),
            h.info.notes().trim_start(),
        ));
    }
    out.push_str(&format!(
        "{:<24} {:<3} {:<4} {:>5.0} {:>4.0} {:>4.0} {:>4.0} {:>4.0} {:>4.0} {:>6}\n",
        "Total",
        "",
        "",
        total.ab,
        total.runs,
        total.hits,
        total.hr,
        total.rbi,
        total.sb,
        total.formatted_avg(),
    ));
}

fn pitcher_group(out: &mut String, label: &str, pitchers: &[Pitcher], total: &PitchingSummary) {
    out.push_str(&format!("\n{label}\n"));
    out.push_str(&format!(
        "{:<24} {:<4} {:>7} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5}  {}\n",
        "Name", "Team", "IP", "ER", "W", "SV", "K", "BB", "ERA", "Notes"
    ));
    for p in pitchers {
        out.push_str(&format!(
            "{:<24} {:<4} {:>7} {:>4.0} {:>4.0} {:>4.0} {:>4.0} {:>4.0} {:>5}  {}\n",
            p.info.name,
            p.info.team,
            p.formatted_ip(),
            p.er(),
            p.wins(),
            p.saves(),
            p.strikeouts(),
            p.walks(),
            p.formatted_era(),
            p.info.notes().trim_start(),
        ));
    }
    out.push_str(&format!(
        "{:<24} {:<4} {:>7} {:>4.0} {:>4.0} {:>4.0} {:>4.0} {:>4.0} {:>5}\n",
        "Total",
        "",
        total.formatted_ip(),
        total.er,
        total.wins,
        total.saves,
        total.strikeouts,
        total.walks,
        total.formatted_era(),
    ));
}
