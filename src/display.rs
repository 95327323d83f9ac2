use analytics::{
    ordinal, FinishMargin, HeadToHeadSummary, MarginDisplay, RankChange, RankingTable,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use core_types::Side;
use exporter::format_speed;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

pub fn ranking_table(table: &RankingTable) -> Table {
    let mut out = new_table(vec!["Rank", "Team", "Speed (m/s)", "Races", "Confidence", "Change"]);
    for row in &table.rankings {
        let change = match row.rank_change {
            RankChange::Unavailable => "-".to_string(),
            RankChange::New => format!("{} new", row.rank_change.trend().symbol()),
            RankChange::Moved(delta) => format!("{} {:+}", row.rank_change.trend().symbol(), delta)
                .trim()
                .to_string(),
        };
        out.add_row(vec![
            row.rank.to_string(),
            row.team_name.clone(),
            format_speed(row.adjusted_speed),
            row.sample_count.to_string(),
            row.confidence().to_string(),
            change,
        ]);
    }
    out
}

pub fn head_to_head_table(summary: &HeadToHeadSummary, mode: MarginDisplay) -> Table {
    let mut out = new_table(vec!["Date", "Race", "Winner", "Margin"]);
    for meeting in &summary.meetings {
        let winner = match meeting.winner {
            Some(Side::A) => summary.team_a.as_str(),
            Some(Side::B) => summary.team_b.as_str(),
            None => "undecided",
        };
        let margin = meeting
            .margin
            .as_ref()
            .map(|m| m.render(mode, &summary.boat_class))
            .unwrap_or_else(|| "by place".to_string());
        out.add_row(vec![
            meeting.recorded_at.date_naive().to_string(),
            meeting.race_id.clone(),
            winner.to_string(),
            margin,
        ]);
    }
    out
}

pub fn race_table(margins: &[FinishMargin]) -> Table {
    let mut out = new_table(vec!["Place", "Team", "Time (s)", "Gap"]);
    for margin in margins {
        out.add_row(vec![
            ordinal(margin.position),
            margin.team_name.clone(),
            margin
                .finish_time_seconds
                .map(|t| format!("{:.1}", t))
                .unwrap_or_else(|| "-".to_string()),
            margin.caption(),
        ]);
    }
    out
}
