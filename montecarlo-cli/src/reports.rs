use anyhow::Result;
use colored::Colorize;
use montecarlo::numbers::ratio;
use montecarlo::{DiceGame, ExperimentReport, Face, OutcomeCount, PlayView, TableFormat};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Most frequent outcomes listed in console and markdown reports.
const TOP_OUTCOMES: usize = 10;

pub fn generate_console_report<F: Face>(
    out: &mut dyn Write,
    report: &ExperimentReport<F>,
    duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Play Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===============".cyan())?;
    writeln!(out, "Dice: {}", report.n_dice)?;
    writeln!(out, "Rolls: {}", report.n_rolls)?;
    writeln!(out, "Seed: {}", report.seed)?;
    writeln!(
        out,
        "Jackpots: {} ({:.1}%)",
        report.jackpots.to_string().green(),
        report.jackpot_rate * 100.0
    )?;
    writeln!(out, "Elapsed: {duration:?}")?;
    writeln!(out)?;

    writeln!(out, "{}", "🎲 Face Totals".bright_yellow().bold())?;
    writeln!(out, "{}", "==============".yellow())?;
    let rolled = report.n_dice * report.n_rolls;
    for (face, total) in &report.face_totals {
        writeln!(
            out,
            "  {:>8}  {total:>8}  {:>5.1}%",
            face.to_string(),
            ratio(*total, rolled) * 100.0
        )?;
    }
    writeln!(out)?;

    write_console_outcomes(
        out,
        "🔢 Top Combinations",
        report.combinations.entries(),
        report.n_rolls,
    )?;
    write_console_outcomes(
        out,
        "🔀 Top Permutations",
        report.permutations.entries(),
        report.n_rolls,
    )?;
    Ok(())
}

fn write_console_outcomes<F: Face>(
    out: &mut dyn Write,
    title: &str,
    entries: &[OutcomeCount<F>],
    n_rolls: usize,
) -> Result<()> {
    writeln!(out, "{}", title.bright_blue().bold())?;
    writeln!(out, "{}", "=".repeat(20).blue())?;
    writeln!(out, "Distinct: {}", entries.len())?;
    for entry in most_frequent(entries) {
        writeln!(
            out,
            "  {:<24} {:>8}  {:>5.1}%",
            format_outcome(&entry.outcome),
            entry.count,
            ratio(entry.count, n_rolls) * 100.0
        )?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn generate_json_report<F: Face + Serialize>(
    out: &mut dyn Write,
    report: &ExperimentReport<F>,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report<F: Face>(
    out: &mut dyn Write,
    report: &ExperimentReport<F>,
) -> Result<()> {
    writeln!(out, "# Monte Carlo Dice Results\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Dice**: {}", report.n_dice)?;
    writeln!(out, "- **Rolls**: {}", report.n_rolls)?;
    writeln!(out, "- **Seed**: {}", report.seed)?;
    writeln!(
        out,
        "- **Jackpots**: {} ({:.1}%)\n",
        report.jackpots,
        report.jackpot_rate * 100.0
    )?;

    writeln!(out, "## Face Totals\n")?;
    writeln!(out, "| Face | Count |")?;
    writeln!(out, "| --- | --- |")?;
    for (face, total) in &report.face_totals {
        writeln!(out, "| {face} | {total} |")?;
    }
    writeln!(out)?;

    writeln!(out, "## Combinations (`{}`)\n", report.combinations.label())?;
    write_markdown_outcomes(out, report.combinations.entries())?;
    writeln!(out, "## Permutations (`{}`)\n", report.permutations.label())?;
    write_markdown_outcomes(out, report.permutations.entries())?;
    Ok(())
}

fn write_markdown_outcomes<F: Face>(
    out: &mut dyn Write,
    entries: &[OutcomeCount<F>],
) -> Result<()> {
    writeln!(out, "| Outcome | Count |")?;
    writeln!(out, "| --- | --- |")?;
    for entry in most_frequent(entries) {
        writeln!(out, "| {} | {} |", format_outcome(&entry.outcome), entry.count)?;
    }
    if entries.len() > TOP_OUTCOMES {
        writeln!(out, "\n_{} more omitted._", entries.len() - TOP_OUTCOMES)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Face counts per roll as CSV: `roll,<face>,<face>,...`.
pub fn generate_csv_report<F: Face>(
    out: &mut dyn Write,
    report: &ExperimentReport<F>,
) -> Result<()> {
    let header: Vec<String> = report
        .face_counts
        .faces()
        .iter()
        .map(ToString::to_string)
        .collect();
    writeln!(out, "roll,{}", header.join(","))?;
    for (roll, row) in report.face_counts.rows().iter().enumerate() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        writeln!(out, "{roll},{}", cells.join(","))?;
    }
    Ok(())
}

/// Print the game's most recent play as CSV in the requested layout.
pub fn write_play_table<F: Face>(
    out: &mut dyn Write,
    game: &DiceGame<F>,
    format: TableFormat,
) -> Result<()> {
    writeln!(out)?;
    match game.most_recent_play(format) {
        None => writeln!(out, "No dice have been rolled yet!")?,
        Some(PlayView::Wide(table)) => {
            let header: Vec<String> = table
                .die_ids()
                .iter()
                .map(|die| format!("die_{die}"))
                .collect();
            writeln!(out, "roll,{}", header.join(","))?;
            for (roll, row) in table.rows().iter().enumerate() {
                let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                writeln!(out, "{roll},{}", cells.join(","))?;
            }
        }
        Some(PlayView::Narrow(rows)) => {
            writeln!(out, "roll,die,outcome")?;
            for row in rows {
                writeln!(out, "{},{},{}", row.roll, row.die, row.outcome)?;
            }
        }
    }
    Ok(())
}

fn most_frequent<F: Face>(entries: &[OutcomeCount<F>]) -> Vec<&OutcomeCount<F>> {
    let mut sorted: Vec<&OutcomeCount<F>> = entries.iter().collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.outcome.cmp(&b.outcome)));
    sorted.truncate(TOP_OUTCOMES);
    sorted
}

fn format_outcome<F: Face>(outcome: &[F]) -> String {
    let faces: Vec<String> = outcome.iter().map(ToString::to_string).collect();
    format!("({})", faces.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use montecarlo::{ExperimentConfig, FaceValue};

    fn sample_report() -> (DiceGame<FaceValue>, ExperimentReport<FaceValue>) {
        let cfg = ExperimentConfig::from_json(
            r#"{"faces": [1, 2, 3, 4, 5, 6], "dice": 2, "rolls": 12, "seed": 42}"#,
        )
        .unwrap();
        cfg.run().unwrap()
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn console_report_lists_summary_and_faces() {
        let (_, report) = sample_report();
        let text = render(|out| generate_console_report(out, &report, Duration::from_millis(3)));
        assert!(text.contains("Play Summary"));
        assert!(text.contains("Rolls: 12"));
        assert!(text.contains("Top Combinations"));
        assert!(text.contains("Top Permutations"));
    }

    #[test]
    fn json_report_round_trips_into_value() {
        let (_, report) = sample_report();
        let text = render(|out| generate_json_report(out, &report));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["n_rolls"], 12);
        assert_eq!(value["combinations"]["label"], "ordered_rolls");
        assert_eq!(value["permutations"]["label"], "rolls");
    }

    #[test]
    fn markdown_report_has_sections() {
        let (_, report) = sample_report();
        let text = render(|out| generate_markdown_report(out, &report));
        assert!(text.starts_with("# Monte Carlo Dice Results"));
        assert!(text.contains("## Combinations (`ordered_rolls`)"));
        assert!(text.contains("## Permutations (`rolls`)"));
    }

    #[test]
    fn csv_report_has_one_column_per_face() {
        let (_, report) = sample_report();
        let text = render(|out| generate_csv_report(out, &report));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("roll,1,2,3,4,5,6"));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 12);
        for row in rows {
            let sum: usize = row.split(',').skip(1).map(|c| c.parse::<usize>().unwrap()).sum();
            assert_eq!(sum, 2);
        }
    }

    #[test]
    fn play_table_renders_both_layouts() {
        let (game, _) = sample_report();
        let wide = render(|out| write_play_table(out, &game, TableFormat::Wide));
        assert!(wide.contains("roll,die_0,die_1"));
        assert_eq!(wide.lines().filter(|line| !line.is_empty()).count(), 13);

        let narrow = render(|out| write_play_table(out, &game, TableFormat::Narrow));
        assert!(narrow.contains("roll,die,outcome"));
        assert_eq!(narrow.lines().filter(|line| !line.is_empty()).count(), 25);
    }

    #[test]
    fn unplayed_game_prints_sentinel() {
        let cfg = ExperimentConfig::from_json(r#"{"faces": ["H", "T"]}"#).unwrap();
        let game = cfg.build_game().unwrap();
        let text = render(|out| write_play_table(out, &game, TableFormat::Wide));
        assert!(text.contains("No dice have been rolled yet!"));
    }

    #[test]
    fn outcomes_sort_by_count_then_tuple() {
        let entries = vec![
            OutcomeCount { outcome: vec![2, 2], count: 1 },
            OutcomeCount { outcome: vec![1, 2], count: 3 },
            OutcomeCount { outcome: vec![1, 1], count: 1 },
        ];
        let sorted = most_frequent(&entries);
        assert_eq!(sorted[0].outcome, vec![1, 2]);
        assert_eq!(sorted[1].outcome, vec![1, 1]);
        assert_eq!(format_outcome(&sorted[2].outcome), "(2, 2)");
    }
}
