//! Terminal rendering of insights, statistics and explorations

use crate::charts::{ChartData, ChartSpec};
use crate::models::{ColumnStatistics, Insights, Plant, StatisticsSummary};
use crate::session::Exploration;
use crate::transform::INSIGHT_FIELDS;
use colored::*;

const STATISTIC_NAMES: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Format a value for display, showing undefined values as `n/a`
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Key insights block shown on the home view
pub fn render_insights(plant: Plant, insights: &Insights) -> String {
    let width = INSIGHT_FIELDS.iter().map(|f| f.label.len()).max().unwrap_or(0);

    let mut lines = vec![format!("Key Insights for {}", plant).bright_green().bold().to_string()];
    lines.extend(INSIGHT_FIELDS.iter().map(|field| {
        format!(
            "  {:<width$}  {}",
            field.label.bright_cyan(),
            format_value(insights.get(field.key)).bright_yellow(),
            width = width
        )
    }));

    join_lines(lines)
}

/// Statistics table in `describe` layout, one row per column
pub fn render_statistics(summary: &StatisticsSummary) -> String {
    if summary.is_empty() {
        return join_lines(vec!["No numeric columns to describe".bright_black().to_string()]);
    }

    let name_width = summary
        .columns
        .iter()
        .map(|s| s.column.len())
        .max()
        .unwrap_or(0)
        .max(6);

    let header: String = STATISTIC_NAMES
        .iter()
        .map(|name| format!(" {:>12}", name))
        .collect();
    let mut lines = vec![
        format!("{:<width$}{}", "column", header, width = name_width)
            .bold()
            .to_string(),
    ];

    for stats in &summary.columns {
        let cells: String = statistic_cells(stats)
            .iter()
            .map(|cell| format!(" {:>12}", cell))
            .collect();
        lines.push(format!(
            "{:<width$}{}",
            stats.column.bright_cyan(),
            cells,
            width = name_width
        ));
    }

    join_lines(lines)
}

fn statistic_cells(stats: &ColumnStatistics) -> [String; 8] {
    [
        stats.count.to_string(),
        format_value(stats.mean),
        format_value(stats.std),
        format_value(stats.min),
        format_value(stats.p25),
        format_value(stats.p50),
        format_value(stats.p75),
        format_value(stats.max),
    ]
}

/// Summary of the data behind a prepared chart
pub fn render_chart(spec: &ChartSpec, data: &ChartData) -> String {
    let mut lines = vec![
        spec.title.bright_green().bold().to_string(),
        spec.caption.bright_black().to_string(),
    ];

    match data {
        ChartData::Series(frame) => {
            lines.push(format!(
                "  {} points of {}",
                frame.height(),
                spec.y.join(", ").bright_cyan()
            ));
            if let Some(x) = spec.x {
                lines.push(format!("  against {}", x.bright_cyan()));
            }
        }
        ChartData::Box(summary) => {
            lines.push(format!(
                "  min {}  q1 {}  median {}  q3 {}  max {}  ({} values)",
                format_value(summary.min),
                format_value(summary.q1),
                format_value(summary.median),
                format_value(summary.q3),
                format_value(summary.max),
                summary.count
            ));
        }
        ChartData::Histogram(bins) => {
            let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
            lines.extend(bins.iter().map(|bin| {
                let bar_len = (bin.count * 40).div_ceil(peak);
                format!(
                    "  [{:>10}, {:>10}] {:>7} {}",
                    format_value(bin.start),
                    format_value(bin.end),
                    bin.count,
                    "#".repeat(bar_len).bright_yellow()
                )
            }));
        }
        ChartData::Correlation(matrix) => {
            let width = matrix.columns.iter().map(String::len).max().unwrap_or(0);
            let header: String = matrix
                .columns
                .iter()
                .map(|column| format!(" {:>width$}", column, width = width))
                .collect();
            lines.push(format!("  {:<width$}{}", "", header, width = width));

            for (column, row) in matrix.columns.iter().zip(&matrix.values) {
                let cells: String = row
                    .iter()
                    .map(|value| format!(" {:>width$}", format_value(*value), width = width))
                    .collect();
                lines.push(format!(
                    "  {:<width$}{}",
                    column.bright_cyan(),
                    cells,
                    width = width
                ));
            }
        }
    }

    join_lines(lines)
}

/// Full explore view: applied range, window, optional statistics and chart
pub fn render_exploration(plant: Plant, exploration: &Exploration) -> String {
    let data = &exploration.data;

    let range = match &exploration.range {
        Some(range) => format!(
            "{} to {}",
            range.start.to_string().bright_cyan(),
            range.end.to_string().bright_cyan()
        ),
        None => "no readings".bright_black().to_string(),
    };

    let mut out = join_lines(vec![
        format!("{} {} data", plant, data.kind().label())
            .bright_green()
            .bold()
            .to_string(),
        format!("  Range:  {}", range),
        format!("  Rows:   {}", data.height().to_string().bright_yellow()),
        format!(
            "  Window: {} ({})",
            exploration.window.to_string().bright_yellow(),
            data.kind().smoothed_column_name()
        ),
    ]);

    if let Some(statistics) = &exploration.statistics {
        out.push('\n');
        out.push_str(&join_lines(vec!["Statistics".bright_green().bold().to_string()]));
        out.push_str(&render_statistics(statistics));
    }

    if let Some((spec, chart)) = &exploration.chart {
        out.push('\n');
        out.push_str(&render_chart(spec, chart));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{BoxSummary, ChartKind, chart_spec};
    use crate::models::DataKind;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.23456), "1.23");
        assert_eq!(format_value(f64::NAN), "n/a");
    }

    #[test]
    fn test_insights_use_display_labels() {
        let insights = Insights {
            max_ac_power: 1410.25,
            ..Insights::default()
        };

        let rendered = render_insights(Plant::Plant1, &insights);

        assert!(rendered.contains("Plant 1"));
        for field in &INSIGHT_FIELDS {
            assert!(rendered.contains(field.label), "missing {}", field.label);
        }
        assert!(rendered.contains("1410.25"));
        assert!(rendered.contains("n/a"));
    }

    #[test]
    fn test_statistics_table_rows() {
        let summary = StatisticsSummary {
            columns: vec![
                crate::transform::statistics::describe_values("AC_POWER", &[Some(1.0), Some(3.0)]),
                ColumnStatistics::empty("MA_AC_POWER"),
            ],
        };

        let rendered = render_statistics(&summary);

        assert!(rendered.contains("AC_POWER"));
        assert!(rendered.contains("MA_AC_POWER"));
        assert!(rendered.contains("2.00"));
        assert!(rendered.contains("75%"));
    }

    #[test]
    fn test_render_box_chart() {
        let spec = chart_spec(ChartKind::Boxplot, DataKind::Weather, Plant::Plant2);
        let data = ChartData::Box(BoxSummary {
            count: 3,
            min: 20.0,
            q1: 21.0,
            median: 22.0,
            q3: 23.0,
            max: 24.0,
        });

        let rendered = render_chart(&spec, &data);

        assert!(rendered.contains("Boxplot of Ambient Temperature (Plant 2)"));
        assert!(rendered.contains("22.00"));
        assert!(rendered.contains("3 values"));
    }

    #[test]
    fn test_exploration_lists_range_rows_and_sections() {
        use crate::config::DashboardConfig;
        use crate::session::{ExploreRequest, Session};
        use crate::transform::tests::{generation_dataset, weather_dataset};

        let generation = generation_dataset(
            &["15-05-2020 00:00", "15-05-2020 00:15", "16-05-2020 00:00"],
            &[5.0, 15.0, 25.0],
            &[1.0, 2.0, 3.0],
        );
        let weather = weather_dataset(&["15-05-2020 00:00"], &[22.0], &[0.0]);
        let session = Session::from_datasets(DashboardConfig::default(), generation, weather).unwrap();
        let request = ExploreRequest::new(DataKind::Generation)
            .with_window(2)
            .with_statistics()
            .with_chart(ChartKind::Boxplot);

        let exploration = session.explore(&request).unwrap();
        let rendered = render_exploration(session.plant(), &exploration);

        assert!(rendered.contains("Plant 1 generation data"));
        assert!(rendered.contains("2020-05-15 00:00:00"));
        assert!(rendered.contains("MA_AC_POWER"));
        assert!(rendered.contains("Statistics"));
        assert!(rendered.contains("Boxplot of DC Power (Plant 1)"));
        assert!(rendered.ends_with('\n'));
        assert!(!rendered.ends_with("\n\n"));
    }
}
