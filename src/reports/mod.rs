use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use muse_score::dataset::{DatasetStats, RegionRecord};
use muse_score::error::ScoringError;
use muse_score::scorer::{ScoreResult, Tier};
use strum::IntoEnumIterator;

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Excellent => Color::Green,
        Tier::Good => Color::Yellow,
        Tier::AtRisk => Color::DarkYellow,
        Tier::FinancialStress => Color::Red,
    }
}

fn opt_amount(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{:.0}", x))
}

fn opt_count(v: Option<u64>) -> String {
    v.map_or_else(|| "-".to_string(), |x| x.to_string())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_score_report(r: &ScoreResult) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Region").add_attribute(Attribute::Bold),
        Cell::new("Mode"),
        Cell::new("Ratio"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Tier").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(&r.region.region_id).add_attribute(Attribute::Bold),
        Cell::new(r.mode),
        Cell::new(format!("{:.3}", r.ratio)).set_alignment(CellAlignment::Right),
        Cell::new(r.score)
            .fg(Color::Cyan)
            .set_alignment(CellAlignment::Right),
        Cell::new(r.tier).fg(tier_color(r.tier)),
    ]);
    println!("\n{}", table);

    let region = &r.region;
    let mut detail = new_table();
    detail.add_row(vec![
        Cell::new("City"),
        Cell::new("State"),
        Cell::new("Ref Income"),
        Cell::new("Population"),
        Cell::new("Density"),
        Cell::new("Businesses"),
    ]);
    detail.add_row(vec![
        Cell::new(&region.city),
        Cell::new(&region.state),
        Cell::new(opt_amount(region.reference_income)),
        Cell::new(opt_count(region.population)),
        Cell::new(opt_amount(region.density)),
        Cell::new(opt_count(region.business_count)),
    ]);
    for i in 2..=5 {
        if let Some(col) = detail.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", detail);

    if let Some(b) = &r.breakdown {
        let mut factors = new_table();
        factors.add_row(vec!["Income", "COLI", "Density", "Housing", "Raw"]);
        factors.add_row(vec![
            format!("{:.2}", b.income_score),
            format!("{:.2}", b.cost_of_living_score),
            format!("{:.2}", b.density_score),
            format!("{:.2}", b.housing_score),
            format!("{:.3}", b.raw),
        ]);
        println!("{}", factors);
    }
}

pub fn print_tier_distribution(results: &[Result<ScoreResult, ScoringError>]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Tier").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Share"),
    ]);

    let total = results.len().max(1) as f64;
    for tier in Tier::iter().rev() {
        let count = results
            .iter()
            .filter(|r| matches!(r, Ok(s) if s.tier == tier))
            .count();
        table.add_row(vec![
            Cell::new(tier).fg(tier_color(tier)),
            Cell::new(count),
            Cell::new(format!("{:.1}%", 100.0 * count as f64 / total)),
        ]);
    }

    let rejected = results.iter().filter(|r| r.is_err()).count();
    table.add_row(vec![
        Cell::new("Rejected"),
        Cell::new(rejected),
        Cell::new(format!("{:.1}%", 100.0 * rejected as f64 / total)),
    ]);

    for i in 1..=2 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\n{}", table);
}

pub fn print_dataset_stats(stats: &DatasetStats) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Regions").add_attribute(Attribute::Bold),
        Cell::new("Unusable Income").fg(Color::Red),
        Cell::new("Max Ref Income"),
        Cell::new("Max Density"),
        Cell::new("Max Income/Cap"),
    ]);
    table.add_row(vec![
        Cell::new(stats.region_count),
        Cell::new(stats.unusable_income_count).fg(Color::Red),
        Cell::new(opt_amount(stats.max_reference_income)),
        Cell::new(opt_amount(stats.max_density)),
        Cell::new(
            stats
                .max_income_per_capita
                .map_or_else(|| "-".to_string(), |x| format!("{:.2}", x)),
        ),
    ]);
    println!("\n{}", table);
}

pub fn print_region_ranking(ranked: &[(&RegionRecord, f64)]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#"),
        Cell::new("Region").add_attribute(Attribute::Bold),
        Cell::new("City"),
        Cell::new("State"),
        Cell::new("Ref Income").fg(Color::Cyan),
    ]);
    for (i, (region, income)) in ranked.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&region.region_id).add_attribute(Attribute::Bold),
            Cell::new(&region.city),
            Cell::new(&region.state),
            Cell::new(format!("{:.0}", income)).fg(Color::Cyan),
        ]);
    }
    if let Some(col) = table.column_mut(4) {
        col.set_cell_alignment(CellAlignment::Right);
    }
    println!("\n{}", table);
}
