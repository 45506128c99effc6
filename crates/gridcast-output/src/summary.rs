//! Coverage summary of a fusion run.

use gridcast_data::CoverageCounters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Match counts per category with their share of all games.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoverageSummary {
    /// Games fused.
    pub total_games: usize,

    /// Games with an SP+ rating on either side.
    pub sp_matched: usize,

    /// Games with FBS team info on either side.
    pub team_info_matched: usize,

    /// Games with season stats on either side.
    pub season_stats_matched: usize,
}

impl CoverageSummary {
    /// Percentage of `count` over all games, 0 when there are none.
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            count as f64 / self.total_games as f64 * 100.0
        }
    }

    /// SP+ coverage in percent.
    pub fn sp_pct(&self) -> f64 {
        self.percentage(self.sp_matched)
    }

    /// Team info coverage in percent.
    pub fn team_info_pct(&self) -> f64 {
        self.percentage(self.team_info_matched)
    }

    /// Season stats coverage in percent.
    pub fn season_stats_pct(&self) -> f64 {
        self.percentage(self.season_stats_matched)
    }

    /// Render as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nCoverage: {} games\n", self.total_games));
        output.push_str(&"=".repeat(48));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>12} {:>12}\n",
            "Category", "Matched", "% of Games"
        ));
        output.push_str(&"-".repeat(48));
        output.push('\n');

        for (label, count) in [
            ("SP+ ratings", self.sp_matched),
            ("Team info", self.team_info_matched),
            ("Season stats", self.season_stats_matched),
        ] {
            output.push_str(&format!(
                "{:<20} {:>12} {:>11.2}%\n",
                label,
                count,
                self.percentage(count)
            ));
        }

        output.push_str(&"=".repeat(48));
        output.push('\n');
        output
    }
}

impl From<&CoverageCounters> for CoverageSummary {
    fn from(counters: &CoverageCounters) -> Self {
        Self {
            total_games: counters.total_games,
            sp_matched: counters.sp_matched,
            team_info_matched: counters.team_info_matched,
            season_stats_matched: counters.season_stats_matched,
        }
    }
}

impl fmt::Display for CoverageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: SP+ {}/{} ({:.1}%), team info {}/{} ({:.1}%), season stats {}/{} ({:.1}%)",
            self.total_games,
            self.sp_matched,
            self.total_games,
            self.sp_pct(),
            self.team_info_matched,
            self.total_games,
            self.team_info_pct(),
            self.season_stats_matched,
            self.total_games,
            self.season_stats_pct()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> CoverageSummary {
        CoverageSummary {
            total_games: 8,
            sp_matched: 6,
            team_info_matched: 4,
            season_stats_matched: 0,
        }
    }

    #[test]
    fn test_percentages() {
        let s = summary();
        assert!((s.sp_pct() - 75.0).abs() < 1e-10);
        assert!((s.team_info_pct() - 50.0).abs() < 1e-10);
        assert!(s.season_stats_pct().abs() < 1e-10);
    }

    #[test]
    fn test_no_games() {
        let s = CoverageSummary::from(&CoverageCounters::default());
        assert_eq!(s.total_games, 0);
        assert!(s.sp_pct().abs() < 1e-10);
    }

    #[test]
    fn test_ascii_table() {
        let table = summary().to_ascii_table();
        assert!(table.contains("Coverage: 8 games"));
        assert!(table.contains("SP+ ratings"));
        assert!(table.contains("75.00%"));
    }

    #[test]
    fn test_display() {
        let text = summary().to_string();
        assert!(text.starts_with("8 games"));
        assert!(text.contains("SP+ 6/8 (75.0%)"));
    }
}
