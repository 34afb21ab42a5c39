//! Console and JSON rendering of opportunities.

use std::fmt;

use owo_colors::{OwoColorize, Style};
use rust_decimal::Decimal;

use crate::arbitrage::Opportunity;
use crate::odds::Region;

/// Scan settings echoed at the top of the text report.
#[derive(Debug, Clone, Copy)]
pub struct ReportHeader {
    /// Region scanned.
    pub region: Region,
    /// Cutoff in percent, as the user entered it.
    pub cutoff_percent: Decimal,
}

/// Human-readable report.
pub struct TextReport<'a> {
    header: ReportHeader,
    opportunities: &'a [Opportunity],
    styled: bool,
}

impl<'a> TextReport<'a> {
    /// Wrap opportunities for display.
    pub fn new(header: ReportHeader, opportunities: &'a [Opportunity]) -> Self {
        Self {
            header,
            opportunities,
            styled: false,
        }
    }

    /// Highlight stakes, outcomes and bookmakers with ANSI colours.
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    fn paint(&self, text: impl fmt::Display, style: Style) -> String {
        if self.styled {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "In region {} with {} percent margin",
            self.header.region, self.header.cutoff_percent
        )?;
        writeln!(
            f,
            "{} arbitrage opportunities found",
            self.opportunities.len()
        )?;

        let amount = Style::new().green();
        let outcome = Style::new().bold().white();

        for opp in self.opportunities {
            writeln!(
                f,
                "\t{}",
                self.paint(
                    format!("{} in {}", opp.match_name, opp.league),
                    Style::new().italic()
                )
            )?;
            writeln!(
                f,
                "\t\tTotal implied odds: {} with these odds:",
                opp.total_implied_odds.round_dp(4)
            )?;
            for stake in &opp.best_outcome_odds {
                writeln!(
                    f,
                    "\t\tBet {} on {} with {} for {}",
                    self.paint(format!("{:.2}", stake.stake), amount),
                    self.paint(&stake.outcome, Style::new().bold().red()),
                    self.paint(&stake.bookmaker, Style::new().yellow()),
                    stake.odds
                )?;
            }
            writeln!(
                f,
                "\t\tMax Profit: {} with {} as the outcome",
                self.paint(format!("{:.2}", opp.max_profit.amount), amount),
                self.paint(&opp.max_profit.outcome, outcome)
            )?;
            writeln!(
                f,
                "\t\tMin Profit: {} with {} as the outcome",
                self.paint(format!("{:.2}", opp.min_profit.amount), amount),
                self.paint(&opp.min_profit.outcome, outcome)
            )?;
        }

        Ok(())
    }
}

/// Render the text report.
pub fn render_text(header: ReportHeader, opportunities: &[Opportunity]) -> String {
    TextReport::new(header, opportunities).to_string()
}

/// Render opportunities as pretty-printed JSON.
pub fn render_json(opportunities: &[Opportunity]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(opportunities)
}
