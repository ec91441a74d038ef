//! Terminal rendering of the results panel.

use crate::dashboard::{QueryOutcome, ViewState};
use crate::models::{PositionSnapshot, RiskLevel};
use crate::utils::format_number;
use dialoguer::console::{StyledObject, style};
use std::fmt::Write;

pub const INTRO: &str = "Easily track your DeFi assets, analyze your financial position, and make informed investment decisions by entering your wallet address.";

fn risk_style(level: RiskLevel) -> StyledObject<&'static str> {
    let label = style(level.label());
    match level {
        RiskLevel::Low => label.green(),
        RiskLevel::Medium => label.yellow(),
        RiskLevel::High => label.red(),
        RiskLevel::NoRisk => label.dim(),
    }
}

fn usd(value: f64) -> String {
    format!("${}", format_number(value, 2))
}

pub fn render_text(state: &ViewState) -> String {
    if state.loading {
        return "Loading...\n".to_string();
    }
    match &state.outcome {
        QueryOutcome::Empty => format!("{INTRO}\n"),
        QueryOutcome::Failed(message) => format!("{}\n", style(message).red()),
        QueryOutcome::Ready(snapshot) => render_snapshot(snapshot),
    }
}

pub fn render_json(state: &ViewState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

fn render_snapshot(snapshot: &PositionSnapshot) -> String {
    let p = &snapshot.position;
    let mut out = String::new();

    let _ = writeln!(out, "== Total Collateral Value ==");
    let _ = writeln!(out, "ETH Balance      {} ETH", format_number(p.eth_balance, 4));
    let _ = writeln!(
        out,
        "ETH Value (USD)  {}",
        p.eth_value.map(usd).unwrap_or_else(|| "N/A".into())
    );

    if snapshot.tokens.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Collateral         {}", usd(p.collateral_value));
    let _ = writeln!(out, "Debt               {}", usd(p.debt_value));
    let _ = writeln!(out, "Health Factor      {}", format_number(p.health_factor, 2));
    let _ = writeln!(out, "Risk Level         {}", risk_style(p.risk_level));
    let _ = writeln!(
        out,
        "Liquidation Price  {}",
        p.liquidation_price.map(usd).unwrap_or_else(|| "N/A".into())
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "== Active Token Balance(s) ==");
    for token in snapshot.tokens.iter().filter(|t| t.balance != 0.0) {
        let _ = writeln!(
            out,
            "{:<10} Balance: {:>20}  Value: {}",
            token.symbol,
            format_number(token.balance, 4),
            usd(token.value)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, TokenDisplay};

    fn snapshot(tokens: Vec<TokenDisplay>, liquidation_price: Option<f64>) -> ViewState {
        ViewState {
            generation: 1,
            loading: false,
            outcome: QueryOutcome::Ready(PositionSnapshot {
                address: "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045".into(),
                tokens,
                position: Position {
                    collateral_value: 33000.0,
                    debt_value: 1000.0,
                    health_factor: 33.0,
                    risk_level: RiskLevel::Low,
                    liquidation_price,
                    eth_balance: 1.0,
                    eth_value: None,
                },
            }),
        }
    }

    fn row(symbol: &str, balance: f64, value: f64) -> TokenDisplay {
        TokenDisplay {
            symbol: symbol.into(),
            balance,
            value,
        }
    }

    #[test]
    fn loading_and_empty_states() {
        let mut state = ViewState::default();
        assert!(render_text(&state).contains("Easily track"));
        state.loading = true;
        assert_eq!(render_text(&state), "Loading...\n");
    }

    #[test]
    fn failure_shows_only_the_message() {
        let state = ViewState {
            generation: 2,
            loading: false,
            outcome: QueryOutcome::Failed("Failed to fetch data. Please try again later.".into()),
        };
        let text = render_text(&state);
        assert!(text.contains("Failed to fetch data"));
        assert!(!text.contains("Collateral"));
    }

    #[test]
    fn zero_balances_are_hidden_and_missing_values_show_na() {
        let state = snapshot(
            vec![row("WBTC", 0.5, 30000.0), row("DUST", 0.0, 0.0)],
            None,
        );
        let text = render_text(&state);
        assert!(text.contains("WBTC"));
        assert!(!text.contains("DUST"));
        assert!(text.contains("$30,000.00"));
        assert!(text.contains("ETH Value (USD)  N/A"));
        assert!(text.contains("Liquidation Price  N/A"));
        assert!(text.contains("LOW"));
    }

    #[test]
    fn metrics_block_requires_tokens() {
        let text = render_text(&snapshot(Vec::new(), Some(0.03)));
        assert!(text.contains("ETH Balance      1.0000 ETH"));
        assert!(!text.contains("Health Factor"));
    }

    #[test]
    fn risk_levels_get_distinct_colors() {
        let rendered: Vec<String> = [
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::NoRisk,
        ]
        .into_iter()
        .map(|level| risk_style(level).force_styling(true).to_string())
        .collect();

        for (text, label) in rendered.iter().zip(["LOW", "MEDIUM", "HIGH", "NO RISK"]) {
            assert!(text.starts_with("\x1b["), "{text:?} is not styled");
            assert!(text.contains(label));
        }
        assert_eq!(rendered[0], style("LOW").green().force_styling(true).to_string());
        assert_eq!(rendered[3], style("NO RISK").dim().force_styling(true).to_string());
        assert_ne!(rendered[1], rendered[2]);
    }

    #[test]
    fn json_output_carries_the_record() {
        let json = render_json(&snapshot(vec![row("WBTC", 0.5, 30000.0)], Some(0.03))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"]["status"], "ready");
        assert_eq!(value["outcome"]["data"]["position"]["risk_level"], "LOW");
        assert!(value["outcome"]["data"]["position"]["eth_value"].is_null());
    }
}
