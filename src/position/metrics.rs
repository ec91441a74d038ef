use crate::models::RiskLevel;

/// Health factor at or above which a position is `LOW` risk.
pub const LOW_RISK_HEALTH_FACTOR: f64 = 2.0;
/// Health factor at or above which a position is `MEDIUM` risk.
pub const MEDIUM_RISK_HEALTH_FACTOR: f64 = 1.5;

/// Metrics derived from collateral and debt totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskMetrics {
    pub health_factor: f64,
    pub risk_level: RiskLevel,
    /// Debt over collateral; `None` when there is debt but no collateral.
    pub liquidation_price: Option<f64>,
}

/// Compute health factor, risk level and liquidation price.
///
/// With no debt the position carries no risk and both ratios are 0. Debt
/// against zero collateral yields a health factor of 0 (`HIGH`) and no
/// liquidation price rather than an infinite one.
pub fn compute_metrics(collateral_value: f64, debt_value: f64) -> RiskMetrics {
    if debt_value <= 0.0 {
        return RiskMetrics {
            health_factor: 0.0,
            risk_level: RiskLevel::NoRisk,
            liquidation_price: Some(0.0),
        };
    }

    let health_factor = collateral_value / debt_value;
    let liquidation_price = if collateral_value > 0.0 {
        Some(debt_value / collateral_value)
    } else {
        None
    };

    RiskMetrics {
        health_factor,
        risk_level: classify(health_factor),
        liquidation_price,
    }
}

fn classify(health_factor: f64) -> RiskLevel {
    if health_factor >= LOW_RISK_HEALTH_FACTOR {
        RiskLevel::Low
    } else if health_factor >= MEDIUM_RISK_HEALTH_FACTOR {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
