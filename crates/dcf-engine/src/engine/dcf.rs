//! Discounted cash flow valuation engine

use super::bridge::{self, corrected_shares};
use super::cash_flow::derive_cash_flow;
use super::discount::{CapitalStructure, weighted_average_cost_of_capital};
use super::projection::{project_cash_flows, terminal_value};
use super::result::{AssumptionSnapshot, ValuationBreakdown, ValuationResult};
use crate::config::ValuationConfig;
use crate::error::{Result, ValuationError};
use crate::extract::{DefaultLedger, extract_financials};
use crate::inputs::ValuationInputs;
use crate::report::select_latest_annual;
use tracing::{debug, info, instrument};

/// Values a single ticker from its filings, quote and risk inputs
///
/// The engine holds only its configuration; `compute` does no I/O and keeps
/// no state between calls, so one engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct DcfEngine {
    config: ValuationConfig,
}

impl DcfEngine {
    /// Create an engine with the given configuration
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    /// Compute the price target for `inputs.ticker`
    #[instrument(skip(self, inputs), fields(ticker = %inputs.ticker))]
    pub fn compute(&self, inputs: &ValuationInputs) -> Result<ValuationResult> {
        let ticker = inputs.ticker.as_str();
        let config = &self.config;

        let assumptions = inputs.options.resolve(ticker, config)?;
        let (_, statements) = select_latest_annual(ticker, &inputs.reports)?;

        let mut ledger = DefaultLedger::new(ticker, &config.fallback_policy);
        let financials = extract_financials(statements, config, &mut ledger)?;
        let shares = corrected_shares(ticker, inputs.market_data.shares_outstanding, config)?;
        let cash_flow = derive_cash_flow(&financials.operating, config.max_tax_rate, &mut ledger)?;

        let rate = weighted_average_cost_of_capital(
            &inputs.risk_metrics,
            &CapitalStructure {
                stock_price: inputs.market_data.stock_price,
                shares_outstanding: shares.used,
                total_debt: financials.balance.total_debt,
                tax_rate: cash_flow.tax_rate,
            },
            config.cost_of_debt,
            (config.min_wacc, config.max_wacc),
            &mut ledger,
        )?;

        let projected = project_cash_flows(
            cash_flow.initial_fcf,
            assumptions.growth_rate,
            assumptions.projection_years,
        );
        let final_fcf = projected.last().copied().unwrap_or(cash_flow.initial_fcf);
        let terminal = terminal_value(
            ticker,
            final_fcf,
            rate.wacc,
            assumptions.terminal_growth_rate,
        )?;

        let discounted = bridge::discount(&projected, terminal, rate.wacc);
        let equity_value = bridge::equity_value(
            discounted.present_value,
            financials.balance.cash_and_equivalents,
            financials.balance.total_debt,
        );
        let equity_value = finite(ticker, "equity value", equity_value)?;
        let price_target = finite(ticker, "price target", equity_value / shares.used)?;
        debug!(
            discounted_fcfs = ?discounted.cash_flows,
            terminal_value = terminal,
            discounted_terminal_value = discounted.terminal_value,
            present_value = discounted.present_value,
            equity_value,
            "Discounted to equity"
        );

        let defaults = ledger.into_entries();
        info!(
            price_target,
            wacc = rate.wacc,
            defaults = defaults.len(),
            "Valuation complete"
        );

        Ok(ValuationResult {
            ticker: inputs.ticker.clone(),
            price_target,
            wacc: rate.wacc,
            raw_wacc: rate.raw_wacc,
            wacc_clamped: rate.clamped,
            assumptions: AssumptionSnapshot::new(
                &assumptions,
                &inputs.risk_metrics,
                &rate,
                &cash_flow,
            ),
            breakdown: ValuationBreakdown {
                financials,
                nopat: cash_flow.nopat,
                initial_fcf: cash_flow.initial_fcf,
                projected_fcfs: projected,
                discounted_fcfs: discounted.cash_flows,
                terminal_value: terminal,
                discounted_terminal_value: discounted.terminal_value,
                present_value: discounted.present_value,
                equity_value,
                shares,
                stock_price: inputs.market_data.stock_price,
                market_cap: rate.market_cap,
                equity_weight: rate.equity_weight,
                debt_weight: rate.debt_weight,
            },
            defaults,
        })
    }
}

fn finite(ticker: &str, field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValuationError::NonFiniteResult {
            ticker: ticker.to_string(),
            field: field.to_string(),
            value,
        })
    }
}
