//! Soft defaults and their audit trail

use super::concepts::Metric;
use crate::config::{FallbackPolicy, FallbackValues};
use crate::error::{Result, ValuationError};
use serde::{Deserialize, Serialize};

/// A figure that can be replaced by a configured fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackField {
    Depreciation,
    CapitalExpenditures,
    ChangeInWorkingCapital,
    TotalDebt,
    CashAndEquivalents,
    TaxRate,
    Wacc,
}

impl FallbackField {
    fn value_in(self, values: &FallbackValues) -> f64 {
        match self {
            FallbackField::Depreciation => values.depreciation,
            FallbackField::CapitalExpenditures => values.capital_expenditures,
            FallbackField::ChangeInWorkingCapital => values.change_in_working_capital,
            FallbackField::TotalDebt => values.total_debt,
            FallbackField::CashAndEquivalents => values.cash_and_equivalents,
            FallbackField::TaxRate => values.tax_rate,
            FallbackField::Wacc => values.wacc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FallbackField::Depreciation => "depreciation and amortization",
            FallbackField::CapitalExpenditures => "capital expenditures",
            FallbackField::ChangeInWorkingCapital => "change in working capital",
            FallbackField::TotalDebt => "total debt",
            FallbackField::CashAndEquivalents => "cash and equivalents",
            FallbackField::TaxRate => "tax rate",
            FallbackField::Wacc => "wacc",
        }
    }
}

/// Why a value was replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultReason {
    /// No matching concept, or its value did not parse
    Missing,
    /// The computed value was NaN or infinite
    NonFinite,
    /// The computed value fell outside its accepted range
    OutOfRange,
}

/// Which figure was defaulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultedField {
    /// Replaced by a configured fallback
    Fallback(FallbackField),
    /// Missing working-capital component, taken as zero
    ZeroFilled(Metric),
}

/// One substitution made during a valuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftDefault {
    pub field: DefaultedField,
    pub value: f64,
    pub reason: DefaultReason,
}

/// Collects the substitutions of a single valuation
#[derive(Debug)]
pub struct DefaultLedger<'a> {
    ticker: &'a str,
    policy: &'a FallbackPolicy,
    entries: Vec<SoftDefault>,
}

impl<'a> DefaultLedger<'a> {
    pub fn new(ticker: &'a str, policy: &'a FallbackPolicy) -> Self {
        Self {
            ticker,
            policy,
            entries: Vec::new(),
        }
    }

    /// Fallback for `field`, or an error under the strict policy
    pub fn fallback(&mut self, field: FallbackField, reason: DefaultReason) -> Result<f64> {
        let FallbackPolicy::Substitute { values } = self.policy else {
            return Err(ValuationError::StrictDefault {
                ticker: self.ticker.to_string(),
                field: field.label().to_string(),
            });
        };

        let value = field.value_in(values);
        tracing::warn!(
            ticker = self.ticker,
            field = field.label(),
            value,
            ?reason,
            "Substituting default"
        );
        self.entries.push(SoftDefault {
            field: DefaultedField::Fallback(field),
            value,
            reason,
        });
        Ok(value)
    }

    /// Zero for a missing working-capital component; applies under every policy
    pub fn zero_fill(&mut self, metric: Metric) -> f64 {
        tracing::info!(
            ticker = self.ticker,
            field = metric.label(),
            "Working capital component missing, using 0"
        );
        self.entries.push(SoftDefault {
            field: DefaultedField::ZeroFilled(metric),
            value: 0.0,
            reason: DefaultReason::Missing,
        });
        0.0
    }

    pub fn ticker(&self) -> &str {
        self.ticker
    }

    pub fn entries(&self) -> &[SoftDefault] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<SoftDefault> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_records_entry() {
        let policy = FallbackPolicy::default();
        let mut ledger = DefaultLedger::new("AAPL", &policy);

        let value = ledger
            .fallback(FallbackField::Depreciation, DefaultReason::Missing)
            .unwrap();
        assert!((value - 12_000_000_000.0).abs() < f64::EPSILON);

        let value = ledger
            .fallback(FallbackField::Wacc, DefaultReason::OutOfRange)
            .unwrap();
        assert!((value - 0.08).abs() < f64::EPSILON);

        assert_eq!(ledger.entries().len(), 2);
        assert_eq!(
            ledger.entries()[0].field,
            DefaultedField::Fallback(FallbackField::Depreciation)
        );
        assert_eq!(ledger.entries()[1].reason, DefaultReason::OutOfRange);
    }

    #[test]
    fn test_documented_fallbacks() {
        let policy = FallbackPolicy::default();
        let mut ledger = DefaultLedger::new("X", &policy);
        let expected = [
            (FallbackField::CapitalExpenditures, 27_100_000_000.0),
            (FallbackField::ChangeInWorkingCapital, 4_100_000_000.0),
            (FallbackField::TotalDebt, 44_100_000_000.0),
            (FallbackField::CashAndEquivalents, 111_000_000_000.0),
            (FallbackField::TaxRate, 0.18),
        ];
        for (field, want) in expected {
            let got = ledger.fallback(field, DefaultReason::Missing).unwrap();
            assert!((got - want).abs() < f64::EPSILON, "{field:?}");
        }
    }

    #[test]
    fn test_strict_policy_refuses() {
        let policy = FallbackPolicy::Strict;
        let mut ledger = DefaultLedger::new("AAPL", &policy);

        let err = ledger
            .fallback(FallbackField::TotalDebt, DefaultReason::Missing)
            .unwrap_err();
        assert!(matches!(err, ValuationError::StrictDefault { ref field, .. } if field == "total debt"));
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn test_zero_fill_ignores_strict() {
        let policy = FallbackPolicy::Strict;
        let mut ledger = DefaultLedger::new("AAPL", &policy);

        assert!(ledger.zero_fill(Metric::InventoriesChange).abs() < f64::EPSILON);
        assert_eq!(
            ledger.into_entries(),
            vec![SoftDefault {
                field: DefaultedField::ZeroFilled(Metric::InventoriesChange),
                value: 0.0,
                reason: DefaultReason::Missing,
            }]
        );
    }

    #[test]
    fn test_soft_default_serialization() {
        let entry = SoftDefault {
            field: DefaultedField::Fallback(FallbackField::TaxRate),
            value: 0.18,
            reason: DefaultReason::OutOfRange,
        };
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["field"]["fallback"], "tax_rate");
        assert_eq!(json["reason"], "out_of_range");
    }
}
