//! Valuation stages and the engine that runs them

pub mod bridge;
pub mod cash_flow;
pub mod dcf;
pub mod discount;
pub mod projection;
pub mod result;

pub use bridge::{Discounted, ShareCount};
pub use cash_flow::CashFlowProfile;
pub use dcf::DcfEngine;
pub use discount::{CapitalStructure, DiscountRate};
pub use result::{AssumptionSnapshot, ValuationBreakdown, ValuationResult};
