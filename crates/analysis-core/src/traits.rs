use crate::{
    CompanyProfile, FundamentalReport, PriceSeries, QuarterlyStatement, ReportError,
    TechnicalReport,
};
use async_trait::async_trait;

/// Trait for technical analysis engines
#[async_trait]
pub trait TechnicalAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        symbol: &str,
        prices: &PriceSeries,
    ) -> Result<TechnicalReport, ReportError>;
}

/// Trait for fundamental analysis engines
#[async_trait]
pub trait FundamentalAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        symbol: &str,
        profile: &CompanyProfile,
        statements: &[QuarterlyStatement],
    ) -> Result<FundamentalReport, ReportError>;
}
