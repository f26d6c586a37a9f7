use analysis_core::{
    CompanyProfile, FinalConclusion, FundamentalAnalyzer, RateSource, ReportError, StockReport,
    TechnicalAnalyzer, TechnicalReport, TrendComparison,
};
use chrono::{Duration, Utc};
use forex_client::ForexClient;
use fundamental_analysis::{FundamentalAnalysisEngine, CRORE};
use technical_analysis::TechnicalAnalysisEngine;
use yahoo_client::{normalize_symbol, YahooClient};

/// Trailing price-history window in calendar days
pub const LOOKBACK_DAYS: i64 = 365;

/// Minimum market cap, in crores, for the long-term rule
pub const LONG_TERM_MIN_CAP_CRORES: f64 = 7000.0;

/// Sectors eligible for the long-term investment rule
pub const FUTURISTIC_SECTORS: [&str; 20] = [
    "Renewable Energy",
    "Electric Vehicles",
    "Artificial Intelligence",
    "Machine Learning",
    "Healthcare",
    "Telemedicine",
    "E-commerce",
    "Logistics",
    "Fintech",
    "Cybersecurity",
    "Agritech",
    "EdTech",
    "Consumer Defensive",
    "Space Technology",
    "Biotechnology",
    "Data Centre",
    "Water Management",
    "Smart Cities",
    "Infrastructure",
    "Financial Services",
];

pub struct ReportOrchestrator {
    yahoo_client: YahooClient,
    forex_client: ForexClient,
    technical_analyzer: TechnicalAnalysisEngine,
    fundamental_analyzer: FundamentalAnalysisEngine,
}

impl ReportOrchestrator {
    pub fn new() -> Self {
        Self {
            yahoo_client: YahooClient::new(),
            forex_client: ForexClient::new(),
            technical_analyzer: TechnicalAnalysisEngine::new(),
            fundamental_analyzer: FundamentalAnalysisEngine::new(),
        }
    }

    /// Run the whole pipeline for one ticker: fetch, analyze, conclude.
    /// Every await is sequential; nothing is cached between runs.
    pub async fn build_report(&self, ticker: &str) -> Result<StockReport, ReportError> {
        let symbol = normalize_symbol(ticker);
        let end = Utc::now().date_naive();
        let start = end - Duration::days(LOOKBACK_DAYS);
        tracing::info!("Building report for {symbol} over {start}..{end}");

        let prices = self.yahoo_client.daily_closes(&symbol, start, end).await?;
        tracing::info!("Fetched {} trading days for {symbol}", prices.len());

        let profile = self.yahoo_client.company_profile(&symbol).await?;
        let statements = self
            .yahoo_client
            .quarterly_income_statements(&symbol)
            .await?;
        tracing::info!("Fetched {} fiscal periods for {symbol}", statements.len());

        let technical = self.technical_analyzer.analyze(&symbol, &prices).await?;
        let fundamental = self
            .fundamental_analyzer
            .analyze(&symbol, &profile, &statements)
            .await?;

        let exchange_rate = self.forex_client.usd_to_inr().await;
        if exchange_rate.source != RateSource::Fallback {
            tracing::info!("USD to INR rate {} ({:?})", exchange_rate.rate, exchange_rate.source);
        }
        let quarters = FundamentalAnalysisEngine::display_rows(&statements, &exchange_rate);

        let conclusion = final_conclusion(&technical, &fundamental.trend, &profile);
        tracing::info!("Final conclusion for {symbol}: {:?}", conclusion);

        Ok(StockReport {
            symbol,
            profile,
            prices,
            drawdown: technical.drawdown,
            momentum: technical.momentum,
            valuation: fundamental.valuation,
            trend: fundamental.trend,
            quarters,
            exchange_rate,
            conclusion,
        })
    }
}

impl Default for ReportOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Combined verdict, evaluated in order with the first match winning:
/// swing-trading setup, then long-term candidate, then avoid. Absent
/// metadata simply fails the long-term rule instead of erroring.
pub fn final_conclusion(
    technical: &TechnicalReport,
    trend: &TrendComparison,
    profile: &CompanyProfile,
) -> FinalConclusion {
    let momentum_low = technical.momentum.latest <= 47.0;
    let drawdown_moderate = (0.0..=75.0).contains(&technical.drawdown.drawdown_pct);
    let fundamentals_up = trend.revenue_up && trend.operating_profit_up && trend.net_profit_up;
    if momentum_low && drawdown_moderate && fundamentals_up {
        return FinalConclusion::SwingTrading;
    }

    let futuristic_sector = profile
        .sector
        .as_deref()
        .is_some_and(|sector| FUTURISTIC_SECTORS.contains(&sector));
    let large_cap = profile
        .market_cap
        .is_some_and(|cap| cap / CRORE >= LONG_TERM_MIN_CAP_CRORES);
    let fair_multiple = profile
        .trailing_pe
        .is_some_and(|pe| (1.0..=30.0).contains(&pe));
    if futuristic_sector && large_cap && fair_multiple {
        return FinalConclusion::LongTermInvestment;
    }

    FinalConclusion::Avoid
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{
        DrawdownAdvice, DrawdownAnalysis, MomentumAdvice, MomentumAnalysis, TrendAdvice,
    };

    fn technical(momentum: f64, drawdown_pct: f64) -> TechnicalReport {
        TechnicalReport {
            drawdown: DrawdownAnalysis {
                all_time_high: 100.0,
                current_price: 100.0 - drawdown_pct,
                drawdown_pct,
                advice: DrawdownAdvice::RecommendBuy,
            },
            momentum: MomentumAnalysis {
                values: vec![momentum],
                latest: momentum,
                advice: MomentumAdvice::Hold,
            },
        }
    }

    fn trend(revenue: bool, operating: bool, net: bool) -> TrendComparison {
        let advice = if revenue && operating && net {
            TrendAdvice::RecommendedToBuy
        } else if revenue {
            TrendAdvice::BuyAtOwnRisk
        } else {
            TrendAdvice::RecommendedNotToBuy
        };
        TrendComparison {
            revenue_up: revenue,
            operating_profit_up: operating,
            net_profit_up: net,
            advice,
        }
    }

    fn profile(sector: Option<&str>, cap_crores: Option<f64>, pe: Option<f64>) -> CompanyProfile {
        CompanyProfile {
            symbol: "TEST.ns".to_string(),
            short_name: Some("Test Labs".to_string()),
            sector: sector.map(str::to_string),
            market_cap: cap_crores.map(|c| c * CRORE),
            long_summary: None,
            trailing_pe: pe,
        }
    }

    #[test]
    fn swing_rule_fires_on_low_momentum_and_rising_fundamentals() {
        let conclusion = final_conclusion(
            &technical(40.0, 30.0),
            &trend(true, true, true),
            &profile(None, None, None),
        );
        assert_eq!(conclusion, FinalConclusion::SwingTrading);
    }

    #[test]
    fn long_term_rule_fires_when_swing_trend_fails() {
        // Spec scenario: Biotechnology, 8000 crore cap, multiple 20, all
        // three quarter comparisons false.
        let conclusion = final_conclusion(
            &technical(40.0, 30.0),
            &trend(false, false, false),
            &profile(Some("Biotechnology"), Some(8000.0), Some(20.0)),
        );
        assert_eq!(conclusion, FinalConclusion::LongTermInvestment);
    }

    #[test]
    fn swing_rule_is_checked_first() {
        // Both rules would match; the swing branch wins by order.
        let conclusion = final_conclusion(
            &technical(40.0, 30.0),
            &trend(true, true, true),
            &profile(Some("Biotechnology"), Some(8000.0), Some(20.0)),
        );
        assert_eq!(conclusion, FinalConclusion::SwingTrading);
    }

    #[test]
    fn high_momentum_blocks_the_swing_rule() {
        let conclusion = final_conclusion(
            &technical(48.0, 30.0),
            &trend(true, true, true),
            &profile(None, None, None),
        );
        assert_eq!(conclusion, FinalConclusion::Avoid);
    }

    #[test]
    fn deep_drawdown_blocks_the_swing_rule() {
        let conclusion = final_conclusion(
            &technical(40.0, 80.0),
            &trend(true, true, true),
            &profile(None, None, None),
        );
        assert_eq!(conclusion, FinalConclusion::Avoid);
    }

    #[test]
    fn absent_multiple_blocks_the_long_term_rule() {
        let conclusion = final_conclusion(
            &technical(60.0, 30.0),
            &trend(false, false, false),
            &profile(Some("Biotechnology"), Some(8000.0), None),
        );
        assert_eq!(conclusion, FinalConclusion::Avoid);
    }

    #[test]
    fn small_cap_blocks_the_long_term_rule() {
        let conclusion = final_conclusion(
            &technical(60.0, 30.0),
            &trend(false, false, false),
            &profile(Some("Biotechnology"), Some(6999.0), Some(20.0)),
        );
        assert_eq!(conclusion, FinalConclusion::Avoid);
    }

    #[test]
    fn unlisted_sector_blocks_the_long_term_rule() {
        let conclusion = final_conclusion(
            &technical(60.0, 30.0),
            &trend(false, false, false),
            &profile(Some("Tobacco"), Some(8000.0), Some(20.0)),
        );
        assert_eq!(conclusion, FinalConclusion::Avoid);
    }
}
