use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily close-price history, chronological, immutable once fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Highest close over the whole window
    pub fn all_time_high(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.close)
            .fold(None, |acc, c| match acc {
                Some(max) if max >= c => Some(max),
                _ => Some(c),
            })
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One fiscal quarter of the income statement, amounts in source currency.
/// A vector of these is ordered most recent period first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyStatement {
    pub period_end: NaiveDate,
    pub total_revenue: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
}

/// Company metadata. Absent fields stay `None` until the presentation
/// boundary substitutes the "not available" strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub market_cap: Option<f64>,
    pub long_summary: Option<String>,
    pub trailing_pe: Option<f64>,
}

/// Which lookup produced the conversion rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    Primary,
    Secondary,
    Fallback,
}

/// USD to INR conversion rate, fetched once per run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate: f64,
    pub source: RateSource,
}

/// Verdict on the all-time-high drawdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawdownAdvice {
    RecommendBuy,
    WatchForSupport,
    NotTheRightTime,
}

impl DrawdownAdvice {
    pub fn label(&self) -> &'static str {
        match self {
            DrawdownAdvice::RecommendBuy => "Recommend to Buy",
            DrawdownAdvice::WatchForSupport => "Watch for support levels",
            DrawdownAdvice::NotTheRightTime => "Not the right time to buy, please wait.",
        }
    }
}

/// Verdict on the momentum oscillator level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MomentumAdvice {
    BuyLowerRange,
    Hold,
    NotRecommended,
}

impl MomentumAdvice {
    pub fn label(&self) -> &'static str {
        match self {
            MomentumAdvice::BuyLowerRange => "Recommend to Buy (RSI is in the lower range)",
            MomentumAdvice::Hold => "Hold until RSI drops or reaches a support level",
            MomentumAdvice::NotRecommended => "Not recommended to Buy (RSI is high)",
        }
    }
}

/// Verdict on the trailing valuation multiple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationAdvice {
    VeryGoodBuy,
    WaitForSupport,
    DoNotBuy,
    NotAvailable,
}

impl ValuationAdvice {
    pub fn label(&self) -> &'static str {
        match self {
            ValuationAdvice::VeryGoodBuy => "Very good buy (Not at all overvalued)",
            ValuationAdvice::WaitForSupport => "Wait until support or RSI",
            ValuationAdvice::DoNotBuy => "Do not buy (It is overvalued)",
            ValuationAdvice::NotAvailable => "PE Ratio not available for this stock.",
        }
    }
}

/// Verdict on the quarter-over-quarter fundamentals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendAdvice {
    RecommendedToBuy,
    BuyAtOwnRisk,
    RecommendedNotToBuy,
}

impl TrendAdvice {
    pub fn label(&self) -> &'static str {
        match self {
            TrendAdvice::RecommendedToBuy => {
                "Recommended To Buy (Fundamentals Has Increased From The Previous Quarter)"
            }
            TrendAdvice::BuyAtOwnRisk => {
                "Buy At Your Own Risk (Net Profit And Operating Profit Is Less Than The Previous Quarter)"
            }
            TrendAdvice::RecommendedNotToBuy => {
                "Recommended Not To Buy (Fundamentals Has Decreased From The Previous Quarter)"
            }
        }
    }
}

/// Combined verdict over both analyses and the company profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalConclusion {
    SwingTrading,
    LongTermInvestment,
    Avoid,
}

impl FinalConclusion {
    pub fn label(&self) -> &'static str {
        match self {
            FinalConclusion::SwingTrading => {
                "This Stock Is Best For Swing Trading (Hold 2-3 Months)"
            }
            FinalConclusion::LongTermInvestment => {
                "This Stock Is Best For Long Term Investment (1-2 Years)"
            }
            FinalConclusion::Avoid => {
                "This stock does not meet the criteria for swing trading or long-term investment. Please avoid."
            }
        }
    }
}

/// All-time-high drawdown result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownAnalysis {
    pub all_time_high: f64,
    pub current_price: f64,
    pub drawdown_pct: f64,
    pub advice: DrawdownAdvice,
}

/// Momentum oscillator result. `values` is aligned index-for-index with the
/// close series it was computed from, so the chart can share the date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumAnalysis {
    pub values: Vec<f64>,
    pub latest: f64,
    pub advice: MomentumAdvice,
}

/// Output of the technical engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub drawdown: DrawdownAnalysis,
    pub momentum: MomentumAnalysis,
}

/// Valuation multiple classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationAnalysis {
    pub trailing_pe: Option<f64>,
    pub advice: ValuationAdvice,
}

/// Strict quarter-over-quarter comparison of the two most recent periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendComparison {
    pub revenue_up: bool,
    pub operating_profit_up: bool,
    pub net_profit_up: bool,
    pub advice: TrendAdvice,
}

/// Output of the fundamental engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundamentalReport {
    pub valuation: ValuationAnalysis,
    pub trend: TrendComparison,
}

/// Regional display magnitude for converted amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagnitudeUnit {
    Crore,
    Lakh,
    Unscaled,
}

impl MagnitudeUnit {
    pub fn label(&self) -> &'static str {
        match self {
            MagnitudeUnit::Crore => "Crores",
            MagnitudeUnit::Lakh => "Lakhs",
            MagnitudeUnit::Unscaled => "",
        }
    }
}

/// Amount scaled into its display unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledAmount {
    pub value: f64,
    pub unit: MagnitudeUnit,
}

/// One fiscal quarter converted and scaled for the income chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuarterDisplay {
    pub period_end: NaiveDate,
    pub revenue: ScaledAmount,
    pub operating_profit: ScaledAmount,
    pub net_profit: ScaledAmount,
}

/// Everything the renderer needs: profile, analyses, conclusion and the
/// pre-scaled chart rows. The terminal artifact of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReport {
    pub symbol: String,
    pub profile: CompanyProfile,
    pub prices: PriceSeries,
    pub drawdown: DrawdownAnalysis,
    pub momentum: MomentumAnalysis,
    pub valuation: ValuationAnalysis,
    pub trend: TrendComparison,
    pub quarters: Vec<QuarterDisplay>,
    pub exchange_rate: ExchangeRate,
    pub conclusion: FinalConclusion,
}
