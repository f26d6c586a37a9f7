use analysis_core::{
    CompanyProfile, ExchangeRate, FundamentalAnalyzer, FundamentalReport, MagnitudeUnit,
    QuarterDisplay, QuarterlyStatement, ReportError, ScaledAmount, TrendAdvice, TrendComparison,
    ValuationAdvice, ValuationAnalysis,
};
use async_trait::async_trait;

/// One crore in rupees
pub const CRORE: f64 = 1e7;
/// One lakh in rupees
pub const LAKH: f64 = 1e5;

pub struct FundamentalAnalysisEngine;

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    /// Band the trailing valuation multiple. Multiples below 1 (negative or
    /// near-zero earnings) share the do-not-buy outcome with multiples above
    /// 70; the merge is deliberate and recorded in DESIGN.md.
    pub fn classify_valuation(trailing_pe: Option<f64>) -> ValuationAnalysis {
        let advice = match trailing_pe {
            None => ValuationAdvice::NotAvailable,
            Some(pe) if (1.0..=30.0).contains(&pe) => ValuationAdvice::VeryGoodBuy,
            Some(pe) if (31.0..=70.0).contains(&pe) => ValuationAdvice::WaitForSupport,
            Some(_) => ValuationAdvice::DoNotBuy,
        };

        ValuationAnalysis { trailing_pe, advice }
    }

    /// Strict `current > previous` over the two most recent fiscal periods.
    /// Branches are checked in order: the all-three case shadows the
    /// revenue-only case.
    pub fn compare_quarters(
        statements: &[QuarterlyStatement],
    ) -> Result<TrendComparison, ReportError> {
        if statements.len() < 2 {
            return Err(ReportError::MissingData(format!(
                "need two fiscal periods for the trend comparison, have {}",
                statements.len()
            )));
        }

        let current = &statements[0];
        let previous = &statements[1];

        let revenue_up = Self::metric_up(
            "Total Revenue",
            current.total_revenue,
            previous.total_revenue,
        )?;
        let operating_profit_up = Self::metric_up(
            "Operating Income",
            current.operating_income,
            previous.operating_income,
        )?;
        let net_profit_up = Self::metric_up("Net Income", current.net_income, previous.net_income)?;

        let advice = if revenue_up && operating_profit_up && net_profit_up {
            TrendAdvice::RecommendedToBuy
        } else if revenue_up {
            TrendAdvice::BuyAtOwnRisk
        } else {
            TrendAdvice::RecommendedNotToBuy
        };

        Ok(TrendComparison {
            revenue_up,
            operating_profit_up,
            net_profit_up,
            advice,
        })
    }

    fn metric_up(name: &str, current: Option<f64>, previous: Option<f64>) -> Result<bool, ReportError> {
        match (current, previous) {
            (Some(current), Some(previous)) => Ok(current > previous),
            _ => Err(ReportError::MissingData(format!(
                "{name} is absent for one of the two most recent periods"
            ))),
        }
    }

    /// Pick the largest regional unit the amount fills: crores, then lakhs,
    /// then the raw rupee amount.
    pub fn scale_to_unit(amount: f64) -> ScaledAmount {
        if amount >= CRORE {
            ScaledAmount {
                value: amount / CRORE,
                unit: MagnitudeUnit::Crore,
            }
        } else if amount >= LAKH {
            ScaledAmount {
                value: amount / LAKH,
                unit: MagnitudeUnit::Lakh,
            }
        } else {
            ScaledAmount {
                value: amount,
                unit: MagnitudeUnit::Unscaled,
            }
        }
    }

    /// Convert and scale the last four quarters for the income chart. Each
    /// amount picks its own display unit. A quarter missing any line item is
    /// logged and omitted rather than failing the run.
    pub fn display_rows(
        statements: &[QuarterlyStatement],
        exchange_rate: &ExchangeRate,
    ) -> Vec<QuarterDisplay> {
        statements
            .iter()
            .take(4)
            .filter_map(|quarter| {
                match (
                    quarter.total_revenue,
                    quarter.operating_income,
                    quarter.net_income,
                ) {
                    (Some(revenue), Some(operating), Some(net)) => Some(QuarterDisplay {
                        period_end: quarter.period_end,
                        revenue: Self::scale_to_unit(revenue * exchange_rate.rate),
                        operating_profit: Self::scale_to_unit(operating * exchange_rate.rate),
                        net_profit: Self::scale_to_unit(net * exchange_rate.rate),
                    }),
                    _ => {
                        tracing::warn!(
                            "skipping quarter ending {}: income statement line item missing",
                            quarter.period_end
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl FundamentalAnalyzer for FundamentalAnalysisEngine {
    async fn analyze(
        &self,
        _symbol: &str,
        profile: &CompanyProfile,
        statements: &[QuarterlyStatement],
    ) -> Result<FundamentalReport, ReportError> {
        let valuation = Self::classify_valuation(profile.trailing_pe);
        let trend = Self::compare_quarters(statements)?;

        Ok(FundamentalReport { valuation, trend })
    }
}

impl Default for FundamentalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::RateSource;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn quarter(
        year: i32,
        month: u32,
        revenue: Option<f64>,
        operating: Option<f64>,
        net: Option<f64>,
    ) -> QuarterlyStatement {
        QuarterlyStatement {
            period_end: NaiveDate::from_ymd_opt(year, month, 30).unwrap(),
            total_revenue: revenue,
            operating_income: operating,
            net_income: net,
        }
    }

    fn unit_rate() -> ExchangeRate {
        ExchangeRate {
            rate: 1.0,
            source: RateSource::Primary,
        }
    }

    #[test]
    fn valuation_bands() {
        assert_eq!(
            FundamentalAnalysisEngine::classify_valuation(Some(20.0)).advice,
            ValuationAdvice::VeryGoodBuy
        );
        assert_eq!(
            FundamentalAnalysisEngine::classify_valuation(Some(45.0)).advice,
            ValuationAdvice::WaitForSupport
        );
        assert_eq!(
            FundamentalAnalysisEngine::classify_valuation(Some(80.0)).advice,
            ValuationAdvice::DoNotBuy
        );
        assert_eq!(
            FundamentalAnalysisEngine::classify_valuation(None).advice,
            ValuationAdvice::NotAvailable
        );
    }

    #[test]
    fn valuation_below_one_shares_the_do_not_buy_branch() {
        assert_eq!(
            FundamentalAnalysisEngine::classify_valuation(Some(0.5)).advice,
            ValuationAdvice::DoNotBuy
        );
        assert_eq!(
            FundamentalAnalysisEngine::classify_valuation(Some(-12.0)).advice,
            ValuationAdvice::DoNotBuy
        );
        // The float gap between the two bands also lands there.
        assert_eq!(
            FundamentalAnalysisEngine::classify_valuation(Some(30.5)).advice,
            ValuationAdvice::DoNotBuy
        );
    }

    #[test]
    fn all_three_up_recommends_buy() {
        let statements = vec![
            quarter(2025, 6, Some(110.0), Some(55.0), Some(33.0)),
            quarter(2025, 3, Some(100.0), Some(50.0), Some(30.0)),
        ];

        let trend = FundamentalAnalysisEngine::compare_quarters(&statements).unwrap();
        assert!(trend.revenue_up && trend.operating_profit_up && trend.net_profit_up);
        assert_eq!(trend.advice, TrendAdvice::RecommendedToBuy);
    }

    #[test]
    fn revenue_up_alone_is_own_risk() {
        let statements = vec![
            quarter(2025, 6, Some(110.0), Some(45.0), Some(28.0)),
            quarter(2025, 3, Some(100.0), Some(50.0), Some(30.0)),
        ];

        let trend = FundamentalAnalysisEngine::compare_quarters(&statements).unwrap();
        assert_eq!(trend.advice, TrendAdvice::BuyAtOwnRisk);
    }

    #[test]
    fn everything_down_recommends_not_to_buy() {
        let statements = vec![
            quarter(2025, 6, Some(90.0), Some(45.0), Some(28.0)),
            quarter(2025, 3, Some(100.0), Some(50.0), Some(30.0)),
        ];

        let trend = FundamentalAnalysisEngine::compare_quarters(&statements).unwrap();
        assert_eq!(trend.advice, TrendAdvice::RecommendedNotToBuy);
    }

    #[test]
    fn swapping_periods_flips_the_booleans() {
        let newer = quarter(2025, 6, Some(110.0), Some(55.0), Some(33.0));
        let older = quarter(2025, 3, Some(100.0), Some(50.0), Some(30.0));

        let forward = FundamentalAnalysisEngine::compare_quarters(&[newer, older]).unwrap();
        let backward = FundamentalAnalysisEngine::compare_quarters(&[older, newer]).unwrap();

        assert!(forward.revenue_up && !backward.revenue_up);
        assert!(forward.net_profit_up && !backward.net_profit_up);
    }

    #[test]
    fn equal_values_are_not_up() {
        let statements = vec![
            quarter(2025, 6, Some(100.0), Some(50.0), Some(30.0)),
            quarter(2025, 3, Some(100.0), Some(50.0), Some(30.0)),
        ];

        let trend = FundamentalAnalysisEngine::compare_quarters(&statements).unwrap();
        assert!(!trend.revenue_up);
        assert_eq!(trend.advice, TrendAdvice::RecommendedNotToBuy);
    }

    #[test]
    fn single_period_terminates_with_missing_data() {
        let statements = vec![quarter(2025, 6, Some(100.0), Some(50.0), Some(30.0))];
        let result = FundamentalAnalysisEngine::compare_quarters(&statements);
        assert!(matches!(result, Err(ReportError::MissingData(_))));
    }

    #[test]
    fn absent_line_item_terminates_with_missing_data() {
        let statements = vec![
            quarter(2025, 6, Some(110.0), None, Some(33.0)),
            quarter(2025, 3, Some(100.0), Some(50.0), Some(30.0)),
        ];
        let result = FundamentalAnalysisEngine::compare_quarters(&statements);
        assert!(matches!(result, Err(ReportError::MissingData(_))));
    }

    #[test]
    fn magnitude_scaling() {
        let crores = FundamentalAnalysisEngine::scale_to_unit(12_000_000.0);
        assert_relative_eq!(crores.value, 1.2);
        assert_eq!(crores.unit, MagnitudeUnit::Crore);

        let lakhs = FundamentalAnalysisEngine::scale_to_unit(150_000.0);
        assert_relative_eq!(lakhs.value, 1.5);
        assert_eq!(lakhs.unit, MagnitudeUnit::Lakh);

        let raw = FundamentalAnalysisEngine::scale_to_unit(5_000.0);
        assert_relative_eq!(raw.value, 5_000.0);
        assert_eq!(raw.unit, MagnitudeUnit::Unscaled);
    }

    #[test]
    fn display_rows_skip_incomplete_quarters() {
        let statements = vec![
            quarter(2025, 6, Some(2.4e7), Some(1.2e7), Some(6.0e6)),
            quarter(2025, 3, Some(2.0e7), None, Some(5.0e6)),
            quarter(2024, 12, Some(1.8e7), Some(0.9e7), Some(4.5e6)),
        ];

        let rows = FundamentalAnalysisEngine::display_rows(&statements, &unit_rate());

        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[0].revenue.value, 2.4);
        assert_eq!(rows[0].revenue.unit, MagnitudeUnit::Crore);
        assert_eq!(rows[1].period_end, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
    }

    #[test]
    fn display_rows_apply_the_conversion_rate() {
        let statements = vec![quarter(2025, 6, Some(1_000_000.0), Some(400_000.0), Some(200_000.0))];
        let rate = ExchangeRate {
            rate: 83.0,
            source: RateSource::Fallback,
        };

        let rows = FundamentalAnalysisEngine::display_rows(&statements, &rate);

        assert_eq!(rows.len(), 1);
        // 1e6 USD * 83 = 8.3e7 INR = 8.3 crores
        assert_relative_eq!(rows[0].revenue.value, 8.3);
        assert_eq!(rows[0].revenue.unit, MagnitudeUnit::Crore);
        assert_eq!(rows[0].net_profit.unit, MagnitudeUnit::Crore);
    }
}
