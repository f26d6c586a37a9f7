use analysis_core::{
    DrawdownAdvice, DrawdownAnalysis, MomentumAdvice, MomentumAnalysis, PriceSeries, ReportError,
    TechnicalAnalyzer, TechnicalReport,
};
use async_trait::async_trait;

use crate::indicators::{drawdown_from_peak, momentum_oscillator};

/// Smoothing span for the momentum oscillator
pub const MOMENTUM_SPAN: usize = 14;

pub struct TechnicalAnalysisEngine;

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    fn classify_drawdown(percent: f64) -> DrawdownAdvice {
        if (0.0..=65.0).contains(&percent) {
            DrawdownAdvice::RecommendBuy
        } else if percent > 65.0 && percent <= 85.0 {
            DrawdownAdvice::WatchForSupport
        } else {
            DrawdownAdvice::NotTheRightTime
        }
    }

    // Values in (41, 42) fall through to the last branch; the gap is part of
    // the published rule set.
    fn classify_momentum(value: f64) -> MomentumAdvice {
        if value <= 41.0 {
            MomentumAdvice::BuyLowerRange
        } else if (42.0..=62.0).contains(&value) {
            MomentumAdvice::Hold
        } else {
            MomentumAdvice::NotRecommended
        }
    }

    fn analyze_sync(
        &self,
        symbol: &str,
        prices: &PriceSeries,
    ) -> Result<TechnicalReport, ReportError> {
        let closes = prices.closes();

        let peak = drawdown_from_peak(&closes).ok_or_else(|| {
            ReportError::DataUnavailable(format!("no usable price history for {symbol}"))
        })?;
        let drawdown = DrawdownAnalysis {
            all_time_high: peak.all_time_high,
            current_price: peak.current,
            drawdown_pct: peak.percent,
            advice: Self::classify_drawdown(peak.percent),
        };

        let values = momentum_oscillator(&closes, MOMENTUM_SPAN);
        let latest = values.last().copied().ok_or_else(|| {
            ReportError::DataUnavailable(format!("momentum series empty for {symbol}"))
        })?;
        let momentum = MomentumAnalysis {
            advice: Self::classify_momentum(latest),
            values,
            latest,
        };

        Ok(TechnicalReport { drawdown, momentum })
    }
}

#[async_trait]
impl TechnicalAnalyzer for TechnicalAnalysisEngine {
    async fn analyze(
        &self,
        symbol: &str,
        prices: &PriceSeries,
    ) -> Result<TechnicalReport, ReportError> {
        self.analyze_sync(symbol, prices)
    }
}

impl Default for TechnicalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::PricePoint;
    use chrono::NaiveDate;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect();
        PriceSeries::new("TEST.ns", points)
    }

    #[test]
    fn drawdown_thresholds() {
        assert_eq!(
            TechnicalAnalysisEngine::classify_drawdown(0.0),
            DrawdownAdvice::RecommendBuy
        );
        assert_eq!(
            TechnicalAnalysisEngine::classify_drawdown(65.0),
            DrawdownAdvice::RecommendBuy
        );
        assert_eq!(
            TechnicalAnalysisEngine::classify_drawdown(65.1),
            DrawdownAdvice::WatchForSupport
        );
        assert_eq!(
            TechnicalAnalysisEngine::classify_drawdown(85.0),
            DrawdownAdvice::WatchForSupport
        );
        assert_eq!(
            TechnicalAnalysisEngine::classify_drawdown(85.1),
            DrawdownAdvice::NotTheRightTime
        );
    }

    #[test]
    fn momentum_thresholds() {
        assert_eq!(
            TechnicalAnalysisEngine::classify_momentum(41.0),
            MomentumAdvice::BuyLowerRange
        );
        assert_eq!(
            TechnicalAnalysisEngine::classify_momentum(42.0),
            MomentumAdvice::Hold
        );
        assert_eq!(
            TechnicalAnalysisEngine::classify_momentum(62.0),
            MomentumAdvice::Hold
        );
        assert_eq!(
            TechnicalAnalysisEngine::classify_momentum(62.5),
            MomentumAdvice::NotRecommended
        );
        // The open interval between the buy and hold bands is not covered by
        // either rule and lands on the last branch.
        assert_eq!(
            TechnicalAnalysisEngine::classify_momentum(41.5),
            MomentumAdvice::NotRecommended
        );
    }

    #[test]
    fn flat_year_with_final_drop_recommends_buy() {
        let mut closes = vec![100.0; 251];
        closes.push(50.0);
        let series = series_from_closes(&closes);

        let report = TechnicalAnalysisEngine::new()
            .analyze_sync("TEST.ns", &series)
            .unwrap();

        assert_eq!(report.drawdown.all_time_high, 100.0);
        assert_eq!(report.drawdown.current_price, 50.0);
        assert!((report.drawdown.drawdown_pct - 50.0).abs() < 1e-9);
        assert_eq!(report.drawdown.advice, DrawdownAdvice::RecommendBuy);
    }

    #[test]
    fn empty_series_is_a_data_error() {
        let series = series_from_closes(&[]);
        let result = TechnicalAnalysisEngine::new().analyze_sync("TEST.ns", &series);
        assert!(matches!(result, Err(ReportError::DataUnavailable(_))));
    }

    #[test]
    fn momentum_series_aligns_with_prices() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 7) as f64).collect();
        let series = series_from_closes(&closes);
        let report = TechnicalAnalysisEngine::new()
            .analyze_sync("TEST.ns", &series)
            .unwrap();
        assert_eq!(report.momentum.values.len(), series.len());
        assert_eq!(
            report.momentum.latest,
            *report.momentum.values.last().unwrap()
        );
    }
}
