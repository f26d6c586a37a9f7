use analysis_core::{CompanyProfile, PricePoint, PriceSeries, QuarterlyStatement, ReportError};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const CHART_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

/// User agent for HTTP requests; the endpoints reject the default one.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Exchange suffix appended to bare ticker symbols
pub const MARKET_SUFFIX: &str = ".ns";

/// Append the exchange suffix unless the input already ends with it. The
/// check is byte-exact: `X.NS` still gains a suffix.
pub fn normalize_symbol(input: &str) -> String {
    if input.ends_with(MARKET_SUFFIX) {
        input.to_string()
    } else {
        format!("{input}{MARKET_SUFFIX}")
    }
}

pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Daily closing prices over `[start, end]`
    pub async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ReportError> {
        let url = format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            CHART_API_URL,
            symbol,
            day_start_ts(start),
            day_end_ts(end),
        );
        tracing::debug!("Fetching daily closes: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ReportError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ReportError::Api(format!(
                "HTTP {} fetching price history for {}",
                response.status(),
                symbol
            )));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Parse(e.to_string()))?;

        series_from_chart(symbol, chart)
    }

    /// Sector, market cap, short name, description and trailing multiple.
    /// Every field is optional; absences surface as `None`.
    pub async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile, ReportError> {
        let data = self
            .quote_summary(symbol, "assetProfile,price,summaryDetail")
            .await?;

        Ok(profile_from_summary(symbol, data))
    }

    /// Quarterly income statements, most recent period first
    pub async fn quarterly_income_statements(
        &self,
        symbol: &str,
    ) -> Result<Vec<QuarterlyStatement>, ReportError> {
        let data = self
            .quote_summary(symbol, "incomeStatementHistoryQuarterly")
            .await?;

        statements_from_summary(symbol, data)
    }

    async fn quote_summary(
        &self,
        symbol: &str,
        modules: &str,
    ) -> Result<QuoteSummaryData, ReportError> {
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}?modules={modules}");
        tracing::debug!("Fetching quote summary: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ReportError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ReportError::Api(format!(
                "HTTP {} fetching metadata for {}",
                response.status(),
                symbol
            )));
        }

        let summary: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Parse(e.to_string()))?;

        if let Some(error) = summary.quote_summary.error {
            return Err(ReportError::DataUnavailable(format!(
                "{}: {}",
                error.code, error.description
            )));
        }

        summary
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::DataUnavailable(format!("no metadata rows for {symbol}")))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

fn day_start_ts(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt).timestamp())
        .unwrap_or(0)
}

fn day_end_ts(date: NaiveDate) -> i64 {
    date.and_hms_opt(23, 59, 59)
        .map(|dt| Utc.from_utc_datetime(&dt).timestamp())
        .unwrap_or(0)
}

fn series_from_chart(symbol: &str, response: ChartResponse) -> Result<PriceSeries, ReportError> {
    if let Some(error) = response.chart.error {
        return Err(ReportError::DataUnavailable(format!(
            "{}: {}",
            error.code, error.description
        )));
    }

    let result = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::DataUnavailable(format!("no price rows for {symbol}")))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ReportError::Parse(format!("missing quote block for {symbol}")))?;

    let mut points = Vec::with_capacity(timestamps.len());
    for (&ts, close) in timestamps.iter().zip(quote.close) {
        // Null slots appear on holidays and partially reported days.
        let Some(close) = close else { continue };
        let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        points.push(PricePoint { date, close });
    }

    if points.is_empty() {
        return Err(ReportError::DataUnavailable(format!(
            "no rows for {symbol} in the requested window"
        )));
    }

    Ok(PriceSeries::new(symbol, points))
}

fn profile_from_summary(symbol: &str, data: QuoteSummaryData) -> CompanyProfile {
    let profile = data.asset_profile.unwrap_or_default();
    let price = data.price.unwrap_or_default();
    let detail = data.summary_detail.unwrap_or_default();

    CompanyProfile {
        symbol: symbol.to_string(),
        short_name: price.short_name,
        sector: profile.sector,
        market_cap: detail.market_cap.and_then(RawValue::value),
        long_summary: profile.long_business_summary,
        trailing_pe: detail.trailing_pe.and_then(RawValue::value),
    }
}

fn statements_from_summary(
    symbol: &str,
    data: QuoteSummaryData,
) -> Result<Vec<QuarterlyStatement>, ReportError> {
    let history = data.income_statement_history_quarterly.ok_or_else(|| {
        ReportError::DataUnavailable(format!("no quarterly statements for {symbol}"))
    })?;

    let statements: Vec<QuarterlyStatement> = history
        .income_statement_history
        .into_iter()
        .filter_map(|row| {
            let period_end = row
                .end_date
                .and_then(RawValue::value)
                .and_then(|ts| DateTime::from_timestamp(ts as i64, 0))
                .map(|dt| dt.date_naive())?;

            Some(QuarterlyStatement {
                period_end,
                total_revenue: row.total_revenue.and_then(RawValue::value),
                operating_income: row.operating_income.and_then(RawValue::value),
                net_income: row.net_income.and_then(RawValue::value),
            })
        })
        .collect();

    if statements.is_empty() {
        return Err(ReportError::DataUnavailable(format!(
            "no fiscal periods reported for {symbol}"
        )));
    }

    Ok(statements)
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryData {
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetail>,
    income_statement_history_quarterly: Option<IncomeStatementHistory>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    sector: Option<String>,
    long_business_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    short_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    market_cap: Option<RawValue>,
}

/// Yahoo wraps numbers in `{ "raw": ..., "fmt": ... }` envelopes
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

impl RawValue {
    fn value(self) -> Option<f64> {
        self.raw
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatementHistory {
    income_statement_history: Vec<IncomeStatementRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatementRow {
    end_date: Option<RawValue>,
    total_revenue: Option<RawValue>,
    operating_income: Option<RawValue>,
    net_income: Option<RawValue>,
}
