/// Exponentially-weighted moving average with span smoothing.
///
/// `alpha = 2 / (span + 1)`; the first input seeds the average directly, so
/// the output has the same length as the input and no warm-up period.
pub fn ewma(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);

    for i in 1..data.len() {
        let prev = result[i - 1];
        result.push(alpha * data[i] + (1.0 - alpha) * prev);
    }

    result
}

/// RSI-style momentum oscillator over closing prices.
///
/// Per-step changes are split into gains and losses with a leading zero slot,
/// so the output aligns index-for-index with the input series. That zero slot
/// seeds both smoothed averages and is part of the expected numbers. A zero
/// average loss maps the value to 100 instead of dividing by zero.
pub fn momentum_oscillator(closes: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || closes.is_empty() {
        return vec![];
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);

    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gains = ewma(&gains, span);
    let avg_losses = ewma(&losses, span);

    avg_gains
        .iter()
        .zip(&avg_losses)
        .map(|(&gain, &loss)| {
            if loss == 0.0 {
                100.0
            } else {
                let rs = gain / loss;
                100.0 - 100.0 / (1.0 + rs)
            }
        })
        .collect()
}

/// All-time-high drawdown of the last close
pub struct PeakDrawdown {
    pub all_time_high: f64,
    pub current: f64,
    pub percent: f64,
}

/// Percent decline of the last close from the highest close in the series.
/// Returns `None` on an empty series or a non-positive peak.
pub fn drawdown_from_peak(closes: &[f64]) -> Option<PeakDrawdown> {
    let current = *closes.last()?;
    let all_time_high = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if all_time_high <= 0.0 {
        return None;
    }

    Some(PeakDrawdown {
        all_time_high,
        current,
        percent: (all_time_high - current) / all_time_high * 100.0,
    })
}
