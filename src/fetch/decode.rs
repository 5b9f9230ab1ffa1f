use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{AppError, Context};

use super::{FetchResult, PriceBar, PriceHistory};

/// Error code the chart endpoint uses for unknown or delisted symbols.
const NOT_FOUND_CODE: &str = "Not Found";

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    events: Option<ChartEvents>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i32,
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    #[serde(default)]
    dividends: HashMap<String, DividendEvent>,
    #[serde(default)]
    splits: HashMap<String, SplitEvent>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    date: i64,
    numerator: f64,
    denominator: f64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// Decode a chart API body into an ordered [`PriceHistory`].
///
/// A `Not Found` chart error or a result without timestamps yields an empty history;
/// any other chart error is reported as [`AppError::Provider`].
pub fn parse_chart_response(body: &str, symbol: &str) -> FetchResult<PriceHistory> {
    let response: ChartResponse = serde_json::from_str(body)
        .with_context(|| format!("Failed to parse chart JSON for {}", symbol))?;
    into_history(response, symbol)
}

pub(crate) fn into_history(response: ChartResponse, symbol: &str) -> FetchResult<PriceHistory> {
    if let Some(err) = response.chart.error {
        if err.code == NOT_FOUND_CODE {
            log::debug!("{symbol}: provider reports no such symbol ({})", err.description);
            return Ok(PriceHistory::empty(symbol));
        }
        return Err(AppError::provider(err.code, err.description));
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceHistory::empty(symbol));
    };

    let timestamps = match data.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Ok(PriceHistory::empty(symbol)),
    };

    let zone = SessionZone::resolve(
        data.meta.exchange_timezone_name.as_deref(),
        data.meta.gmtoffset,
    )
    .ok_or_else(|| {
        AppError::message(format!(
            "Invalid exchange offset {} for {}",
            data.meta.gmtoffset, symbol
        ))
    })?;
    log::debug!("{symbol}: session dates resolved in {zone}");

    let (dividends, splits) = collect_events(data.events, &zone);
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    let mut order: Vec<usize> = (0..timestamps.len()).collect();
    order.sort_by_key(|&i| timestamps[i]);

    let mut sessions: Vec<(NaiveDate, PriceBar)> = Vec::with_capacity(timestamps.len());
    for i in order {
        let ts = timestamps[i];
        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // Placeholder rows for sessions that have not traded.
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            log::debug!("{symbol}: skipping empty bar at {ts}");
            continue;
        }

        let date = zone
            .session_date(ts)
            .with_context(|| format!("Invalid timestamp {} in chart for {}", ts, symbol))?;

        let bar = PriceBar {
            timestamp: zone
                .session_start_utc(date)
                .with_context(|| format!("Cannot resolve session start for {} on {}", symbol, date))?,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume,
            dividends: dividends.get(&date).copied().unwrap_or(0.0),
            stock_splits: splits.get(&date).copied().unwrap_or(0.0),
        };

        // The live session can arrive as a second row for a date already seen.
        match sessions.last_mut() {
            Some((last_date, last)) if *last_date == date => {
                log::debug!("{symbol}: merging extra row for {date}");
                merge_into(last, &bar);
            }
            _ => sessions.push((date, bar)),
        }
    }

    let bars = sessions.into_iter().map(|(_, bar)| bar).collect();
    Ok(PriceHistory::new(symbol, bars))
}

/// Fold a later row of the same session into `bar`.
fn merge_into(bar: &mut PriceBar, later: &PriceBar) {
    if bar.open.is_nan() {
        bar.open = later.open;
    }
    bar.high = bar.high.max(later.high);
    bar.low = bar.low.min(later.low);
    if !later.close.is_nan() {
        bar.close = later.close;
    }
    bar.volume = match (bar.volume, later.volume) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    };
}

/// Calendar used to assign bars to trading sessions.
enum SessionZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl SessionZone {
    /// Prefer the exchange's named zone so DST changes inside the window are honoured;
    /// fall back to the reported fixed offset when the name is missing or unknown.
    fn resolve(name: Option<&str>, gmtoffset: i32) -> Option<Self> {
        if let Some(tz) = name.and_then(|n| n.parse::<Tz>().ok()) {
            return Some(SessionZone::Named(tz));
        }
        FixedOffset::east_opt(gmtoffset).map(SessionZone::Fixed)
    }

    fn session_date(&self, ts: i64) -> Option<NaiveDate> {
        let utc = DateTime::from_timestamp(ts, 0)?;
        Some(match self {
            SessionZone::Named(tz) => utc.with_timezone(tz).date_naive(),
            SessionZone::Fixed(offset) => utc.with_timezone(offset).date_naive(),
        })
    }

    fn session_start_utc(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        match self {
            SessionZone::Named(tz) => tz
                .from_local_datetime(&midnight)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            SessionZone::Fixed(offset) => offset
                .from_local_datetime(&midnight)
                .single()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for SessionZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionZone::Named(tz) => write!(f, "{}", tz.name()),
            SessionZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

fn collect_events(
    events: Option<ChartEvents>,
    zone: &SessionZone,
) -> (HashMap<NaiveDate, f64>, HashMap<NaiveDate, f64>) {
    let mut dividends = HashMap::new();
    let mut splits = HashMap::new();

    let Some(events) = events else {
        return (dividends, splits);
    };

    for event in events.dividends.into_values() {
        if let Some(date) = zone.session_date(event.date) {
            *dividends.entry(date).or_insert(0.0) += event.amount;
        }
    }

    for event in events.splits.into_values() {
        if event.denominator == 0.0 {
            continue;
        }
        if let Some(date) = zone.session_date(event.date) {
            splits.insert(date, event.numerator / event.denominator);
        }
    }

    (dividends, splits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const AAPL_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "exchangeTimezoneName": "America/New_York",
                    "gmtoffset": -18000
                },
                "timestamp": [1704724200, 1704810600, 1704897000, 1704983400, 1705069800],
                "events": {
                    "dividends": {
                        "1704983400": {"amount": 0.24, "date": 1704983400}
                    }
                },
                "indicators": {
                    "quote": [{
                        "open":   [182.09, 183.92, 184.35, 186.54, 186.06],
                        "high":   [185.60, 185.15, 186.40, 187.05, 186.74],
                        "low":    [181.50, 182.73, 183.92, 183.62, 185.19],
                        "close":  [185.56, 185.14, 186.19, 185.59, 185.92],
                        "volume": [59144500, 42841800, 46792900, 49128400, 40444700]
                    }],
                    "adjclose": [{"adjclose": [184.90, 184.48, 185.53, 184.93, 185.26]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_five_session_chart() {
        let history = parse_chart_response(AAPL_CHART, "AAPL").unwrap();

        assert_eq!(history.symbol, "AAPL");
        assert_eq!(history.len(), 5);

        let first = &history.bars[0];
        assert_eq!(first.timestamp.to_rfc3339(), "2024-01-08T05:00:00+00:00");
        assert!((first.open - 182.09).abs() < 1e-9);
        assert!((first.close - 185.56).abs() < 1e-9);
        assert_eq!(first.volume, Some(59_144_500));
        assert_eq!(first.dividends, 0.0);

        assert!((history.bars[3].dividends - 0.24).abs() < 1e-9);
        assert!(history
            .bars
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp));
    }

    #[test]
    fn not_found_error_yields_empty_history() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let history = parse_chart_response(body, "ZZZZINVALID").unwrap();
        assert!(history.is_empty());
        assert_eq!(history.symbol, "ZZZZINVALID");
    }

    #[test]
    fn other_chart_errors_are_provider_failures() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - range=0d"}}}"#;
        let err = parse_chart_response(body, "AAPL").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn missing_timestamps_yield_empty_history() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let history = parse_chart_response(body, "SQ").unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn skips_bars_without_any_values_and_applies_splits() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"gmtoffset": -14400},
                    "timestamp": [1717507800, 1717594200, 1717680600],
                    "events": {
                        "splits": {
                            "1717680600": {"date": 1717680600, "numerator": 10, "denominator": 1, "splitRatio": "10:1"}
                        }
                    },
                    "indicators": {
                        "quote": [{
                            "open":   [115.7, null, 120.9],
                            "high":   [116.6, null, 121.3],
                            "low":    [114.0, null, 118.4],
                            "close":  [116.4, null, 120.9],
                            "volume": [403324400, null, 440000000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let history = parse_chart_response(body, "NVDA").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.bars[1].timestamp.to_rfc3339(),
            "2024-06-06T04:00:00+00:00"
        );
        assert!((history.bars[1].stock_splits - 10.0).abs() < 1e-9);
        assert_eq!(history.bars[0].stock_splits, 0.0);
    }

    #[test]
    fn named_exchange_zone_tracks_dst_change_inside_window() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"exchangeTimezoneName": "America/New_York", "gmtoffset": -18000},
                    "timestamp": [1730467800, 1730730600],
                    "indicators": {
                        "quote": [{
                            "open":   [220.97, 220.99],
                            "high":   [225.35, 222.79],
                            "low":    [220.27, 219.71],
                            "close":  [222.91, 222.01],
                            "volume": [65276700, 44944500]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let history = parse_chart_response(body, "AAPL").unwrap();
        let dates: Vec<String> = history
            .bars
            .iter()
            .map(|bar| bar.timestamp.to_rfc3339())
            .collect();
        assert_eq!(
            dates,
            vec!["2024-11-01T04:00:00+00:00", "2024-11-04T05:00:00+00:00"]
        );
    }

    #[test]
    fn unknown_zone_name_falls_back_to_fixed_offset() {
        let body = r#"{"chart":{"result":[{
            "meta": {"exchangeTimezoneName": "Not/AZone", "gmtoffset": 32400},
            "timestamp": [1704758400],
            "indicators": {"quote": [{"open": [1.0], "high": [1.0], "low": [1.0], "close": [1.0], "volume": [10]}]}
        }],"error":null}}"#;

        let history = parse_chart_response(body, "7203.T").unwrap();
        assert_eq!(
            history.bars[0].timestamp.to_rfc3339(),
            "2024-01-08T15:00:00+00:00"
        );
    }

    #[test]
    fn rows_sharing_a_session_date_are_merged() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"exchangeTimezoneName": "America/New_York", "gmtoffset": -18000},
                    "timestamp": [1704724200, 1704810600, 1704830400],
                    "indicators": {
                        "quote": [{
                            "open":   [182.09, 183.92, 185.00],
                            "high":   [185.60, 185.15, 185.50],
                            "low":    [181.50, 182.73, 184.90],
                            "close":  [185.56, 185.14, 185.30],
                            "volume": [59144500, 42841800, 1000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let history = parse_chart_response(body, "AAPL").unwrap();
        assert_eq!(history.len(), 2);

        let merged = &history.bars[1];
        assert_eq!(merged.timestamp.to_rfc3339(), "2024-01-09T05:00:00+00:00");
        assert!((merged.open - 183.92).abs() < 1e-9);
        assert!((merged.high - 185.50).abs() < 1e-9);
        assert!((merged.low - 182.73).abs() < 1e-9);
        assert!((merged.close - 185.30).abs() < 1e-9);
        assert_eq!(merged.volume, Some(42_842_800));
    }

    #[test]
    fn missing_volume_stays_missing() {
        let body = r#"{"chart":{"result":[{
            "meta": {"gmtoffset": -18000},
            "timestamp": [1704724200],
            "indicators": {"quote": [{"open": [1.0], "high": [2.0], "low": [0.5], "close": [1.5], "volume": [null]}]}
        }],"error":null}}"#;

        let history = parse_chart_response(body, "SPOT").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.bars[0].volume, None);
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = parse_chart_response("<html>rate limited</html>", "TSLA").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.detailed().contains("TSLA"));
    }
}
