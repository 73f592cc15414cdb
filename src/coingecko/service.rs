use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use time::UtcOffset;

use super::FetchError;
use crate::range::day_bounds;
use crate::range::Range;
use crate::series::PricePoint;
use crate::series::Series;

/// Bitcoin coin endpoint of the public CoinGecko API.
pub const DEFAULT_URL: &str = "https://api.coingecko.com/api/v3/coins/bitcoin";

const VS_CURRENCY: &str = "usd";

pub struct CoingeckoService {
    url: String,
    offset: UtcOffset,
    client: reqwest::Client,
}

#[derive(Deserialize, Debug)]
/// API response with timestamps in ms
struct Response {
    prices: Vec<(f64, f64)>,
}

impl CoingeckoService {
    /// New CoinGecko API service for coin endpoint `url`.
    ///
    /// Current-day ranges are bounded in local time `offset`.
    pub fn new(url: &str, offset: UtcOffset, timeout: Duration) -> Result<Self, FetchError> {
        tracing::debug!("using coingecko api: {}", url);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.trim_end_matches('/').to_owned(),
            offset,
            client,
        })
    }

    /// Query url for given `range` at time `now`.
    pub fn query_url(&self, range: Range, now: OffsetDateTime) -> String {
        if range.is_current_day() {
            let (fr, to) = day_bounds(now, self.offset);
            format!(
                "{}/market_chart/range?vs_currency={VS_CURRENCY}&from={fr}&to={to}",
                self.url
            )
        } else {
            format!(
                "{}/market_chart?vs_currency={VS_CURRENCY}&days={}",
                self.url,
                range.days()
            )
        }
    }

    /// Fetch USD price history for given `range`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_series(&self, range: Range) -> Result<Series, FetchError> {
        let qry = self.query_url(range, OffsetDateTime::now_utc());
        tracing::debug!("querying {qry}");
        let response = self.client.get(&qry).send().await?.error_for_status()?;
        let data: Response = response.json().await?;
        let series = data.to_series().ok_or(FetchError::EmptyResult)?;
        tracing::info!("fetched {} samples", series.len());
        Ok(series)
    }
}

impl Response {
    fn to_series(&self) -> Option<Series> {
        Series::new(
            self.prices
                .iter()
                .map(|(t, v)| PricePoint::new(*t as i64, *v))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;
    use time::macros::offset;

    fn service(offset: UtcOffset) -> CoingeckoService {
        CoingeckoService::new(
            "https://api.coingecko.com/api/v3/coins/bitcoin/",
            offset,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn multi_day_url() {
        let now = datetime!(2024-01-01 12:00 UTC);
        assert_eq!(
            service(UtcOffset::UTC).query_url(Range::Day7, now),
            "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=7"
        );
        assert!(service(UtcOffset::UTC)
            .query_url(Range::Year1, now)
            .ends_with("days=365"));
    }

    #[test]
    fn current_day_url() {
        let now = datetime!(2024-01-01 12:00 UTC);
        assert_eq!(
            service(UtcOffset::UTC).query_url(Range::Day1, now),
            "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart/range?vs_currency=usd&from=1704067200&to=1704153599"
        );
    }

    #[test]
    fn current_day_url_uses_local_day() {
        let now = datetime!(2024-01-01 12:00 UTC);
        // Local midnight at UTC-2 is 02:00 UTC
        assert!(service(offset!(-2))
            .query_url(Range::Day1, now)
            .ends_with("from=1704074400&to=1704160799"));
    }

    #[test]
    fn response_to_series() {
        let response: Response = serde_json::from_str(
            r#"{
                "prices": [[1577790749234, 0.48306243229959933], [1577794460300, 0.4376726048392734]],
                "market_caps": [],
                "total_volumes": []
            }"#,
        )
        .unwrap();
        let series = response.to_series().unwrap();
        assert_eq!(
            series.points(),
            &[
                PricePoint::new(1577790749234, 0.48306243229959933),
                PricePoint::new(1577794460300, 0.4376726048392734),
            ]
        );
    }

    #[test]
    fn empty_response_has_no_series() {
        let response: Response = serde_json::from_str(r#"{"prices": []}"#).unwrap();
        assert_eq!(response.to_series(), None);
    }

    #[test]
    fn response_without_prices_is_malformed() {
        assert!(serde_json::from_str::<Response>(r#"{"error": "coin not found"}"#).is_err());
    }
}
