use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::coingecko::PriceSource;
use crate::range::Range;
use crate::state::reduce;
use crate::state::ChartState;
use crate::state::Event;
use crate::state::Readout;

/// Capacity of the channel carrying fetch outcomes back to the app
const CHANNEL_CAPACITY: usize = 8;

/// Owns the chart state and drives fetches.
///
/// Every range selection spawns a fetch tagged with a fresh request id.
/// Outcomes come back over a channel and go through the reducer, which
/// ignores anything but the latest request.
pub struct App<S: PriceSource> {
    state: ChartState,
    source: Arc<S>,
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
    in_flight: Option<JoinHandle<()>>,
}

impl<S: PriceSource> App<S> {
    pub fn new(source: S, range: Range) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            state: ChartState::new(range),
            source: Arc::new(source),
            tx,
            rx,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Applies an event to the current state.
    pub fn apply(&mut self, event: Event) {
        match &event {
            Event::FetchSucceeded { request, .. } | Event::FetchFailed { request, .. }
                if !self.state.accepts(*request) =>
            {
                tracing::debug!("discarding outcome of superseded request {request}");
            }
            Event::FetchFailed { message, .. } => {
                tracing::warn!("could not fetch {} prices: {message}", self.state.range);
            }
            _ => (),
        }
        self.state = reduce(&self.state, event);
    }

    /// Select a range and start fetching its prices.
    ///
    /// Selecting the current range again refetches it.
    /// Must be called from within a tokio runtime.
    pub fn select(&mut self, range: Range) {
        self.apply(Event::RangeChanged(range));
        let request = self.state.last_request();
        tracing::info!("request {request}: fetching {range} prices");

        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        let source = self.source.clone();
        let tx = self.tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let event = match source.fetch(range).await {
                Ok(series) => Event::FetchSucceeded { request, series },
                Err(e) => Event::FetchFailed {
                    request,
                    message: e.to_string(),
                },
            };
            if tx.send(event).await.is_err() {
                tracing::debug!("app gone before request {request} completed");
            }
        }));
    }

    /// Refetch the currently selected range.
    pub fn reload(&mut self) {
        self.select(self.state.range);
    }

    pub fn hover(&mut self, index: usize) {
        self.apply(Event::PointerMoved(index));
    }

    pub fn leave(&mut self) {
        self.apply(Event::PointerLeft);
    }

    /// Moves the readout one sample left or right.
    ///
    /// Starts from the latest sample when nothing is hovered.
    pub fn step(&mut self, forward: bool) {
        let Some(committed) = &self.state.committed else {
            return;
        };
        let last = committed.series.len() - 1;
        let index = match self.state.readout {
            Readout::Hovering { index, .. } if forward => (index + 1).min(last),
            Readout::Hovering { index, .. } => index.saturating_sub(1),
            Readout::Idle => last,
        };
        self.hover(index);
    }

    /// Applies all fetch outcomes received so far, without waiting.
    ///
    /// Returns the number of outcomes applied.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
            n += 1;
        }
        n
    }

    /// Waits for the next fetch outcome and applies it.
    pub async fn settle(&mut self) {
        if let Some(event) = self.rx.recv().await {
            self.apply(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coingecko::FetchError;
    use crate::series::PricePoint;
    use crate::series::Series;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Returns the range's day count as price, after a delay of 20ms per day.
    struct SlowSource;

    #[async_trait]
    impl PriceSource for SlowSource {
        async fn fetch(&self, range: Range) -> Result<Series, FetchError> {
            tokio::time::sleep(Duration::from_millis(20 * range.days() as u64)).await;
            Ok(Series::new(vec![PricePoint::new(1000, range.days() as f64)]).unwrap())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PriceSource for FailingSource {
        async fn fetch(&self, _range: Range) -> Result<Series, FetchError> {
            Err(FetchError::EmptyResult)
        }
    }

    #[tokio::test]
    async fn select_commits_fetched_series() {
        let mut app = App::new(SlowSource, Range::Day30);
        app.select(Range::Day7);
        assert!(app.state().is_loading());
        app.settle().await;
        let committed = app.state().committed.as_ref().unwrap();
        assert_eq!(committed.range, Range::Day7);
        assert_eq!(committed.summary.latest_price, 7.0);
        assert!(!app.state().is_loading());
    }

    #[tokio::test]
    async fn latest_selection_wins() {
        let mut app = App::new(SlowSource, Range::Day30);
        app.select(Range::Day7);
        app.select(Range::Day1);
        app.settle().await;
        // Leave plenty of time for the 7D fetch, had it not been aborted
        tokio::time::sleep(Duration::from_millis(300)).await;
        app.drain();
        let committed = app.state().committed.as_ref().unwrap();
        assert_eq!(committed.range, Range::Day1);
        assert_eq!(committed.summary.latest_price, 1.0);
    }

    #[tokio::test]
    async fn failure_sets_error() {
        let mut app = App::new(FailingSource, Range::Day30);
        app.select(Range::Day14);
        app.settle().await;
        assert_eq!(
            app.state().error.as_deref(),
            Some(FetchError::EmptyResult.to_string().as_str())
        );
        assert_eq!(app.state().range, Range::Day14);
        assert_eq!(app.state().committed, None);
    }

    #[tokio::test]
    async fn step_through_samples() {
        let mut app = App::new(SlowSource, Range::Day30);
        app.step(true);
        assert_eq!(app.state().readout, Readout::Idle);
        app.select(Range::Day1);
        app.settle().await;
        app.step(false);
        assert_eq!(
            app.state().readout,
            Readout::Hovering {
                index: 0,
                price: 1.0
            }
        );
        app.step(false);
        app.step(true);
        assert_eq!(app.state().displayed_price(), Some(1.0));
        app.leave();
        assert_eq!(app.state().readout, Readout::Idle);
    }

    #[tokio::test]
    async fn drain_without_outcomes() {
        let mut app = App::new(FailingSource, Range::Day30);
        assert_eq!(app.drain(), 0);
    }
}
