//! Chart state and its reducer.
//!
//! All state transitions go through [`reduce`]. Fetch outcomes are tagged with
//! the [`RequestId`] they were issued under and only the outcome of the most
//! recent request is ever committed.
use crate::range::Range;
use crate::series::Series;
use crate::series::Summary;
use crate::style::Trend;

/// Sequence number of a fetch request.
pub type RequestId = u64;

/// Last successfully fetched data, with the range it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub range: Range,
    pub series: Series,
    pub summary: Summary,
}

impl Committed {
    pub fn new(range: Range, series: Series) -> Self {
        Self {
            range,
            summary: Summary::of(&series),
            series,
        }
    }
}

/// Price readout while the pointer is over the chart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Readout {
    /// Showing the latest price
    #[default]
    Idle,
    /// Showing the price of the sample under the pointer
    Hovering { index: usize, price: f64 },
}

#[derive(Debug)]
pub enum Event {
    /// User selected a range (possibly the current one again).
    RangeChanged(Range),
    FetchSucceeded { request: RequestId, series: Series },
    FetchFailed { request: RequestId, message: String },
    /// Pointer is over the sample at given index.
    PointerMoved(usize),
    PointerLeft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    /// Selected range
    pub range: Range,
    pub committed: Option<Committed>,
    pub readout: Readout,
    /// Message of the last failed fetch, cleared by the next attempt
    pub error: Option<String>,
    /// Request awaiting an outcome, if any
    pub pending: Option<RequestId>,
    /// Last issued request id
    last_request: RequestId,
}

impl ChartState {
    pub fn new(range: Range) -> Self {
        Self {
            range,
            committed: None,
            readout: Readout::Idle,
            error: None,
            pending: None,
            last_request: 0,
        }
    }

    /// Id of the most recently issued request.
    pub fn last_request(&self) -> RequestId {
        self.last_request
    }

    /// True if an outcome for `request` would be committed.
    pub fn accepts(&self, request: RequestId) -> bool {
        self.pending == Some(request)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.committed.as_ref().map(|c| &c.summary)
    }

    /// Price shown in the header: hovered price if any, latest otherwise.
    pub fn displayed_price(&self) -> Option<f64> {
        match self.readout {
            Readout::Hovering { price, .. } => Some(price),
            Readout::Idle => self.summary().map(|s| s.latest_price),
        }
    }

    pub fn trend(&self) -> Option<Trend> {
        self.summary().map(Trend::of)
    }
}

/// Returns the state resulting from applying `event` to `state`.
pub fn reduce(state: &ChartState, event: Event) -> ChartState {
    match event {
        Event::RangeChanged(range) => {
            let request = state.last_request + 1;
            ChartState {
                range,
                error: None,
                pending: Some(request),
                last_request: request,
                ..state.clone()
            }
        }
        Event::FetchSucceeded { request, series } => {
            if !state.accepts(request) {
                return state.clone();
            }
            ChartState {
                committed: Some(Committed::new(state.range, series)),
                readout: Readout::Idle,
                error: None,
                pending: None,
                ..state.clone()
            }
        }
        Event::FetchFailed { request, message } => {
            if !state.accepts(request) {
                return state.clone();
            }
            ChartState {
                error: Some(message),
                pending: None,
                ..state.clone()
            }
        }
        Event::PointerMoved(index) => match &state.committed {
            Some(committed) => {
                let index = index.min(committed.series.len() - 1);
                let price = committed.series.points()[index].usd;
                ChartState {
                    readout: Readout::Hovering { index, price },
                    ..state.clone()
                }
            }
            None => state.clone(),
        },
        Event::PointerLeft => ChartState {
            readout: Readout::Idle,
            ..state.clone()
        },
    }
}
