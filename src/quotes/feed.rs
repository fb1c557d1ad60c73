use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument, warn};

use super::source::{DollarQuote, QuoteSource};

/// The quotes shown next to the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBoard {
    pub official: Option<DollarQuote>,
    pub blue: Option<DollarQuote>,
}

impl QuoteBoard {
    pub fn from_quotes(quotes: Vec<DollarQuote>) -> Self {
        let mut board = Self {
            official: None,
            blue: None,
        };
        for quote in quotes {
            match quote.code.as_str() {
                "oficial" if board.official.is_none() => board.official = Some(quote),
                "blue" if board.blue.is_none() => board.blue = Some(quote),
                _ => {}
            }
        }
        board
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuoteState {
    Loading,
    /// The last fetch failed. Cleared by the next successful fetch.
    Unavailable,
    Available(QuoteBoard),
}

/// Periodic exchange-rate refresher. Shares nothing with the inventory.
pub struct QuoteFeed {
    source: Arc<dyn QuoteSource>,
    period: Duration,
    state: watch::Sender<QuoteState>,
    stop: oneshot::Receiver<()>,
}

pub struct QuoteHandle {
    state: watch::Receiver<QuoteState>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl QuoteFeed {
    pub fn spawn(source: Arc<dyn QuoteSource>, period: Duration) -> QuoteHandle {
        let (state_tx, state) = watch::channel(QuoteState::Loading);
        let (stop_tx, stop) = oneshot::channel();
        let feed = Self {
            source,
            period,
            state: state_tx,
            stop,
        };
        let task = tokio::spawn(feed.run());
        QuoteHandle {
            state,
            stop: stop_tx,
            task,
        }
    }

    #[instrument(name = "quote_feed", skip(self), fields(period_secs = self.period.as_secs()))]
    async fn run(mut self) {
        info!("QuoteFeed starting");
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut self.stop => break,
                _ = ticker.tick() => self.refresh().await,
            }
        }

        info!("QuoteFeed stopped");
    }

    async fn refresh(&self) {
        match self.source.fetch().await {
            Ok(quotes) => {
                let board = QuoteBoard::from_quotes(quotes);
                if board.official.is_none() && board.blue.is_none() {
                    warn!("No official or blue quote in response");
                }
                self.state.send_replace(QuoteState::Available(board));
            }
            Err(e) => {
                error!(error = %e, "Quote fetch failed");
                self.state.send_replace(QuoteState::Unavailable);
            }
        }
    }
}

impl QuoteHandle {
    pub fn current(&self) -> QuoteState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<QuoteState> {
        self.state.clone()
    }

    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            error!(error = ?e, "QuoteFeed task failed");
        }
    }
}
