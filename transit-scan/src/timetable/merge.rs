//! Several timetable streams merged into one ordered stream.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::trace;

use crate::domain::{Connection, UNREACHABLE};

use super::{ProviderError, TimetablePage, TimetableProvider};

/// Merges the pages of several providers by expected departure.
///
/// A connection is only released once every sub-stream that can still
/// produce more has reached its departure time, so the merged stream stays
/// non-decreasing even when sub-streams page at different rates. Sub-pages
/// are fetched concurrently.
#[derive(Debug)]
pub struct MergedTimetable<P> {
    providers: Vec<P>,
}

/// Continuation of a merged stream.
#[derive(Debug, Clone)]
pub struct MergedCursor<C> {
    streams: Vec<Stream<C>>,
}

#[derive(Debug, Clone)]
struct Stream<C> {
    buffered: VecDeque<Connection>,
    next: Option<C>,
    /// Latest departure seen; nothing earlier can still arrive
    watermark: DateTime<Utc>,
}

impl<C> Stream<C> {
    fn new(watermark: DateTime<Utc>) -> Self {
        Self {
            buffered: VecDeque::new(),
            next: None,
            watermark,
        }
    }

    fn absorb(&mut self, page: TimetablePage<C>) {
        let (connections, next) = page.into_parts();
        if let Some(last) = connections.last() {
            self.watermark = self.watermark.max(last.expected_departure());
        }
        self.buffered.extend(connections);
        self.next = next;
    }

    fn is_drained(&self) -> bool {
        self.buffered.is_empty() && self.next.is_none()
    }
}

impl<P: TimetableProvider> MergedTimetable<P> {
    pub fn new(providers: Vec<P>) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &[P] {
        &self.providers
    }
}

impl<P: TimetableProvider> TimetableProvider for MergedTimetable<P> {
    type Cursor = MergedCursor<P::Cursor>;

    async fn timetable_at(
        &self,
        time: DateTime<Utc>,
    ) -> Result<TimetablePage<Self::Cursor>, ProviderError> {
        let pages = try_join_all(self.providers.iter().map(|p| p.timetable_at(time))).await?;

        let streams = pages
            .into_iter()
            .map(|page| {
                let mut stream = Stream::new(time);
                stream.absorb(page);
                stream
            })
            .collect();

        Ok(release(streams))
    }

    async fn next_page(
        &self,
        cursor: &Self::Cursor,
    ) -> Result<TimetablePage<Self::Cursor>, ProviderError> {
        if cursor.streams.len() != self.providers.len() {
            return Err(ProviderError::UnknownCursor(format!(
                "merged cursor over {} streams, expected {}",
                cursor.streams.len(),
                self.providers.len()
            )));
        }

        let mut streams = cursor.streams.clone();

        // Only streams with nothing left in hand need another page
        let wanted: Vec<(usize, &P::Cursor)> = cursor
            .streams
            .iter()
            .enumerate()
            .filter(|(_, s)| s.buffered.is_empty())
            .filter_map(|(i, s)| s.next.as_ref().map(|next| (i, next)))
            .collect();

        let pages = try_join_all(
            wanted
                .iter()
                .map(|(i, next)| self.providers[*i].next_page(next)),
        )
        .await?;

        for ((i, _), page) in wanted.iter().zip(pages) {
            streams[*i].absorb(page);
        }

        Ok(release(streams))
    }
}

/// Pops every buffered connection at or before the horizon, in order.
fn release<C>(mut streams: Vec<Stream<C>>) -> TimetablePage<MergedCursor<C>> {
    let horizon = streams
        .iter()
        .filter(|s| s.next.is_some())
        .map(|s| s.watermark)
        .min()
        .unwrap_or(UNREACHABLE);

    let mut merged = Vec::new();
    loop {
        // Ties go to the lowest stream index
        let earliest = streams
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.buffered.front().map(|c| (c.expected_departure(), i)))
            .filter(|(departure, _)| *departure <= horizon)
            .min();

        let Some((_, i)) = earliest else { break };
        if let Some(connection) = streams[i].buffered.pop_front() {
            merged.push(connection);
        }
    }

    trace!(
        released = merged.len(),
        horizon = %horizon,
        "merged timetable page"
    );

    let next = if streams.iter().all(Stream::is_drained) {
        None
    } else {
        Some(MergedCursor { streams })
    };
    TimetablePage::new(merged, next)
}
