//! Event source: fetches events from providers and normalizes them.

pub mod protocol;
pub mod provider;

use log::debug;

use crate::config::CalendarParams;
use crate::error::CalNotifyResult;
use crate::event::{Event, EventRecord};
use crate::period::Period;
use protocol::ListEvents;
use provider::Provider;

/// Fetch the events of one calendar overlapping `period`.
pub async fn calendar_events(label: &str, params: &CalendarParams, period: &Period) -> CalNotifyResult<Vec<Event>> {
    let provider = Provider::from_name(&params.provider);

    let records = provider
        .call(ListEvents {
            provider_params: params.provider_params.clone(),
            from: period.time_min().to_rfc3339(),
            to: period.time_max().to_rfc3339(),
        })
        .await?;
    debug!("{} returned {} events for '{}'", provider.binary_name(), records.len(), label);

    normalize(records, label, params, period)
}

/// Resolve provider records into events of calendar `label`.
///
/// Fails on the first invalid record. Events outside `period` are dropped
/// and the result is sorted by start.
pub fn normalize(
    records: Vec<EventRecord>,
    label: &str,
    params: &CalendarParams,
    period: &Period,
) -> CalNotifyResult<Vec<Event>> {
    let mut events = Vec::with_capacity(records.len());
    for record in records {
        let event = record.resolve(label, &params.default_reminders)?;
        if period.overlaps(&event) {
            events.push(event);
        }
    }
    sort_by_start(&mut events);
    Ok(events)
}

/// Stable sort, so events starting together keep their calendar order.
pub fn sort_by_start(events: &mut [Event]) {
    events.sort_by_key(|event| event.start);
}
