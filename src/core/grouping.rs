//! Event grouping shared by the rail groupers
//!
//! Both rails reconstruct attempts the same way up to the point where milestones
//! are derived: keep the rail's event types that carry a correlation key, order
//! them by insertion time, and group them by key. This module owns that common
//! part, plus the partitioning of multi-request event exports.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::types::{
    PaymentAttempt, PaymentMethodType, PaymentRequestEvent, PaymentRequestEventType,
    PaymentRequestId,
};

/// Events of one payment attempt, ordered by insertion time
#[derive(Debug, Clone)]
pub struct EventGroup<'a> {
    /// The correlation key shared by every event in the group
    pub key: &'a str,
    pub events: Vec<&'a PaymentRequestEvent>,
}

impl<'a> EventGroup<'a> {
    /// Earliest event of the given type
    pub fn first_of(&self, event_type: PaymentRequestEventType) -> Option<&'a PaymentRequestEvent> {
        self.events
            .iter()
            .copied()
            .find(|event| event.event_type == event_type)
    }

    /// Events whose type is one of `event_types`, in insertion order
    pub fn of_types<'s>(
        &'s self,
        event_types: &'s [PaymentRequestEventType],
    ) -> impl Iterator<Item = &'a PaymentRequestEvent> + 's {
        self.events
            .iter()
            .copied()
            .filter(move |event| event_types.contains(&event.event_type))
    }
}

/// Group a rail's events by correlation key
///
/// Only events whose type is in `event_types` and whose correlation key for
/// `rail` is non-empty are kept. Events are stable-sorted by `inserted_at`, so
/// events sharing a timestamp keep their input order. Groups are returned in the
/// order of their earliest event.
pub fn group_by_correlation_key<'a>(
    events: &'a [PaymentRequestEvent],
    rail: PaymentMethodType,
    event_types: &[PaymentRequestEventType],
) -> Vec<EventGroup<'a>> {
    let mut relevant: Vec<&PaymentRequestEvent> = events
        .iter()
        .filter(|event| event_types.contains(&event.event_type))
        .filter(|event| event.correlation_key(rail).is_some())
        .collect();
    relevant.sort_by_key(|event| event.inserted_at);

    let mut groups: Vec<EventGroup<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for event in relevant {
        let Some(key) = event.correlation_key(rail) else {
            continue;
        };
        match index.get(key) {
            Some(&position) => groups[position].events.push(event),
            None => {
                index.insert(key, groups.len());
                groups.push(EventGroup {
                    key,
                    events: vec![event],
                });
            }
        }
    }

    groups
}

/// Start an attempt from the event that initiated it
pub fn start_attempt(
    key: &str,
    payment_method: PaymentMethodType,
    initial: &PaymentRequestEvent,
    attempted_amount: Decimal,
) -> PaymentAttempt {
    PaymentAttempt {
        payment_request_id: initial.payment_request_id,
        initiated_at: Some(initial.inserted_at),
        currency: initial.currency,
        attempted_amount,
        processor: initial.processor,
        ..PaymentAttempt::new(key, payment_method)
    }
}

/// Partition an event export by payment request
///
/// Each payment request's events keep their original relative order. The map is
/// ordered by payment request ID so downstream output is deterministic.
pub fn partition_by_payment_request(
    events: Vec<PaymentRequestEvent>,
) -> BTreeMap<PaymentRequestId, Vec<PaymentRequestEvent>> {
    let mut partitions: BTreeMap<PaymentRequestId, Vec<PaymentRequestEvent>> = BTreeMap::new();

    for event in events {
        partitions
            .entry(event.payment_request_id)
            .or_default()
            .push(event);
    }

    partitions
}
