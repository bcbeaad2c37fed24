//! Property-based tests for the selection cascade, step gating, back
//! navigation and the stale-response guard.

#![allow(clippy::unwrap_used)]

mod common;

use booking_core::reducer::Reducer;
use booking_testing::test_clock;
use booking_wizard::availability::LoadOutcome;
use booking_wizard::mocks::InMemoryDirectory;
use booking_wizard::{
    AvailabilityKey, AvailabilityQuery, ContactPayload, Provider, SelectionState, Service, SlotAvailabilityLoader,
    StepGate, StepLayout, WizardAction, WizardEnvironment, WizardReducer, WizardState, WizardStep,
};
use common::{date, key, slot};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Clone, Debug)]
enum Op {
    Provider(usize),
    Service(usize),
    Date(usize),
    Time(usize),
    Contact(bool),
    Consent(bool),
}

const PROVIDERS: [&str; 2] = ["p1", "p2"];
const SERVICES: [&str; 2] = ["s1", "s2"];
const DATES: [&str; 3] = ["2025-06-10", "2025-06-11", "2025-06-12"];
const TIMES: [&str; 3] = ["09:00", "10:00", "14:30"];

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..PROVIDERS.len()).prop_map(Op::Provider),
        (0..SERVICES.len()).prop_map(Op::Service),
        (0..DATES.len()).prop_map(Op::Date),
        (0..TIMES.len()).prop_map(Op::Time),
        any::<bool>().prop_map(Op::Contact),
        any::<bool>().prop_map(Op::Consent),
    ]
}

fn arb_layout() -> impl Strategy<Value = StepLayout> {
    prop_oneof![Just(StepLayout::FourStage), Just(StepLayout::ThreeStage)]
}

prop_compose! {
    fn arb_session()(
        layout in arb_layout(),
        ops in prop::collection::vec(arb_op(), 0..30),
    ) -> (StepLayout, Vec<Op>) {
        (layout, ops)
    }
}

fn contact(complete: bool) -> ContactPayload {
    if complete {
        ContactPayload::new("Ana", "Silva", "ana@example.com", "123")
    } else {
        ContactPayload::new("Ana", "  ", "ana@example.com", "123")
    }
}

fn apply(selection: &mut SelectionState, op: &Op, layout: StepLayout) {
    match *op {
        Op::Provider(i) => selection.select_provider(Provider::new(PROVIDERS[i], "P")),
        Op::Service(i) => {
            let _ = selection.select_service(Service::new(SERVICES[i], "S", 30), layout);
        },
        Op::Date(i) => {
            let _ = selection.select_date(date(DATES[i]));
        },
        Op::Time(i) => selection.select_time(slot(TIMES[i])),
        Op::Contact(complete) => selection.set_contact(contact(complete)),
        Op::Consent(consent) => selection.set_consent(consent),
    }
}

fn action(op: &Op) -> WizardAction {
    match *op {
        Op::Provider(i) => WizardAction::SelectProvider {
            provider_id: PROVIDERS[i].into(),
        },
        Op::Service(i) => WizardAction::SelectService {
            service_id: SERVICES[i].into(),
        },
        Op::Date(i) => WizardAction::SelectDate {
            date: date(DATES[i]),
        },
        Op::Time(i) => WizardAction::SelectTime {
            time: slot(TIMES[i]),
        },
        Op::Contact(complete) => WizardAction::SetContact {
            contact: contact(complete),
        },
        Op::Consent(consent) => WizardAction::SetConsent { consent },
    }
}

fn env() -> WizardEnvironment {
    WizardEnvironment::new(Arc::new(InMemoryDirectory::new())).with_clock(Arc::new(test_clock()))
}

fn loaded_state(layout: StepLayout) -> WizardState {
    let mut state = WizardState::new(layout);
    state.catalog.providers = PROVIDERS.iter().map(|id| Provider::new(*id, "P")).collect();
    state.catalog.services = SERVICES
        .iter()
        .map(|id| Service::new(*id, "S", 30))
        .collect();
    state
}

proptest! {
    /// Changing a link of the chain clears every later link
    #[test]
    fn cascade_clears_downstream(
        layout in arb_layout(),
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        let mut selection = SelectionState::new();
        for op in &ops {
            let before = selection.clone();
            apply(&mut selection, op, layout);

            match op {
                Op::Provider(_) => {
                    prop_assert!(selection.service.is_none());
                    prop_assert!(selection.date.is_none());
                    prop_assert!(selection.time.is_none());
                },
                Op::Service(_) if selection != before => {
                    prop_assert_eq!(&selection.provider, &before.provider);
                    prop_assert!(selection.date.is_none());
                    prop_assert!(selection.time.is_none());
                },
                Op::Date(_) => {
                    prop_assert_eq!(&selection.provider, &before.provider);
                    prop_assert_eq!(&selection.service, &before.service);
                    prop_assert!(selection.time.is_none());
                },
                _ => {
                    prop_assert_eq!(&selection.provider, &before.provider);
                    prop_assert_eq!(&selection.service, &before.service);
                    prop_assert_eq!(selection.date, before.date);
                },
            }
            if !matches!(op, Op::Contact(_)) {
                prop_assert_eq!(&selection.contact, &before.contact);
            }
            if !matches!(op, Op::Consent(_)) {
                prop_assert_eq!(selection.consent, before.consent);
            }
        }
    }

    /// A service never lands without a provider in the nested layout
    #[test]
    fn nested_layout_never_holds_orphan_service(ops in prop::collection::vec(arb_op(), 1..40)) {
        let mut selection = SelectionState::new();
        for op in &ops {
            apply(&mut selection, op, StepLayout::ThreeStage);
            prop_assert!(selection.service.is_none() || selection.provider.is_some());
        }
    }

    /// The gate is a pure function of its inputs
    #[test]
    fn gate_is_pure(
        (layout, ops) in arb_session(),
        loaded in prop::collection::vec(0..TIMES.len(), 0..3),
    ) {
        let mut selection = SelectionState::new();
        for op in &ops {
            apply(&mut selection, op, layout);
        }
        let mut availability = SlotAvailabilityLoader::new();
        if let Some(active) = selection.availability_key() {
            let query = availability.begin(active);
            availability.resolve(&query, Ok(loaded.iter().map(|i| slot(TIMES[*i])).collect()));
        }

        let selection_before = selection.clone();
        let availability_before = availability.clone();
        for step in layout.steps() {
            let first = StepGate::can_advance(*step, &selection, &availability);
            let second = StepGate::can_advance(*step, &selection, &availability);
            prop_assert_eq!(first, second);
        }
        prop_assert_eq!(&selection, &selection_before);
        prop_assert_eq!(&availability, &availability_before);
    }

    /// Back navigation never clears a selection
    #[test]
    fn retreat_is_non_destructive(
        (layout, ops) in arb_session(),
        advances in 0usize..4,
    ) {
        let reducer = WizardReducer::default();
        let env = env();
        let mut state = loaded_state(layout);
        for op in &ops {
            let _ = reducer.reduce(&mut state, action(op), &env);
        }
        for _ in 0..advances {
            let _ = reducer.reduce(&mut state, WizardAction::Advance, &env);
        }

        let before = state.selection.clone();
        let step_before = state.step_number();
        let effects = reducer.reduce(&mut state, WizardAction::Retreat, &env);

        prop_assert!(effects.is_empty());
        prop_assert_eq!(&state.selection, &before);
        prop_assert_eq!(state.step_number(), step_before.saturating_sub(1).max(1));
    }

    /// Only the most recently issued query may change the slot set
    #[test]
    fn last_key_wins(
        (issued, arrival) in prop::collection::vec(0..DATES.len(), 1..6).prop_flat_map(|issued| {
            let order: Vec<usize> = (0..issued.len()).collect();
            (Just(issued), Just(order).prop_shuffle())
        }),
    ) {
        let keys: Vec<AvailabilityKey> =
            issued.iter().map(|i| key("p1", "s1", DATES[*i])).collect();
        let mut loader = SlotAvailabilityLoader::new();
        let queries: Vec<AvailabilityQuery> =
            keys.iter().map(|k| loader.begin(k.clone())).collect();

        let last = queries.last().unwrap().clone();
        let mut applied = 0;
        for index in arrival {
            let query = &queries[index];
            let slots = vec![slot(TIMES[index % TIMES.len()])];
            if loader.resolve(query, Ok(slots)) == LoadOutcome::Applied {
                applied += 1;
                prop_assert_eq!(query, &last);
            }
        }

        prop_assert_eq!(applied, 1);
        prop_assert_eq!(loader.active_key(), Some(&last.key));
        prop_assert!(!loader.is_loading());
    }
}

#[test]
fn every_layout_ends_on_contact() {
    for layout in [StepLayout::FourStage, StepLayout::ThreeStage] {
        assert_eq!(layout.steps().last(), Some(&WizardStep::Contact));
    }
}
