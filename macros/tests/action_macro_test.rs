//! Tests for #[derive(Action)] macro

use booking_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum BookingAction {
    #[command]
    SelectDate { date: String },

    #[command]
    Advance,

    #[event]
    SlotsLoaded { slots: Vec<String> },

    #[event]
    ReservationCreated(String),

    Unclassified,
}

#[test]
fn test_is_command() {
    let action = BookingAction::SelectDate {
        date: "2025-06-10".to_string(),
    };
    assert!(action.is_command());
    assert!(!action.is_event());
    assert!(BookingAction::Advance.is_command());
}

#[test]
fn test_is_event() {
    let action = BookingAction::SlotsLoaded {
        slots: vec!["10:00".to_string()],
    };
    assert!(action.is_event());
    assert!(!action.is_command());
    assert!(BookingAction::ReservationCreated("R-1".to_string()).is_event());
}

#[test]
fn test_unclassified_variant_is_neither() {
    assert!(!BookingAction::Unclassified.is_command());
    assert!(!BookingAction::Unclassified.is_event());
}

#[test]
fn test_action_name() {
    assert_eq!(BookingAction::Advance.action_name(), "advance");
    assert_eq!(
        BookingAction::SlotsLoaded { slots: vec![] }.action_name(),
        "slots_loaded"
    );
    assert_eq!(
        BookingAction::ReservationCreated(String::new()).action_name(),
        "reservation_created"
    );
}
