//! End to end flows through the hosted form layer: keystrokes run through
//! the formatting fields, readiness aggregates across them, and the
//! component turns the collected input into a wire payment request.

#![allow(clippy::unwrap_used)]

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use checkout_components::{
    card::{CardComponent, CardConfiguration, CardInputData},
    fields::{CardNumberField, CvcField, Edit, ExpiryDateField, IbanField},
    sepa::{SepaComponent, SepaInputData},
    InputValidator, PaymentComponent,
};
use checkout_models::{actions::Action, payment_methods::PaymentMethod};
use common_utils::validation::Validity;
use serde_json::json;

/// A card form wired the way a host screen wires it: three fields report
/// into one validator, the validator drives the submit control, and the
/// number field resizes the security code field as the brand changes.
struct CardForm {
    validator: Rc<RefCell<InputValidator>>,
    submit_enabled: Rc<Cell<bool>>,
    number: CardNumberField,
    expiry: ExpiryDateField,
    cvc: Rc<RefCell<CvcField>>,
}

fn card_form() -> CardForm {
    let validator = Rc::new(RefCell::new(InputValidator::new()));
    let submit_enabled = Rc::new(Cell::new(false));

    let number_handle = validator.borrow_mut().register();
    let expiry_handle = validator.borrow_mut().register();
    let cvc_handle = validator.borrow_mut().register();

    let submit_sink = Rc::clone(&submit_enabled);
    validator
        .borrow_mut()
        .set_listener(move |ready| submit_sink.set(ready));

    let mut number = CardNumberField::new(CardConfiguration::default().supported_brands);
    let mut expiry = ExpiryDateField::new();
    let cvc = Rc::new(RefCell::new(CvcField::new()));

    let sink = Rc::clone(&validator);
    number.set_ready_listener(move |ready| sink.borrow_mut().report(number_handle, ready));
    let linked_cvc = Rc::clone(&cvc);
    number.set_security_code_length_listener(move |length| {
        linked_cvc.borrow_mut().set_max_length(length);
    });

    let sink = Rc::clone(&validator);
    expiry.set_ready_listener(move |ready| sink.borrow_mut().report(expiry_handle, ready));

    let sink = Rc::clone(&validator);
    cvc.borrow_mut()
        .set_ready_listener(move |ready| sink.borrow_mut().report(cvc_handle, ready));

    CardForm {
        validator,
        submit_enabled,
        number,
        expiry,
        cvc,
    }
}

fn type_number(form: &mut CardForm, text: &str) {
    for c in text.chars() {
        let at = form.number.cursor();
        form.number.edit(&Edit::insertion(at, c.to_string()));
    }
}

fn type_expiry(form: &mut CardForm, text: &str) {
    for c in text.chars() {
        let at = form.expiry.cursor();
        form.expiry.edit(&Edit::insertion(at, c.to_string()));
    }
}

fn type_cvc(form: &CardForm, text: &str) {
    for c in text.chars() {
        let at = form.cvc.borrow().cursor();
        form.cvc.borrow_mut().edit(&Edit::insertion(at, c.to_string()));
    }
}

fn scheme_payment_method() -> PaymentMethod {
    serde_json::from_value(json!({
        "type": "scheme",
        "name": "Credit Card"
    }))
    .unwrap()
}

#[test]
fn typed_card_details_become_a_payment_request() {
    let mut form = card_form();
    assert!(!form.validator.borrow().is_ready());

    type_number(&mut form, "4111111111111111");
    assert_eq!(form.number.value(), "4111 1111 1111 1111");
    assert!(!form.submit_enabled.get());

    type_expiry(&mut form, "1240");
    assert_eq!(form.expiry.value(), "12/40");
    assert!(!form.submit_enabled.get());

    type_cvc(&form, "737");
    assert!(form.validator.borrow().is_ready());
    assert!(form.submit_enabled.get());

    let input = CardInputData {
        card_number: form.number.value().to_string(),
        expiry_date: form.expiry.value().to_string(),
        security_code: form.cvc.borrow().value().to_string(),
        holder_name: "S. Hopper".to_string(),
        store_payment_method: false,
    };
    let mut component =
        CardComponent::new(&scheme_payment_method(), CardConfiguration::default()).unwrap();
    component.input_data_changed(input);

    let state = component.create_component_state().unwrap();
    assert!(state.is_valid);
    assert_eq!(
        serde_json::to_value(&state.data).unwrap(),
        json!({
            "paymentMethod": {
                "type": "scheme",
                "number": "4111111111111111",
                "expiryMonth": "12",
                "expiryYear": "2040",
                "cvc": "737",
                "holderName": "S. Hopper"
            },
            "storePaymentMethod": false
        })
    );

    // The server may answer the submission with a follow-up action.
    let action: Action = serde_json::from_value(json!({
        "type": "redirect",
        "paymentData": "Ab02b4c0!BQABAgCuZFJ...",
        "paymentMethodType": "scheme",
        "method": "GET",
        "url": "https://checkout.test/redirect"
    }))
    .unwrap();
    assert_eq!(action.type_name(), "redirect");
    assert_eq!(action.payment_method_type(), Some("scheme"));
    assert!(matches!(action, Action::Redirect(_)));
}

#[test]
fn deleting_a_digit_disables_submission_again() {
    let mut form = card_form();
    type_number(&mut form, "4111111111111111");
    type_expiry(&mut form, "1240");
    type_cvc(&form, "737");
    assert!(form.submit_enabled.get());

    let cursor = form.cvc.borrow().cursor();
    form.cvc.borrow_mut().edit(&Edit::deletion(cursor - 1, 1));
    assert!(!form.submit_enabled.get());
    assert!(!form.validator.borrow().is_ready());

    type_cvc(&form, "7");
    assert!(form.submit_enabled.get());
}

#[test]
fn detected_brand_resizes_the_linked_security_code_field() {
    let mut form = card_form();
    type_number(&mut form, "3782");
    assert_eq!(form.cvc.borrow().max_length(), 4);

    let length = form.number.value().chars().count();
    form.number.edit(&Edit::replacement(0, length, "4111"));
    assert_eq!(form.cvc.borrow().max_length(), 3);
}

#[test]
fn typed_iban_flows_into_a_sepa_request() {
    let validator = Rc::new(RefCell::new(InputValidator::new()));
    let handle = validator.borrow_mut().register();

    let mut iban = IbanField::new();
    let sink = Rc::clone(&validator);
    iban.set_ready_listener(move |ready| sink.borrow_mut().report(handle, ready));

    for c in "nl91 abna 0417 1643 00".chars() {
        let at = iban.cursor();
        iban.edit(&Edit::insertion(at, c.to_string()));
    }
    assert_eq!(iban.validity(), Validity::Valid);
    assert!(validator.borrow().is_ready());

    let payment_method: PaymentMethod = serde_json::from_value(json!({
        "type": "sepadirectdebit",
        "name": "SEPA Direct Debit"
    }))
    .unwrap();
    let mut component = SepaComponent::new(&payment_method).unwrap();
    component.input_data_changed(SepaInputData {
        name: "A. Schneider".to_string(),
        iban: iban.value().to_string(),
    });

    let state = component.create_component_state().unwrap();
    assert!(state.is_valid);
    assert_eq!(
        serde_json::to_value(&state.data).unwrap(),
        json!({
            "paymentMethod": {
                "type": "sepadirectdebit",
                "ownerName": "A. Schneider",
                "iban": "NL91ABNA0417164300"
            }
        })
    );
}
