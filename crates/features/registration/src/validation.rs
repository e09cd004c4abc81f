//! Per-step field rules.
//!
//! Each step checks only its own slice. A failed rule is reported as data, keyed by the
//! field's serialized name (`storeName`, `documents.drugLicense`, ...), and never as an error.

use crate::documents::{DocumentSet, DocumentStatus};
use crate::draft::{ConsentRecord, Field, LocationData, OwnerInfo, RegistrationDraft, StoreDetails, StoreSetup};
use crate::steps::WizardStep;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static GSTIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("GSTIN pattern is valid")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

/// Indian mobile numbers: ten digits starting with 6-9.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("mobile pattern is valid"));

static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("pincode pattern is valid"));

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern is valid"));

pub const WORKING_DAYS_KEY: &str = "workingDays";
pub const PAYMENT_METHODS_KEY: &str = "paymentMethods";

/// Field key → message. Empty means the step is valid.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn field(&self, field: Field) -> Option<&str> {
        self.get(field.as_ref())
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    fn require(&mut self, field: Field, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.insert(field.as_ref(), message);
            return false;
        }
        true
    }

    fn pattern(&mut self, field: Field, value: &str, re: &Regex, message: &str) {
        if !re.is_match(value) {
            self.insert(field.as_ref(), message);
        }
    }
}

/// Runs the rules of `step` against the draft.
#[must_use]
pub fn validate_step(step: WizardStep, draft: &RegistrationDraft) -> ValidationErrors {
    match step {
        WizardStep::StoreDetails => validate_store_details(&draft.store),
        WizardStep::OwnerInfo => validate_owner_info(&draft.owner),
        WizardStep::Documents => validate_documents(&draft.documents),
        WizardStep::Location => validate_location(&draft.location),
        WizardStep::StoreSetup => validate_store_setup(&draft.setup),
        WizardStep::Consent => validate_consent(&draft.consent),
    }
}

/// Every step's errors, for reporting a whole draft at once.
#[must_use]
pub fn validate_all(draft: &RegistrationDraft) -> Vec<(WizardStep, ValidationErrors)> {
    WizardStep::all()
        .map(|step| (step, validate_step(step, draft)))
        .filter(|(_, errors)| !errors.is_empty())
        .collect()
}

/// GSTIN as it is validated and submitted: trimmed and upper-cased.
#[must_use]
pub fn normalize_gstin(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

#[must_use]
pub fn validate_store_details(store: &StoreDetails) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require(Field::StoreName, &store.store_name, "Store name is required");

    if errors.require(Field::GstNumber, &store.gst_number, "GST number is required") {
        errors.pattern(
            Field::GstNumber,
            &normalize_gstin(&store.gst_number),
            &GSTIN_RE,
            "Enter a valid 15-character GSTIN",
        );
    }

    let email = store.store_email.trim();
    if !email.is_empty() {
        errors.pattern(Field::StoreEmail, email, &EMAIL_RE, "Enter a valid email address");
    }
    let phone = store.store_phone.trim();
    if !phone.is_empty() {
        errors.pattern(Field::StorePhone, phone, &MOBILE_RE, "Enter a valid 10-digit phone number");
    }
    errors
}

#[must_use]
pub fn validate_owner_info(owner: &OwnerInfo) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require(Field::OwnerName, &owner.owner_name, "Owner name is required");

    if errors.require(Field::Mobile, &owner.mobile, "Mobile number is required") {
        errors.pattern(Field::Mobile, owner.mobile.trim(), &MOBILE_RE, "Enter a valid 10-digit mobile number");
    }
    if errors.require(Field::Email, &owner.email, "Email is required") {
        errors.pattern(Field::Email, owner.email.trim(), &EMAIL_RE, "Enter a valid email address");
    }

    let alternate = owner.alternate_mobile.trim();
    if !alternate.is_empty() {
        errors.pattern(Field::AlternateMobile, alternate, &MOBILE_RE, "Enter a valid 10-digit mobile number");
    }
    errors
}

/// Uploads are optional here; only documents rejected by a reviewer block the step.
#[must_use]
pub fn validate_documents(documents: &DocumentSet) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for entry in documents.iter().filter(|e| e.status == DocumentStatus::Rejected) {
        let reason = entry.rejection_reason.as_deref().unwrap_or("Document was rejected");
        errors.insert(format!("documents.{}", entry.id), format!("{reason}. Please upload a new file"));
    }
    errors
}

#[must_use]
pub fn validate_location(location: &LocationData) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.require(Field::AddressLine1, &location.address_line1, "Address is required");
    errors.require(Field::City, &location.city, "City is required");

    if errors.require(Field::Pincode, &location.pincode, "Pincode is required") {
        errors.pattern(Field::Pincode, location.pincode.trim(), &PINCODE_RE, "Enter a valid 6-digit pincode");
    }

    if location.latitude.is_some_and(|lat| !(-90.0..=90.0).contains(&lat)) {
        errors.insert(Field::Latitude.as_ref(), "Latitude must be between -90 and 90");
    }
    if location.longitude.is_some_and(|lon| !(-180.0..=180.0).contains(&lon)) {
        errors.insert(Field::Longitude.as_ref(), "Longitude must be between -180 and 180");
    }
    errors
}

#[must_use]
pub fn validate_store_setup(setup: &StoreSetup) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if !setup.open_24_hours {
        let opening = parse_time(&setup.opening_time);
        let closing = parse_time(&setup.closing_time);
        if opening.is_none() {
            errors.insert(Field::OpeningTime.as_ref(), "Use HH:MM format");
        }
        if closing.is_none() {
            errors.insert(Field::ClosingTime.as_ref(), "Use HH:MM format");
        }
        if let (Some(opening), Some(closing)) = (opening, closing)
            && opening >= closing
        {
            errors.insert(Field::ClosingTime.as_ref(), "Closing time must be after opening time");
        }
    }

    if setup.working_days.is_empty() {
        errors.insert(WORKING_DAYS_KEY, "Select at least one working day");
    }
    if setup.home_delivery && setup.delivery_radius_km.partial_cmp(&0.0) != Some(std::cmp::Ordering::Greater) {
        errors.insert(Field::DeliveryRadiusKm.as_ref(), "Delivery radius must be greater than 0 km");
    }
    if setup.payment_methods.is_empty() {
        errors.insert(PAYMENT_METHODS_KEY, "Select at least one payment method");
    }
    errors
}

#[must_use]
pub fn validate_consent(consent: &ConsentRecord) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    let checks = [
        (Field::TermsAccepted, consent.terms_accepted, "Accept the terms and conditions"),
        (Field::PrivacyAccepted, consent.privacy_accepted, "Accept the privacy policy"),
        (Field::DataAccuracyConfirmed, consent.data_accuracy_confirmed, "Confirm the information is accurate"),
        (Field::AuthorizedSignatory, consent.authorized_signatory, "Confirm you are an authorized signatory"),
    ];
    for (field, granted, message) in checks {
        if !granted {
            errors.insert(field.as_ref(), message);
        }
    }
    errors.require(Field::SignatureName, &consent.signature_name, "Type your full name as signature");
    errors
}

/// Minutes since midnight.
fn parse_time(value: &str) -> Option<u32> {
    let caps = TIME_RE.captures(value.trim())?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::{Attachment, FileHandle};

    fn valid_store() -> StoreDetails {
        StoreDetails {
            store_name: "MediCare".to_owned(),
            gst_number: "22AAAAA0000A1Z5".to_owned(),
            ..StoreDetails::default()
        }
    }

    #[test]
    fn store_name_and_gst_are_required() {
        let errors = validate_store_details(&StoreDetails::default());
        assert_eq!(errors.field(Field::StoreName), Some("Store name is required"));
        assert_eq!(errors.field(Field::GstNumber), Some("GST number is required"));
        assert!(validate_store_details(&valid_store()).is_empty());
    }

    #[test]
    fn gstin_is_normalized_before_matching() {
        let mut store = valid_store();
        store.gst_number = "  22aaaaa0000a1z5 ".to_owned();
        assert!(validate_store_details(&store).is_empty());

        store.gst_number = "22AAAAA0000A1Y5".to_owned();
        assert!(validate_store_details(&store).field(Field::GstNumber).is_some());
    }

    #[test]
    fn optional_contact_fields_checked_when_present() {
        let mut store = valid_store();
        store.store_email = "not-an-email".to_owned();
        store.store_phone = "12345".to_owned();
        let errors = validate_store_details(&store);
        assert_eq!(errors.len(), 2);
        assert!(errors.field(Field::StoreEmail).is_some());
        assert!(errors.field(Field::StorePhone).is_some());
    }

    #[test]
    fn owner_mobile_must_start_with_six_to_nine() {
        let mut owner = OwnerInfo {
            owner_name: "Jane Doe".to_owned(),
            mobile: "5876543210".to_owned(),
            email: "jane@store.com".to_owned(),
            ..OwnerInfo::default()
        };
        assert!(validate_owner_info(&owner).field(Field::Mobile).is_some());
        owner.mobile = "9876543210".to_owned();
        assert!(validate_owner_info(&owner).is_empty());
    }

    #[test]
    fn only_rejected_documents_block_the_step() {
        let mut documents = DocumentSet::default();
        assert!(validate_documents(&documents).is_empty());

        let entry = documents.get_mut("gstCertificate").unwrap();
        entry.attach(Attachment::Uploaded(FileHandle::new("gst.pdf", "application/pdf", 10))).unwrap();
        entry.reject("Certificate expired").unwrap();

        let errors = validate_documents(&documents);
        assert_eq!(
            errors.get("documents.gstCertificate"),
            Some("Certificate expired. Please upload a new file")
        );
    }

    #[test]
    fn location_ranges_and_pincode() {
        let location = LocationData {
            address_line1: "1 Main St".to_owned(),
            city: "Pune".to_owned(),
            pincode: "011001".to_owned(),
            latitude: Some(91.0),
            longitude: Some(73.85),
            ..LocationData::default()
        };
        let errors = validate_location(&location);
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["latitude", "pincode"]);
    }

    #[test]
    fn store_setup_defaults_are_valid() {
        assert!(validate_store_setup(&StoreSetup::default()).is_empty());
    }

    #[test]
    fn store_setup_rules() {
        let mut setup = StoreSetup {
            opening_time: "22:00".to_owned(),
            closing_time: "9pm".to_owned(),
            home_delivery: true,
            ..StoreSetup::default()
        };
        setup.working_days.clear();
        setup.payment_methods.clear();

        let errors = validate_store_setup(&setup);
        assert_eq!(errors.field(Field::ClosingTime), Some("Use HH:MM format"));
        assert!(errors.field(Field::DeliveryRadiusKm).is_some());
        assert!(errors.get(WORKING_DAYS_KEY).is_some());
        assert!(errors.get(PAYMENT_METHODS_KEY).is_some());

        setup.closing_time = "21:00".to_owned();
        assert_eq!(
            validate_store_setup(&setup).field(Field::ClosingTime),
            Some("Closing time must be after opening time")
        );

        setup.open_24_hours = true;
        assert!(validate_store_setup(&setup).field(Field::ClosingTime).is_none());
    }

    #[test]
    fn consent_lists_each_missing_item() {
        let errors = validate_consent(&ConsentRecord { terms_accepted: true, ..ConsentRecord::default() });
        assert_eq!(errors.len(), 4);
        assert!(errors.field(Field::TermsAccepted).is_none());
        assert!(errors.field(Field::SignatureName).is_some());
    }

    #[test]
    fn parse_time_bounds() {
        assert_eq!(parse_time("09:30"), Some(570));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("9:30"), None);
    }
}
