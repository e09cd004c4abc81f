//! The registration draft: one data slice per wizard step.
//!
//! Every slice deserializes with defaults for missing fields so drafts saved by older
//! builds still load.

use crate::attachment::{Attachment, AttachmentKind};
use crate::documents::DocumentSet;
use crate::error::RegistrationError;
use pheco_kernel::safe_nanoid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum StoreType {
    #[default]
    Retail,
    Wholesale,
    Hospital,
    Online,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
    NetBanking,
    Insurance,
}

/// Step 1.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreDetails {
    pub store_name: String,
    pub store_type: StoreType,
    pub gst_number: String,
    pub drug_license_number: String,
    pub store_email: String,
    pub store_phone: String,
    pub logo: Attachment,
}

/// Step 2.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OwnerInfo {
    pub owner_name: String,
    pub mobile: String,
    pub email: String,
    pub alternate_mobile: String,
    pub photo: Attachment,
}

/// Step 4.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationData {
    pub address_line1: String,
    pub address_line2: String,
    pub landmark: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub storefront_photo: Attachment,
}

/// Step 5. Defaults describe a store that validates as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSetup {
    /// `HH:MM`, 24-hour clock.
    pub opening_time: String,
    pub closing_time: String,
    /// Hours are ignored when set.
    pub open_24_hours: bool,
    pub working_days: BTreeSet<Weekday>,
    pub home_delivery: bool,
    pub delivery_radius_km: f64,
    pub payment_methods: BTreeSet<PaymentMethod>,
}

impl Default for StoreSetup {
    fn default() -> Self {
        Self {
            opening_time: "09:00".to_owned(),
            closing_time: "21:00".to_owned(),
            open_24_hours: false,
            working_days: BTreeSet::from([
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
                Weekday::Saturday,
            ]),
            home_delivery: false,
            delivery_radius_km: 0.0,
            payment_methods: BTreeSet::from([PaymentMethod::Cash, PaymentMethod::Upi]),
        }
    }
}

impl StoreSetup {
    /// Returns whether the day is selected afterwards.
    pub fn toggle_working_day(&mut self, day: Weekday) -> bool {
        if self.working_days.remove(&day) {
            false
        } else {
            self.working_days.insert(day)
        }
    }

    pub fn toggle_payment_method(&mut self, method: PaymentMethod) -> bool {
        if self.payment_methods.remove(&method) {
            false
        } else {
            self.payment_methods.insert(method)
        }
    }
}

/// Step 6.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsentRecord {
    pub terms_accepted: bool,
    pub privacy_accepted: bool,
    pub data_accuracy_confirmed: bool,
    pub authorized_signatory: bool,
    /// Typed full name acting as the signature.
    pub signature_name: String,
}

impl ConsentRecord {
    #[must_use]
    pub const fn granted_count(&self) -> usize {
        self.terms_accepted as usize
            + self.privacy_accepted as usize
            + self.data_accuracy_confirmed as usize
            + self.authorized_signatory as usize
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.granted_count() == 4 && !self.signature_name.trim().is_empty()
    }
}

/// Everything the merchant has entered so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub id: String,
    pub store: StoreDetails,
    pub owner: OwnerInfo,
    pub documents: DocumentSet,
    pub location: LocationData,
    pub setup: StoreSetup,
    pub consent: ConsentRecord,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            id: safe_nanoid!(),
            store: StoreDetails::default(),
            owner: OwnerInfo::default(),
            documents: DocumentSet::default(),
            location: LocationData::default(),
            setup: StoreSetup::default(),
            consent: ConsentRecord::default(),
        }
    }
}

/// Scalar form fields, named the way they appear in serialized drafts and in
/// validation error keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    StoreName,
    StoreType,
    GstNumber,
    DrugLicenseNumber,
    StoreEmail,
    StorePhone,
    OwnerName,
    Mobile,
    Email,
    AlternateMobile,
    AddressLine1,
    AddressLine2,
    Landmark,
    City,
    State,
    Pincode,
    Latitude,
    Longitude,
    OpeningTime,
    ClosingTime,
    Open24Hours,
    HomeDelivery,
    DeliveryRadiusKm,
    TermsAccepted,
    PrivacyAccepted,
    DataAccuracyConfirmed,
    AuthorizedSignatory,
    SignatureName,
}

/// Image inputs outside the documents step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum ImageSlot {
    StoreLogo,
    OwnerPhoto,
    StorefrontPhoto,
}

impl ImageSlot {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StoreLogo => "Store Logo",
            Self::OwnerPhoto => "Owner Photo",
            Self::StorefrontPhoto => "Storefront Photo",
        }
    }
}

impl RegistrationDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw form value. Text is kept as typed; trimming and normalization happen
    /// in validation.
    ///
    /// # Errors
    /// [`RegistrationError::InvalidFieldValue`] when the value does not parse for a
    /// numeric, boolean or choice field.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), RegistrationError> {
        match field {
            Field::StoreName => self.store.store_name = value.to_owned(),
            Field::StoreType => self.store.store_type = parse_value(field, value)?,
            Field::GstNumber => self.store.gst_number = value.to_owned(),
            Field::DrugLicenseNumber => self.store.drug_license_number = value.to_owned(),
            Field::StoreEmail => self.store.store_email = value.to_owned(),
            Field::StorePhone => self.store.store_phone = value.to_owned(),
            Field::OwnerName => self.owner.owner_name = value.to_owned(),
            Field::Mobile => self.owner.mobile = value.to_owned(),
            Field::Email => self.owner.email = value.to_owned(),
            Field::AlternateMobile => self.owner.alternate_mobile = value.to_owned(),
            Field::AddressLine1 => self.location.address_line1 = value.to_owned(),
            Field::AddressLine2 => self.location.address_line2 = value.to_owned(),
            Field::Landmark => self.location.landmark = value.to_owned(),
            Field::City => self.location.city = value.to_owned(),
            Field::State => self.location.state = value.to_owned(),
            Field::Pincode => self.location.pincode = value.to_owned(),
            Field::Latitude => self.location.latitude = parse_optional(field, value)?,
            Field::Longitude => self.location.longitude = parse_optional(field, value)?,
            Field::OpeningTime => self.setup.opening_time = value.to_owned(),
            Field::ClosingTime => self.setup.closing_time = value.to_owned(),
            Field::Open24Hours => self.setup.open_24_hours = parse_flag(field, value)?,
            Field::HomeDelivery => self.setup.home_delivery = parse_flag(field, value)?,
            Field::DeliveryRadiusKm => {
                self.setup.delivery_radius_km = parse_optional(field, value)?.unwrap_or_default();
            },
            Field::TermsAccepted => self.consent.terms_accepted = parse_flag(field, value)?,
            Field::PrivacyAccepted => self.consent.privacy_accepted = parse_flag(field, value)?,
            Field::DataAccuracyConfirmed => {
                self.consent.data_accuracy_confirmed = parse_flag(field, value)?;
            },
            Field::AuthorizedSignatory => self.consent.authorized_signatory = parse_flag(field, value)?,
            Field::SignatureName => self.consent.signature_name = value.to_owned(),
        }
        Ok(())
    }

    /// Current value of a field as a form would display it.
    #[must_use]
    pub fn field_value(&self, field: Field) -> String {
        let optional = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        match field {
            Field::StoreName => self.store.store_name.clone(),
            Field::StoreType => self.store.store_type.to_string(),
            Field::GstNumber => self.store.gst_number.clone(),
            Field::DrugLicenseNumber => self.store.drug_license_number.clone(),
            Field::StoreEmail => self.store.store_email.clone(),
            Field::StorePhone => self.store.store_phone.clone(),
            Field::OwnerName => self.owner.owner_name.clone(),
            Field::Mobile => self.owner.mobile.clone(),
            Field::Email => self.owner.email.clone(),
            Field::AlternateMobile => self.owner.alternate_mobile.clone(),
            Field::AddressLine1 => self.location.address_line1.clone(),
            Field::AddressLine2 => self.location.address_line2.clone(),
            Field::Landmark => self.location.landmark.clone(),
            Field::City => self.location.city.clone(),
            Field::State => self.location.state.clone(),
            Field::Pincode => self.location.pincode.clone(),
            Field::Latitude => optional(self.location.latitude),
            Field::Longitude => optional(self.location.longitude),
            Field::OpeningTime => self.setup.opening_time.clone(),
            Field::ClosingTime => self.setup.closing_time.clone(),
            Field::Open24Hours => self.setup.open_24_hours.to_string(),
            Field::HomeDelivery => self.setup.home_delivery.to_string(),
            Field::DeliveryRadiusKm => self.setup.delivery_radius_km.to_string(),
            Field::TermsAccepted => self.consent.terms_accepted.to_string(),
            Field::PrivacyAccepted => self.consent.privacy_accepted.to_string(),
            Field::DataAccuracyConfirmed => self.consent.data_accuracy_confirmed.to_string(),
            Field::AuthorizedSignatory => self.consent.authorized_signatory.to_string(),
            Field::SignatureName => self.consent.signature_name.clone(),
        }
    }

    /// # Errors
    /// [`RegistrationError::UnsupportedMime`] for anything but JPEG, PNG or WebP.
    pub fn set_image(&mut self, slot: ImageSlot, attachment: Attachment) -> Result<(), RegistrationError> {
        AttachmentKind::Image.check(&attachment)?;
        *self.image_mut(slot) = attachment;
        Ok(())
    }

    #[must_use]
    pub const fn image(&self, slot: ImageSlot) -> &Attachment {
        match slot {
            ImageSlot::StoreLogo => &self.store.logo,
            ImageSlot::OwnerPhoto => &self.owner.photo,
            ImageSlot::StorefrontPhoto => &self.location.storefront_photo,
        }
    }

    const fn image_mut(&mut self, slot: ImageSlot) -> &mut Attachment {
        match slot {
            ImageSlot::StoreLogo => &mut self.store.logo,
            ImageSlot::OwnerPhoto => &mut self.owner.photo,
            ImageSlot::StorefrontPhoto => &mut self.location.storefront_photo,
        }
    }

    /// Every attachment in the draft, images and documents alike.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        [&self.store.logo, &self.owner.photo, &self.location.storefront_photo]
            .into_iter()
            .chain(self.documents.attachments())
    }
}

fn invalid(field: Field, value: &str) -> RegistrationError {
    RegistrationError::InvalidFieldValue {
        message: format!("'{value}' is not valid here").into(),
        context: Some(field.as_ref().to_owned().into()),
    }
}

fn parse_value<T: FromStr>(field: Field, value: &str) -> Result<T, RegistrationError> {
    value.trim().parse().map_err(|_| invalid(field, value))
}

/// Empty input clears the value.
fn parse_optional(field: Field, value: &str) -> Result<Option<f64>, RegistrationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite()).map(Some).ok_or_else(|| invalid(field, value))
}

/// Accepts the values checkboxes produce: `true`/`false`, `on`/`off`, `1`/`0`, or empty.
fn parse_flag(field: Field, value: &str) -> Result<bool, RegistrationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" | "" => Ok(false),
        _ => Err(invalid(field, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::FileHandle;
    use strum::IntoEnumIterator;

    #[test]
    fn default_setup_has_business_hours() {
        let setup = StoreSetup::default();
        assert_eq!(setup.opening_time, "09:00");
        assert_eq!(setup.working_days.len(), 6);
        assert!(!setup.working_days.contains(&Weekday::Sunday));
        assert!(setup.payment_methods.contains(&PaymentMethod::Upi));
    }

    #[test]
    fn drafts_get_distinct_ids() {
        assert_ne!(RegistrationDraft::new().id, RegistrationDraft::new().id);
    }

    #[test]
    fn every_field_round_trips_through_its_display_value() {
        let mut draft = RegistrationDraft::new();
        for field in Field::iter() {
            let value = draft.field_value(field);
            draft.set_field(field, &value).unwrap();
            assert_eq!(draft.field_value(field), value, "{field}");
        }
    }

    #[test]
    fn set_field_parses_typed_values() {
        let mut draft = RegistrationDraft::new();
        draft.set_field(Field::StoreType, "Wholesale").unwrap();
        draft.set_field(Field::Latitude, "18.52").unwrap();
        draft.set_field(Field::HomeDelivery, "on").unwrap();
        assert_eq!(draft.store.store_type, StoreType::Wholesale);
        assert_eq!(draft.location.latitude, Some(18.52));
        assert!(draft.setup.home_delivery);

        draft.set_field(Field::Latitude, "  ").unwrap();
        assert_eq!(draft.location.latitude, None);

        let err = draft.set_field(Field::Longitude, "east").unwrap_err();
        assert_eq!(err.to_string(), "Invalid field value (longitude): 'east' is not valid here");
        assert!(draft.set_field(Field::TermsAccepted, "maybe").is_err());
    }

    #[test]
    fn toggles_report_selection() {
        let mut setup = StoreSetup::default();
        assert!(setup.toggle_working_day(Weekday::Sunday));
        assert!(!setup.toggle_working_day(Weekday::Monday));
        assert!(!setup.toggle_payment_method(PaymentMethod::Cash));
        assert_eq!(setup.payment_methods.len(), 1);
    }

    #[test]
    fn image_slots_reject_documents() {
        let mut draft = RegistrationDraft::new();
        let pdf = Attachment::Uploaded(FileHandle::new("logo.pdf", "application/pdf", 10));
        assert!(draft.set_image(ImageSlot::StoreLogo, pdf).is_err());

        let png = Attachment::pending("logo.png", "image/png", vec![0; 4]);
        draft.set_image(ImageSlot::StoreLogo, png).unwrap();
        assert!(draft.image(ImageSlot::StoreLogo).is_present());
        assert_eq!(draft.attachments().filter(|a| a.is_present()).count(), 1);
    }

    #[test]
    fn consent_requires_signature() {
        let mut consent = ConsentRecord {
            terms_accepted: true,
            privacy_accepted: true,
            data_accuracy_confirmed: true,
            authorized_signatory: true,
            signature_name: "   ".to_owned(),
        };
        assert_eq!(consent.granted_count(), 4);
        assert!(!consent.is_complete());
        consent.signature_name = "Jane Doe".to_owned();
        assert!(consent.is_complete());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let draft: RegistrationDraft =
            serde_json::from_str(r#"{"id":"abc","store":{"storeName":"MediCare"}}"#).unwrap();
        assert_eq!(draft.id, "abc");
        assert_eq!(draft.store.store_name, "MediCare");
        assert_eq!(draft.setup, StoreSetup::default());
        assert_eq!(draft.documents.len(), 4);
    }
}
