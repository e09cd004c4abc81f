//! Wizard steps and the presentational view of the current one.

use crate::controller::WizardController;
use crate::draft::{Field, ImageSlot};
use crate::validation::ValidationErrors;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

pub const TOTAL_STEPS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    #[strum(to_string = "Store Details")]
    StoreDetails,
    #[strum(to_string = "Owner Information")]
    OwnerInfo,
    #[strum(to_string = "Documents")]
    Documents,
    #[strum(to_string = "Location")]
    Location,
    #[strum(to_string = "Store Setup")]
    StoreSetup,
    #[strum(to_string = "Review & Consent")]
    Consent,
}

impl WizardStep {
    pub const FIRST: Self = Self::StoreDetails;
    pub const LAST: Self = Self::Consent;

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// 1-based position.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::iter().find(|step| step.number() == number)
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::LAST)
    }

    #[must_use]
    pub fn title(self) -> String {
        self.to_string()
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::StoreDetails => "Tell us about your pharmacy",
            Self::OwnerInfo => "Who runs the store",
            Self::Documents => "Upload licences and certificates",
            Self::Location => "Where customers can find you",
            Self::StoreSetup => "Hours, delivery and payments",
            Self::Consent => "Check your details and sign",
        }
    }

    /// Scalar fields shown on this step, in display order.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::StoreDetails => STORE_FIELDS,
            Self::OwnerInfo => OWNER_FIELDS,
            Self::Documents => &[],
            Self::Location => LOCATION_FIELDS,
            Self::StoreSetup => SETUP_FIELDS,
            Self::Consent => CONSENT_FIELDS,
        }
    }

    /// Photo upload shown alongside this step's fields.
    #[must_use]
    pub const fn image_slot(self) -> Option<ImageSlot> {
        match self {
            Self::StoreDetails => Some(ImageSlot::StoreLogo),
            Self::OwnerInfo => Some(ImageSlot::OwnerPhoto),
            Self::Location => Some(ImageSlot::StorefrontPhoto),
            Self::Documents | Self::StoreSetup | Self::Consent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Number,
    Time,
    Checkbox,
    /// One of the [`crate::draft::StoreType`] values.
    StoreType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub field: Field,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field_spec(field: Field, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec { field, label, kind, required }
}

const STORE_FIELDS: &[FieldSpec] = &[
    field_spec(Field::StoreName, "Store Name", FieldKind::Text, true),
    field_spec(Field::StoreType, "Store Type", FieldKind::StoreType, false),
    field_spec(Field::GstNumber, "GST Number", FieldKind::Text, true),
    field_spec(Field::DrugLicenseNumber, "Drug Licence Number", FieldKind::Text, false),
    field_spec(Field::StoreEmail, "Store Email", FieldKind::Email, false),
    field_spec(Field::StorePhone, "Store Phone", FieldKind::Phone, false),
];

const OWNER_FIELDS: &[FieldSpec] = &[
    field_spec(Field::OwnerName, "Full Name", FieldKind::Text, true),
    field_spec(Field::Mobile, "Mobile Number", FieldKind::Phone, true),
    field_spec(Field::Email, "Email Address", FieldKind::Email, true),
    field_spec(Field::AlternateMobile, "Alternate Mobile", FieldKind::Phone, false),
];

const LOCATION_FIELDS: &[FieldSpec] = &[
    field_spec(Field::AddressLine1, "Address Line 1", FieldKind::Text, true),
    field_spec(Field::AddressLine2, "Address Line 2", FieldKind::Text, false),
    field_spec(Field::Landmark, "Landmark", FieldKind::Text, false),
    field_spec(Field::City, "City", FieldKind::Text, true),
    field_spec(Field::State, "State", FieldKind::Text, false),
    field_spec(Field::Pincode, "Pincode", FieldKind::Text, true),
    field_spec(Field::Latitude, "Latitude", FieldKind::Number, false),
    field_spec(Field::Longitude, "Longitude", FieldKind::Number, false),
];

const SETUP_FIELDS: &[FieldSpec] = &[
    field_spec(Field::OpeningTime, "Opening Time", FieldKind::Time, true),
    field_spec(Field::ClosingTime, "Closing Time", FieldKind::Time, true),
    field_spec(Field::Open24Hours, "Open 24 hours", FieldKind::Checkbox, false),
    field_spec(Field::HomeDelivery, "Home delivery", FieldKind::Checkbox, false),
    field_spec(Field::DeliveryRadiusKm, "Delivery Radius (km)", FieldKind::Number, false),
];

const CONSENT_FIELDS: &[FieldSpec] = &[
    field_spec(Field::TermsAccepted, "I accept the Terms & Conditions", FieldKind::Checkbox, true),
    field_spec(Field::PrivacyAccepted, "I accept the Privacy Policy", FieldKind::Checkbox, true),
    field_spec(
        Field::DataAccuracyConfirmed,
        "I confirm the information provided is accurate",
        FieldKind::Checkbox,
        true,
    ),
    field_spec(Field::AuthorizedSignatory, "I am authorized to register this store", FieldKind::Checkbox, true),
    field_spec(Field::SignatureName, "Digital Signature (type full name)", FieldKind::Text, true),
];

/// What a frontend needs to draw the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub step: WizardStep,
    pub index: u8,
    pub total: u8,
    pub title: String,
    pub description: &'static str,
    pub progress_percent: u8,
    pub can_go_back: bool,
    pub is_final: bool,
    pub primary_action: &'static str,
    /// Primary action disabled while a submission or save is in flight.
    pub busy: bool,
    pub fields: &'static [FieldSpec],
    pub errors: ValidationErrors,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StepRenderer;

impl StepRenderer {
    #[must_use]
    pub fn render(controller: &WizardController) -> StepView {
        let step = controller.current_step();
        let busy = controller.is_submitting() || controller.is_saving();
        let primary_action = match (step.is_final(), controller.is_submitting()) {
            (true, true) => "Submitting...",
            (true, false) => "Submit Registration",
            (false, _) => "Next",
        };

        StepView {
            step,
            index: step.number(),
            total: TOTAL_STEPS,
            title: step.title(),
            description: step.description(),
            progress_percent: progress_percent(step),
            can_go_back: step.previous().is_some() && !busy,
            is_final: step.is_final(),
            primary_action,
            busy,
            fields: step.fields(),
            errors: controller.errors().clone(),
        }
    }
}

/// Share of the wizard completed when `step` is shown; 100 on the final step.
#[must_use]
pub fn progress_percent(step: WizardStep) -> u8 {
    let done = u16::from(step.number() - 1);
    u8::try_from(done * 100 / u16::from(TOTAL_STEPS - 1)).unwrap_or(100)
}
