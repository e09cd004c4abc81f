//! Dioxus components for the registration wizard.
//!
//! The components only draw a [`StepView`] and forward input to the
//! [`WizardController`] held in a signal. Collaborators come from context as
//! [`WizardServices`].

use crate::attachment::{Attachment, AttachmentKind};
use crate::controller::WizardController;
use crate::documents::{DocumentEntry, DocumentStatus};
use crate::draft::{ImageSlot, PaymentMethod, StoreType, Weekday};
use crate::notification::{Toast, ToastLevel};
use crate::review::ReviewSummary;
use crate::service::{DraftStore, MemoryDraftStore, RegistrationService, SimulatedRegistrationService};
use crate::steps::{FieldKind, FieldSpec, StepView, WizardStep};
use dioxus::html::FileData;
use dioxus::prelude::*;
use pheco_domain::config::RegistrationConfig;
use strum::IntoEnumIterator;

/// Collaborators used by [`RegistrationWizard`]; provide with `use_context_provider`.
#[derive(Debug, Clone, Default)]
pub struct WizardServices {
    pub registration: SimulatedRegistrationService,
    pub drafts: MemoryDraftStore,
}

impl WizardServices {
    #[must_use]
    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self {
            registration: SimulatedRegistrationService::from_config(config),
            drafts: MemoryDraftStore::new().with_delay(config.save_delay()),
        }
    }
}

#[component]
pub fn RegistrationWizard() -> Element {
    let services = use_context::<WizardServices>();
    let mut wizard = use_signal(WizardController::new);

    let view = wizard.read().view();
    let summary = wizard.read().review();
    let toast = wizard.read().last_notification().cloned();

    if wizard.read().is_success() {
        let reference = wizard.read().receipt().map(|r| r.reference.clone()).unwrap_or_default();
        return rsx! {
            div { class: "page registration-success",
                h2 { "Registration submitted" }
                p { "Your reference number is {reference}. We will verify your documents shortly." }
                button { class: "btn btn-primary", onclick: move |_| wizard.write().reset(), "Register another store" }
            }
        };
    }

    let submit_services = services.clone();
    let on_primary = move |_| {
        if !view_is_final(&wizard.read()) {
            wizard.write().next();
            return;
        }
        let Ok(draft) = wizard.write().begin_submit() else {
            return;
        };
        let service = submit_services.registration.clone();
        spawn(async move {
            let result = service.submit(&draft).await;
            wizard.write().finish_submit(result);
        });
    };

    let on_save = move |_| {
        let draft = wizard.write().begin_save();
        let store = services.drafts.clone();
        spawn(async move {
            let result = store.save(&draft).await;
            if let Err(err) = wizard.write().finish_save(result) {
                tracing::warn!(error = %err, "Draft save failed");
            }
        });
    };

    let step_extras = match (view.step, view.step.image_slot()) {
        (_, Some(slot)) => rsx! { ImageUpload { wizard, slot } },
        (WizardStep::Documents, None) => rsx! { DocumentList { wizard } },
        (WizardStep::StoreSetup, None) => rsx! { SetupToggles { wizard } },
        (WizardStep::Consent, None) => rsx! { ReviewPanel { summary: summary.clone() } },
        _ => rsx! {},
    };

    rsx! {
        div { class: "page registration-wizard",
            ProgressHeader { view: view.clone() }
            if let Some(toast) = toast {
                ToastBanner { toast }
            }

            div { class: "wizard-body",
                div { class: "step-form",
                    for spec in view.fields.iter().copied() {
                        FieldInput {
                            key: "{spec.field}",
                            spec,
                            value: wizard.read().draft().field_value(spec.field),
                            error: view.errors.field(spec.field).map(str::to_owned),
                            on_change: move |value: String| {
                                if let Err(err) = wizard.write().set_field(spec.field, &value) {
                                    tracing::debug!(error = %err, "Rejected form value");
                                }
                            },
                        }
                    }
                    {step_extras}
                }
                aside { class: "live-preview", ReviewPanel { summary } }
            }

            div { class: "wizard-actions",
                button {
                    class: "btn btn-secondary",
                    disabled: !view.can_go_back,
                    onclick: move |_| {
                        wizard.write().back();
                    },
                    "Back"
                }
                button {
                    class: "btn btn-outline",
                    disabled: view.busy,
                    onclick: on_save,
                    if wizard.read().is_saving() { "Saving..." } else { "Save Draft" }
                }
                button { class: "btn btn-primary", disabled: view.busy, onclick: on_primary, "{view.primary_action}" }
            }
        }
    }
}

fn view_is_final(wizard: &WizardController) -> bool {
    wizard.current_step().is_final()
}

#[component]
fn ProgressHeader(view: StepView) -> Element {
    rsx! {
        div { class: "wizard-header",
            p { class: "step-counter", "Step {view.index} of {view.total}" }
            h2 { "{view.title}" }
            p { class: "step-description", "{view.description}" }
            div { class: "progress-bar",
                div { class: "progress-fill", style: "width: {view.progress_percent}%" }
            }
        }
    }
}

#[component]
fn ToastBanner(toast: Toast) -> Element {
    let class = match toast.level {
        ToastLevel::Success => "toast toast-success",
        ToastLevel::Error => "toast toast-error",
        ToastLevel::Info => "toast toast-info",
    };
    rsx! {
        div { class, role: "status",
            strong { "{toast.title}" }
            p { "{toast.message}" }
        }
    }
}

#[component]
fn FieldInput(spec: FieldSpec, value: String, error: Option<String>, on_change: EventHandler<String>) -> Element {
    let label = if spec.required { format!("{} *", spec.label) } else { spec.label.to_owned() };
    let input = match spec.kind {
        FieldKind::Checkbox => rsx! {
            input {
                r#type: "checkbox",
                checked: value == "true",
                onchange: move |evt: FormEvent| on_change.call(evt.checked().to_string()),
            }
        },
        FieldKind::StoreType => rsx! {
            select {
                value: "{value}",
                onchange: move |evt: FormEvent| on_change.call(evt.value()),
                for store_type in StoreType::iter() {
                    option { value: "{store_type}", "{store_type}" }
                }
            }
        },
        kind => {
            let input_type = match kind {
                FieldKind::Email => "email",
                FieldKind::Phone => "tel",
                FieldKind::Number => "number",
                FieldKind::Time => "time",
                _ => "text",
            };
            rsx! {
                input {
                    r#type: input_type,
                    value: "{value}",
                    oninput: move |evt: FormEvent| on_change.call(evt.value()),
                }
            }
        },
    };

    rsx! {
        label { class: if error.is_some() { "form-field has-error" } else { "form-field" },
            span { "{label}" }
            {input}
            if let Some(error) = error {
                small { class: "field-error", "{error}" }
            }
        }
    }
}

#[component]
fn DocumentList(wizard: Signal<WizardController>) -> Element {
    let entries: Vec<DocumentEntry> = wizard.read().draft().documents.iter().cloned().collect();
    let errors = wizard.read().errors().clone();

    let items = entries.into_iter().map(move |entry| {
        let mut wizard = wizard;
        let id = entry.id.clone();
        let upload_id = entry.id.clone();
        let error = errors.get(&format!("documents.{id}")).map(str::to_owned);
        rsx! {
            li { key: "{entry.id}", class: "document-item",
                div {
                    strong { "{entry.display_name}" }
                    if entry.required {
                        span { class: "badge", "Required" }
                    }
                }
                span { class: "document-status", "{entry.status}" }
                if let Some(name) = entry.attachment.file_name() {
                    span { class: "file-name", "{name}" }
                }
                if let Some(error) = error {
                    small { class: "field-error", "{error}" }
                }
                input {
                    r#type: "file",
                    accept: AttachmentKind::Document.accept_attribute(),
                    onchange: move |evt: FormEvent| {
                        let id = upload_id.clone();
                        let files = evt.files();
                        spawn(async move {
                            let Some(attachment) = read_picked(files).await else {
                                return;
                            };
                            if let Err(err) = wizard.write().attach_document(&id, attachment) {
                                tracing::warn!(error = %err, document = %id, "Document upload refused");
                            }
                        });
                    },
                }
                if entry.status != DocumentStatus::Pending {
                    button {
                        class: "btn btn-link",
                        onclick: move |_| {
                            if let Err(err) = wizard.write().remove_document(&id) {
                                tracing::warn!(error = %err, "Document removal failed");
                            }
                        },
                        "Remove"
                    }
                }
            }
        }
    });

    rsx! {
        ul { class: "document-list", {items} }
    }
}

#[component]
fn ImageUpload(mut wizard: Signal<WizardController>, slot: ImageSlot) -> Element {
    let current = wizard.read().draft().image(slot).file_name().map(str::to_owned);

    rsx! {
        div { class: "form-field image-upload",
            label { r#for: "{slot}-input", "{slot.label()}" }
            input {
                id: "{slot}-input",
                r#type: "file",
                accept: AttachmentKind::Image.accept_attribute(),
                onchange: move |evt: FormEvent| {
                    let files = evt.files();
                    spawn(async move {
                        let Some(attachment) = read_picked(files).await else {
                            return;
                        };
                        if let Err(err) = wizard.write().set_image(slot, attachment) {
                            tracing::warn!(error = %err, %slot, "Image upload refused");
                        }
                    });
                },
            }
            if let Some(name) = current {
                span { class: "file-name", "{name}" }
                button {
                    class: "btn btn-link",
                    onclick: move |_| {
                        if let Err(err) = wizard.write().set_image(slot, Attachment::Empty) {
                            tracing::warn!(error = %err, %slot, "Image removal failed");
                        }
                    },
                    "Remove"
                }
            }
        }
    }
}

/// Reads the first picked file into a pending attachment.
async fn read_picked(files: Vec<FileData>) -> Option<Attachment> {
    let file = files.into_iter().next()?;
    let name = file.name();
    match file.read_bytes().await {
        Ok(bytes) => Some(Attachment::picked(name, file.content_type().as_deref(), bytes.to_vec())),
        Err(err) => {
            tracing::warn!(error = %err, file = %name, "Could not read picked file");
            None
        },
    }
}

#[component]
fn SetupToggles(mut wizard: Signal<WizardController>) -> Element {
    let setup = wizard.read().draft().setup.clone();
    let errors = wizard.read().errors().clone();

    rsx! {
        fieldset { class: "toggle-group",
            legend { "Working Days" }
            for day in Weekday::iter() {
                label { key: "{day}",
                    input {
                        r#type: "checkbox",
                        checked: setup.working_days.contains(&day),
                        onchange: move |_| {
                            wizard.write().edit_store_setup(|s| {
                                s.toggle_working_day(day);
                            });
                        },
                    }
                    "{day}"
                }
            }
            if let Some(error) = errors.get(crate::validation::WORKING_DAYS_KEY) {
                small { class: "field-error", "{error}" }
            }
        }
        fieldset { class: "toggle-group",
            legend { "Payment Methods" }
            for method in PaymentMethod::iter() {
                label { key: "{method}",
                    input {
                        r#type: "checkbox",
                        checked: setup.payment_methods.contains(&method),
                        onchange: move |_| {
                            wizard.write().edit_store_setup(|s| {
                                s.toggle_payment_method(method);
                            });
                        },
                    }
                    "{method}"
                }
            }
            if let Some(error) = errors.get(crate::validation::PAYMENT_METHODS_KEY) {
                small { class: "field-error", "{error}" }
            }
        }
    }
}

#[component]
fn ReviewPanel(summary: ReviewSummary) -> Element {
    rsx! {
        div { class: "review-panel",
            h3 { if summary.store_name.is_empty() { "Your Store" } else { "{summary.store_name}" } }
            p { "{summary.store_type} pharmacy" }
            if !summary.owner_name.is_empty() {
                p { "Owner: {summary.owner_name}" }
            }
            if !summary.contact_email.is_empty() {
                p { "{summary.contact_email}" }
            }
            if !summary.city.is_empty() {
                p { "{summary.city} {summary.pincode}" }
            }
            p { "Documents: {summary.documents_uploaded}/{summary.documents_total}" }
            p { "Consents: {summary.consents_granted}/4" }
            ul { class: "section-list",
                for section in summary.sections.iter() {
                    li { class: if section.complete { "complete" } else { "incomplete" }, "{section.title}" }
                }
            }
        }
    }
}
