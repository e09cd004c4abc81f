use dioxus::desktop::{Config, WindowBuilder};
use dioxus::prelude::*;
use pheco::domain::config::AppConfig;
use pheco::domain::state::{AppState, Theme};
use pheco::features::registration::client::{RegistrationWizard, WizardServices};

#[derive(Debug)]
pub struct DesktopApp {
    title: String,
    width: f64,
    height: f64,
    config: AppConfig,
}

impl Default for DesktopApp {
    fn default() -> Self {
        Self { title: "PharmEco Merchant Registration".to_owned(), width: 1200.0, height: 800.0, config: AppConfig::default() }
    }
}

impl DesktopApp {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self { config, ..Self::default() }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use = "This function does nothing unless you call `launch()` on it"]
    pub const fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Opens the window and blocks until it is closed.
    pub fn launch(self) {
        let window = WindowBuilder::new().with_title(&self.title).with_inner_size(
            dioxus::desktop::LogicalSize { width: self.width, height: self.height },
        );

        let cfg = Config::default().with_window(window).with_custom_head(
            r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#.into(),
        );

        let services = WizardServices::from_config(&self.config.registration);
        LaunchBuilder::desktop()
            .with_cfg(cfg)
            .with_context_provider(move || Box::new(services.clone()))
            .launch(App);
    }
}

/// Application shell: theme and sidebar around the registration wizard.
#[component]
fn App() -> Element {
    let mut state = use_context_provider(|| Signal::new(AppState::default()));
    let theme_class = match state.read().theme {
        Theme::Light => "app theme-light",
        Theme::Dark => "app theme-dark",
    };
    let sidebar = state.read().sidebar;

    rsx! {
        div { class: theme_class,
            header { class: "app-header",
                button { class: "btn btn-icon", onclick: move |_| state.write().toggle_sidebar(), "☰" }
                h1 { "PharmEco" }
                button { class: "btn btn-icon", onclick: move |_| state.write().toggle_theme(),
                    if state.read().theme == Theme::Light { "Dark mode" } else { "Light mode" }
                }
            }
            div { class: "app-body",
                if sidebar.open {
                    nav { class: if sidebar.collapsed { "sidebar collapsed" } else { "sidebar" },
                        button { class: "btn btn-link", onclick: move |_| state.write().toggle_sidebar_collapsed(),
                            if sidebar.collapsed { "»" } else { "«" }
                        }
                        a { class: "nav-item active", "Register Store" }
                    }
                }
                main { class: "app-main", RegistrationWizard {} }
            }
        }
    }
}
