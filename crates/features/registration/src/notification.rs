use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

/// A short user-visible message. Frontends decide how long to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub level: ToastLevel,
    pub title: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl Toast {
    pub fn success(title: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self { level: ToastLevel::Success, title: title.into(), message: message.into() }
    }

    pub fn error(title: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self { level: ToastLevel::Error, title: title.into(), message: message.into() }
    }

    pub fn info(title: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self { level: ToastLevel::Info, title: title.into(), message: message.into() }
    }
}
