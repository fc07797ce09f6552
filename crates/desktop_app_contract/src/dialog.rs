//! Message box taxonomy shared by the shell and the apps that request user decisions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Logical outcome of a message box.
pub enum MessageBoxResult {
    /// "OK" button.
    Ok,
    /// "Cancel" button, and the title bar close button.
    Cancel,
    /// "Yes" button.
    Yes,
    /// "No" button.
    No,
    /// "Retry" button.
    Retry,
    /// "Abort" button.
    Abort,
    /// "Ignore" button.
    Ignore,
    /// The shell tore the dialog down without a user answer.
    Dismissed,
}

impl MessageBoxResult {
    /// Returns a stable string token, matching the serialized form.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Cancel => "cancel",
            Self::Yes => "yes",
            Self::No => "no",
            Self::Retry => "retry",
            Self::Abort => "abort",
            Self::Ignore => "ignore",
            Self::Dismissed => "dismissed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One generated button of a message box.
pub struct ButtonSpec {
    /// Button caption.
    pub label: &'static str,
    /// Result reported when the button is clicked.
    pub result: MessageBoxResult,
    /// Whether the button is the set's primary action.
    pub primary: bool,
}

const fn button(label: &'static str, result: MessageBoxResult, primary: bool) -> ButtonSpec {
    ButtonSpec {
        label,
        result,
        primary,
    }
}

const OK_BUTTONS: [ButtonSpec; 1] = [button("OK", MessageBoxResult::Ok, true)];
const OK_CANCEL_BUTTONS: [ButtonSpec; 2] = [
    button("OK", MessageBoxResult::Ok, true),
    button("Cancel", MessageBoxResult::Cancel, false),
];
const YES_NO_BUTTONS: [ButtonSpec; 2] = [
    button("Yes", MessageBoxResult::Yes, true),
    button("No", MessageBoxResult::No, false),
];
const YES_NO_CANCEL_BUTTONS: [ButtonSpec; 3] = [
    button("Yes", MessageBoxResult::Yes, true),
    button("No", MessageBoxResult::No, false),
    button("Cancel", MessageBoxResult::Cancel, false),
];
const RETRY_CANCEL_BUTTONS: [ButtonSpec; 2] = [
    button("Retry", MessageBoxResult::Retry, true),
    button("Cancel", MessageBoxResult::Cancel, false),
];
const ABORT_RETRY_IGNORE_BUTTONS: [ButtonSpec; 3] = [
    button("Abort", MessageBoxResult::Abort, false),
    button("Retry", MessageBoxResult::Retry, true),
    button("Ignore", MessageBoxResult::Ignore, false),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Fixed button-set taxonomy of a message box.
pub enum MessageBoxType {
    /// OK.
    #[default]
    Ok,
    /// OK / Cancel.
    OkCancel,
    /// Yes / No.
    YesNo,
    /// Yes / No / Cancel.
    YesNoCancel,
    /// Retry / Cancel.
    RetryCancel,
    /// Abort / Retry / Ignore.
    AbortRetryIgnore,
}

impl MessageBoxType {
    /// Returns the generated buttons in display order.
    pub fn buttons(self) -> &'static [ButtonSpec] {
        match self {
            Self::Ok => &OK_BUTTONS,
            Self::OkCancel => &OK_CANCEL_BUTTONS,
            Self::YesNo => &YES_NO_BUTTONS,
            Self::YesNoCancel => &YES_NO_CANCEL_BUTTONS,
            Self::RetryCancel => &RETRY_CANCEL_BUTTONS,
            Self::AbortRetryIgnore => &ABORT_RETRY_IGNORE_BUTTONS,
        }
    }

    /// Returns whether `result` is produced by one of this set's buttons.
    pub fn offers(self, result: MessageBoxResult) -> bool {
        self.buttons().iter().any(|button| button.result == result)
    }

    /// Returns the primary button's result.
    pub fn primary(self) -> MessageBoxResult {
        self.buttons()
            .iter()
            .find(|button| button.primary)
            .or_else(|| self.buttons().first())
            .map(|button| button.result)
            .unwrap_or(MessageBoxResult::Ok)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Icon shown beside a plain message.
pub enum MessageBoxIcon {
    /// Information glyph.
    Info,
    /// Warning glyph.
    Warning,
    /// Error glyph.
    Error,
    /// Success glyph.
    Success,
    /// Question glyph.
    Question,
    /// No glyph.
    #[default]
    None,
}

impl MessageBoxIcon {
    /// Returns a stable string token, matching the serialized form and the icon CSS class.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
            Self::Question => "question",
            Self::None => "none",
        }
    }

    /// Asset rendered inside the message box body.
    pub const fn asset_path(self) -> &'static str {
        match self {
            Self::Info => "StaticResources/Icons/info.png",
            Self::Warning => "StaticResources/Icons/warning.png",
            Self::Error => "StaticResources/Icons/error.ico",
            Self::Success => "StaticResources/Icons/success.png",
            Self::Question => "StaticResources/Icons/question.png",
            Self::None => "StaticResources/Icons/dialog.png",
        }
    }

    /// Asset used for the dialog's taskbar entry.
    pub const fn taskbar_asset_path(self) -> &'static str {
        match self {
            Self::Warning => "StaticResources/Icons/warning.png",
            Self::Error => "StaticResources/Icons/error.ico",
            Self::Question => "StaticResources/Icons/question.png",
            Self::Info | Self::Success | Self::None => "StaticResources/Icons/info.png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Terminal answer of a message box, delivered to every result listener.
pub struct MessageBoxResponse {
    /// Logical result of the chosen button.
    pub result: MessageBoxResult,
    /// Payload harvested from custom content, `None` for plain dialogs and the close button.
    pub data: Option<Value>,
}

impl MessageBoxResponse {
    /// Creates a response without payload.
    pub fn new(result: MessageBoxResult) -> Self {
        Self { result, data: None }
    }

    /// Creates a response carrying a payload.
    pub fn with_data(result: MessageBoxResult, data: Option<Value>) -> Self {
        Self { result, data }
    }

    /// Response used when the shell tears a dialog down.
    pub fn dismissed() -> Self {
        Self::new(MessageBoxResult::Dismissed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Font family/size/style triple picked in the font dialog.
pub struct FontSelection {
    /// Selected font family.
    pub font_family: String,
    /// Selected size in pixels.
    pub font_size: u32,
    /// Selected style token (`regular`, `bold`, `italic`, `bold italic`).
    pub font_style: String,
}

impl FontSelection {
    /// Extracts the selection from a font dialog response; only an OK answer carries one.
    pub fn from_response(response: &MessageBoxResponse) -> Option<Self> {
        if response.result != MessageBoxResult::Ok {
            return None;
        }
        let data = response.data.clone()?;
        serde_json::from_value(data).ok()
    }
}
