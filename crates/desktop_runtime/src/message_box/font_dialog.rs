//! Built-in font-selection template: list rows, initial form state, live preview and harvested payload.

use std::collections::BTreeMap;

use desktop_app_contract::FontSelection;
use serde_json::Value;

pub const FAMILY_SELECT_ID: &str = "font-family-select";
pub const STYLE_SELECT_ID: &str = "font-style-select";
pub const SIZE_SELECT_ID: &str = "font-size-select";
pub const PREVIEW_ID: &str = "font-preview";

pub const PREVIEW_SAMPLE: &str = "AaBbYyZz 123";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontStyleOption {
    /// Token reported in the selection (`bold italic`).
    pub value: String,
    /// Caption shown in the list.
    pub label: String,
}

impl FontStyleOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Choices and initial selection of the font dialog.
pub struct FontDialogOptions {
    pub current_font: String,
    pub current_size: u32,
    pub current_style: String,
    pub font_families: Vec<String>,
    pub font_sizes: Vec<u32>,
    pub font_styles: Vec<FontStyleOption>,
}

impl Default for FontDialogOptions {
    fn default() -> Self {
        Self {
            current_font: "Consolas".to_string(),
            current_size: 16,
            current_style: "regular".to_string(),
            font_families: [
                "Consolas",
                "Monaco",
                "Courier New",
                "Arial",
                "Microsoft YaHei",
                "SimSun",
                "SimHei",
                "Times New Roman",
                "Georgia",
                "Verdana",
                "Helvetica",
                "Tahoma",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            font_sizes: vec![8, 9, 10, 11, 12, 14, 16, 18, 20, 22, 24, 26, 28, 36, 48, 72],
            font_styles: vec![
                FontStyleOption::new("regular", "Regular"),
                FontStyleOption::new("bold", "Bold"),
                FontStyleOption::new("italic", "Italic"),
                FontStyleOption::new("bold italic", "Bold Italic"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontChoice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl FontChoice {
    fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One labelled list box of the font dialog.
pub struct FontDialogRow {
    pub label: &'static str,
    /// DOM id of the `<select>`, also its form field name.
    pub select_id: &'static str,
    pub visible_rows: u32,
    pub choices: Vec<FontChoice>,
}

/// Family, style and size lists with the initial options selected.
pub fn font_dialog_rows(options: &FontDialogOptions) -> Vec<FontDialogRow> {
    let families = options
        .font_families
        .iter()
        .map(|family| FontChoice::new(family, family, *family == options.current_font))
        .collect();
    let styles = options
        .font_styles
        .iter()
        .map(|style| {
            FontChoice::new(
                &style.value,
                &style.label,
                style.value == options.current_style,
            )
        })
        .collect();
    let sizes = options
        .font_sizes
        .iter()
        .map(|size| FontChoice::new(size.to_string(), size.to_string(), *size == options.current_size))
        .collect();

    vec![
        FontDialogRow {
            label: "Font:",
            select_id: FAMILY_SELECT_ID,
            visible_rows: 10,
            choices: families,
        },
        FontDialogRow {
            label: "Font style:",
            select_id: STYLE_SELECT_ID,
            visible_rows: 5,
            choices: styles,
        },
        FontDialogRow {
            label: "Size:",
            select_id: SIZE_SELECT_ID,
            visible_rows: 5,
            choices: sizes,
        },
    ]
}

/// Form state matching the initially selected options.
pub fn initial_form(options: &FontDialogOptions) -> BTreeMap<String, String> {
    BTreeMap::from([
        (FAMILY_SELECT_ID.to_string(), options.current_font.clone()),
        (SIZE_SELECT_ID.to_string(), options.current_size.to_string()),
        (STYLE_SELECT_ID.to_string(), options.current_style.clone()),
    ])
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// CSS applied to the preview box for the current selection.
pub struct FontPreview {
    pub font_family: String,
    pub font_size_px: u32,
    pub font_weight: &'static str,
    pub font_style: &'static str,
}

impl FontPreview {
    pub fn new(family: &str, size: u32, style: &str) -> Self {
        let (font_weight, font_style) = match style {
            "bold" => ("bold", "normal"),
            "italic" => ("normal", "italic"),
            "bold italic" => ("bold", "italic"),
            _ => ("normal", "normal"),
        };
        Self {
            font_family: family.to_string(),
            font_size_px: size,
            font_weight,
            font_style,
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "font-family: {}; font-size: {}px; font-weight: {}; font-style: {};",
            self.font_family,
            self.font_size_px,
            self.font_weight,
            self.font_style
        )
    }
}

/// Parses the current selection; `None` when a field is missing or the size is not a number.
pub fn selection_from_form(form: &BTreeMap<String, String>) -> Option<FontSelection> {
    Some(FontSelection {
        font_family: form.get(FAMILY_SELECT_ID)?.clone(),
        font_size: form.get(SIZE_SELECT_ID)?.trim().parse().ok()?,
        font_style: form.get(STYLE_SELECT_ID)?.clone(),
    })
}

pub fn preview_from_form(form: &BTreeMap<String, String>) -> Option<FontPreview> {
    let selection = selection_from_form(form)?;
    Some(FontPreview::new(
        &selection.font_family,
        selection.font_size,
        &selection.font_style,
    ))
}

/// Payload reported with the dialog's answer: `{fontFamily, fontSize, fontStyle}`.
pub fn selection_payload(form: &BTreeMap<String, String>) -> Option<Value> {
    selection_from_form(form).and_then(|selection| serde_json::to_value(selection).ok())
}
