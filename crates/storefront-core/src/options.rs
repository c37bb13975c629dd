//! Product option controls as captured from the product form.
//!
//! A control's [`OptionKind`] is fixed when the control is built and alone
//! decides how its [`OptionValue`] is read. The kind strings match the
//! platform's `data-product-attribute` values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The input type of a product option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OptionKind {
    File,
    Text,
    Number,
    Textarea,
    Date,
    SingleSelect,
    RectangleChoice,
    RadioChoice,
    SwatchChoice,
    Checkbox,
    ProductList,
    /// An attribute type this storefront does not know how to read.
    Other(String),
}

impl OptionKind {
    /// Maps a `data-product-attribute` value to its kind.
    #[must_use]
    pub fn from_attribute(attribute: &str) -> Self {
        match attribute {
            "input-file" => Self::File,
            "input-text" => Self::Text,
            "input-number" => Self::Number,
            "textarea" => Self::Textarea,
            "date" => Self::Date,
            "set-select" => Self::SingleSelect,
            "set-rectangle" => Self::RectangleChoice,
            "set-radio" => Self::RadioChoice,
            "swatch" => Self::SwatchChoice,
            "input-checkbox" => Self::Checkbox,
            "product-list" => Self::ProductList,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_attribute(&self) -> &str {
        match self {
            Self::File => "input-file",
            Self::Text => "input-text",
            Self::Number => "input-number",
            Self::Textarea => "textarea",
            Self::Date => "date",
            Self::SingleSelect => "set-select",
            Self::RectangleChoice => "set-rectangle",
            Self::RadioChoice => "set-radio",
            Self::SwatchChoice => "swatch",
            Self::Checkbox => "input-checkbox",
            Self::ProductList => "product-list",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for OptionKind {
    fn from(value: String) -> Self {
        Self::from_attribute(&value)
    }
}

impl From<OptionKind> for String {
    fn from(kind: OptionKind) -> Self {
        kind.as_attribute().to_owned()
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attribute())
    }
}

/// One `<option>` of a select element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    /// Display text of the option.
    pub text: String,
}

/// A select element. Index `0` is always the placeholder prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectState {
    #[serde(default)]
    pub selected_index: usize,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl SelectState {
    /// The chosen option, or `None` while the placeholder is selected.
    #[must_use]
    pub fn chosen(&self) -> Option<&SelectOption> {
        if self.selected_index == 0 {
            return None;
        }
        self.options.get(self.selected_index)
    }
}

/// One radio/rectangle/swatch/product-list input together with its
/// associated label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChoiceInput {
    pub value: String,
    /// Text of the associated `<label>`.
    #[serde(default)]
    pub label: String,
    /// `title` of the swatch element inside the label, when present.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub checked: bool,
}

/// Current state of a control, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionValue {
    #[default]
    Empty,
    /// Field contents of file, text, number and textarea inputs.
    Text(String),
    /// Date sub-selects in display order.
    Date(Vec<SelectState>),
    Select(SelectState),
    Choices(Vec<ChoiceInput>),
    Checkbox(bool),
}

/// One selectable product option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionControl {
    pub id: String,
    pub kind: OptionKind,
    /// Display title, without the trailing `:` or "required" marker.
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub value: OptionValue,
}

impl OptionControl {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: OptionKind,
        label: impl Into<String>,
        required: bool,
        value: OptionValue,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            required,
            value,
        }
    }

    /// Builds a control from the raw text of its form label, e.g.
    /// `"Size: (Required)"`.
    ///
    /// The title is everything before the first `:`; the control is
    /// required when the label mentions "required" in any case.
    #[must_use]
    pub fn from_label_text(
        id: impl Into<String>,
        kind: OptionKind,
        label_text: &str,
        value: OptionValue,
    ) -> Self {
        let title = label_text.split(':').next().unwrap_or_default().trim();
        let required = label_text.to_lowercase().contains("required");
        Self::new(id, kind, title, required, value)
    }
}
