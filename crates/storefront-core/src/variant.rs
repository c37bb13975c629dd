//! Variant descriptor resolution.
//!
//! Turns the current option controls into the canonical
//! `"Title:value, Title:value"` string used for display and analytics.
//! The descriptor plays no part in cart submission.

use crate::options::{ChoiceInput, OptionControl, OptionKind, OptionValue};

/// Sentinel reported instead of a descriptor while a required control is
/// unsatisfied.
pub const UNSATISFIED: &str = "unsatisfied";

/// Reads the current option state from whatever view holds it.
pub trait OptionStateSource {
    fn option_controls(&self) -> Vec<OptionControl>;
}

impl OptionStateSource for [OptionControl] {
    fn option_controls(&self) -> Vec<OptionControl> {
        self.to_vec()
    }
}

impl OptionStateSource for Vec<OptionControl> {
    fn option_controls(&self) -> Vec<OptionControl> {
        self.clone()
    }
}

/// Outcome of resolving a set of option controls.
///
/// Immutable once produced; every option change yields a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    entries: Vec<String>,
    complete: bool,
}

impl VariantDescriptor {
    fn unsatisfied() -> Self {
        Self {
            entries: Vec::new(),
            complete: false,
        }
    }

    /// Sorted `"title:value"` pairs. Empty when incomplete.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The joined descriptor, or `None` while incomplete.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        self.complete.then(|| self.entries.join(", "))
    }

    /// Value written to the `data-product-variant` attribute: the joined
    /// descriptor, or an empty string while incomplete.
    #[must_use]
    pub fn attribute_value(&self) -> String {
        self.display().unwrap_or_default()
    }
}

impl std::fmt::Display for VariantDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.display() {
            Some(text) => f.write_str(&text),
            None => f.write_str(UNSATISFIED),
        }
    }
}

enum Extracted {
    Entry(String),
    Missing,
    Skipped,
}

/// Resolves `controls` into a [`VariantDescriptor`].
///
/// Controls are visited in encounter order. A required control with no
/// extractable value makes the whole descriptor incomplete. Checkboxes
/// always report `Yes` or `No` and so never block completion. Controls of
/// an unrecognised kind are skipped entirely.
#[must_use]
pub fn resolve(controls: &[OptionControl]) -> VariantDescriptor {
    let mut entries = Vec::with_capacity(controls.len());
    let mut unsatisfied = 0usize;

    for control in controls {
        match extract(control) {
            Extracted::Entry(value) => entries.push(format!("{}:{value}", control.label)),
            Extracted::Missing if control.required => {
                tracing::trace!(control = %control.id, kind = %control.kind, "required option unsatisfied");
                unsatisfied += 1;
            }
            Extracted::Missing | Extracted::Skipped => {}
        }
    }

    if unsatisfied > 0 {
        return VariantDescriptor::unsatisfied();
    }

    entries.sort();
    VariantDescriptor {
        entries,
        complete: true,
    }
}

/// Resolves whatever controls `source` currently reports.
#[must_use]
pub fn resolve_from<S: OptionStateSource + ?Sized>(source: &S) -> VariantDescriptor {
    resolve(&source.option_controls())
}

fn extract(control: &OptionControl) -> Extracted {
    let found = match (&control.kind, &control.value) {
        (OptionKind::Other(_), _) => return Extracted::Skipped,
        (
            OptionKind::File | OptionKind::Text | OptionKind::Number | OptionKind::Textarea,
            OptionValue::Text(text),
        ) => (!text.is_empty()).then(|| text.clone()),
        (OptionKind::Date, OptionValue::Date(parts)) => {
            let all_chosen = !parts.is_empty() && parts.iter().all(|p| p.chosen().is_some());
            all_chosen.then(|| {
                parts
                    .iter()
                    .filter_map(|p| p.chosen())
                    .map(|o| o.value.as_str())
                    .collect::<Vec<_>>()
                    .join("-")
            })
        }
        (OptionKind::SingleSelect, OptionValue::Select(select)) => {
            select.chosen().map(|o| o.text.trim().to_owned())
        }
        (
            OptionKind::RectangleChoice | OptionKind::RadioChoice | OptionKind::ProductList,
            OptionValue::Choices(inputs),
        ) => single_checked(inputs)
            .map(|input| input.label.trim())
            .filter(|label| !label.is_empty())
            .map(str::to_owned),
        (OptionKind::SwatchChoice, OptionValue::Choices(inputs)) => single_checked(inputs)
            .and_then(|input| input.title.as_deref())
            .filter(|title| !title.is_empty())
            .map(str::to_owned),
        (OptionKind::Checkbox, OptionValue::Checkbox(checked)) => {
            Some(if *checked { "Yes" } else { "No" }.to_owned())
        }
        (OptionKind::Checkbox, _) => Some("No".to_owned()),
        _ => None,
    };

    found.map_or(Extracted::Missing, Extracted::Entry)
}

fn single_checked(inputs: &[ChoiceInput]) -> Option<&ChoiceInput> {
    let mut checked = inputs.iter().filter(|input| input.checked);
    match (checked.next(), checked.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

#[cfg(test)]
#[path = "variant_test.rs"]
mod tests;
