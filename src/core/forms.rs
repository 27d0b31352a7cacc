// src/core/forms.rs

// The service is a classic stateful form app: every POST has to carry the
// form's hidden fields, so we read the form back off the page and
// round-trip its defaults with our overrides applied.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::SessionError;

static FORM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").unwrap());
static INPUT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("input").unwrap());
static TEXTAREA: LazyLock<Selector> = LazyLock::new(|| Selector::parse("textarea").unwrap());
static SELECT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("select").unwrap());
static OPTION: LazyLock<Selector> = LazyLock::new(|| Selector::parse("option").unwrap());

/// A form lifted off a page: its action plus default field values.
#[derive(Debug, Clone)]
pub struct Form {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

/// Find the form whose `action` attribute is exactly `action`.
/// The service uses bare action names ("doLogin", "doReverseRBS").
pub fn find_by_action(page: &str, action: &str) -> Result<Form, SessionError> {
    let doc = Html::parse_document(page);
    let form = doc
        .select(&FORM)
        .find(|f| f.value().attr("action") == Some(action))
        .ok_or_else(|| SessionError::FormNotFound { action: s!(action) })?;
    Ok(Form {
        action: s!(action),
        fields: default_fields(form),
    })
}

impl Form {
    /// Defaults with caller overrides applied. An override for a field the
    /// form does not render is appended rather than dropped.
    pub fn payload(&self, overrides: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut fields = self.fields.clone();
        for (name, value) in overrides {
            match fields.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = s!(*value),
                None => fields.push((s!(*name), s!(*value))),
            }
        }
        fields
    }
}

fn default_fields(form: ElementRef<'_>) -> Vec<(String, String)> {
    let mut fields = Vec::new();

    for input in form.select(&INPUT) {
        let name = match input.value().attr("name") {
            Some(n) if !n.is_empty() => n,
            _ => continue,
        };
        let input_type = input.value().attr("type").unwrap_or("text").to_ascii_lowercase();

        // Buttons and image inputs are only sent when clicked
        if matches!(input_type.as_str(), "submit" | "button" | "image" | "reset") {
            continue;
        }
        // Radio buttons and checkboxes only participate when checked
        if matches!(input_type.as_str(), "radio" | "checkbox")
            && input.value().attr("checked").is_none()
        {
            continue;
        }

        let value = input.value().attr("value").unwrap_or_default();
        fields.push((s!(name), s!(value)));
    }

    for area in form.select(&TEXTAREA) {
        if let Some(name) = area.value().attr("name").filter(|n| !n.is_empty()) {
            fields.push((s!(name), area.text().collect::<String>()));
        }
    }

    for select in form.select(&SELECT) {
        let Some(name) = select.value().attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        let options: Vec<ElementRef> = select.select(&OPTION).collect();
        let chosen = options
            .iter()
            .find(|o| o.value().attr("selected").is_some())
            .or_else(|| options.first());
        if let Some(option) = chosen {
            let value = option
                .value()
                .attr("value")
                .map(|v| s!(v))
                .unwrap_or_else(|| option.text().collect::<String>().trim().to_string());
            fields.push((s!(name), value));
        }
    }

    fields
}
