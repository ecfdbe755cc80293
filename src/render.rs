//! View rendering.
//!
//! A [`RenderEngine`] turns template text plus response data into markup.
//! The built-in [`PlaceholderRenderer`] only substitutes `{{key}}`
//! placeholders; applications plug a real engine in through
//! [`Spa::set_renderer`](crate::Spa::set_renderer). Any closure of the form
//! `Fn(&str, &Map<String, Value>) -> Option<String>` is an engine.
//!
//! Rendered views are wrapped in `<div id="spa__wrap">` before they reach the
//! container.

use crate::error::SpaError;
use serde_json::{Map, Value};

/// Template rendered when no route matches or the controller found nothing.
pub const NOT_FOUND_TEMPLATE: &str = "404";

/// Markup of the not-found template when the host defines none.
pub const DEFAULT_NOT_FOUND_MARKUP: &str = "<h1>404 Page not found</h1>";

/// Id of the element every rendered view is wrapped in.
pub const VIEW_WRAPPER_ID: &str = "spa__wrap";

/// Template engine.
pub trait RenderEngine {
    /// Render `template` with `data`. `None` or an empty string is a failure.
    fn render(&self, template: &str, data: &Map<String, Value>) -> Option<String>;
}

impl<F> RenderEngine for F
where
    F: Fn(&str, &Map<String, Value>) -> Option<String>,
{
    fn render(&self, template: &str, data: &Map<String, Value>) -> Option<String> {
        self(template, data)
    }
}

/// Replaces every `{{key}}` with the value of `key`.
///
/// Strings are inserted as is, other values in their JSON form. Unknown
/// placeholders are left untouched.
///
/// ```
/// use spa_navigator::render::{PlaceholderRenderer, RenderEngine};
/// use serde_json::{json, Map};
///
/// let mut data = Map::new();
/// data.insert("title".into(), json!("Hi"));
/// data.insert("count".into(), json!(3));
///
/// let html = PlaceholderRenderer.render("<h1>{{title}}</h1>{{count}}", &data);
/// assert_eq!(html.as_deref(), Some("<h1>Hi</h1>3"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl RenderEngine for PlaceholderRenderer {
    fn render(&self, template: &str, data: &Map<String, Value>) -> Option<String> {
        let mut out = template.to_string();
        for (key, value) in data {
            let placeholder = format!("{{{{{key}}}}}");
            let replacement = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            out = out.replace(&placeholder, &replacement);
        }
        Some(out)
    }
}

/// Wrap rendered markup in the view wrapper element.
pub fn wrap_view(html: &str) -> String {
    format!("<div id=\"{VIEW_WRAPPER_ID}\">{html}</div>")
}

/// Render a named template into a wrapped view.
///
/// A missing template and an empty render are both errors.
pub fn render_view(
    engine: &dyn RenderEngine,
    name: &str,
    template: Option<&str>,
    data: &Map<String, Value>,
) -> Result<String, SpaError> {
    let template = template.ok_or_else(|| SpaError::TemplateNotFound {
        name: name.to_string(),
    })?;
    match engine.render(template, data) {
        Some(html) if !html.is_empty() => Ok(wrap_view(&html)),
        _ => Err(SpaError::TemplateRender {
            name: name.to_string(),
        }),
    }
}
