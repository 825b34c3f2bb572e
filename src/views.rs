//! Page rendering.
//!
//! Handlers describe a page as a [`View`]: a template name plus a JSON
//! context. A [`Renderer`] turns that into HTML. [`HtmlRenderer`] is the
//! built-in renderer; it lays every template out from the context alone, so
//! the server works without an external template engine.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    validation::escape,
};

/// A template name with the data it is rendered from
#[derive(Debug, Clone)]
pub struct View {
    pub template: &'static str,
    pub context: Map<String, Value>,
}

impl View {
    pub fn new(template: &'static str, title: impl Into<String>) -> Self {
        let mut context = Map::new();
        context.insert("title".to_string(), Value::String(title.into()));
        Self { template, context }
    }

    /// Add a context entry
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.context.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    pub fn title(&self) -> &str {
        self.context.get("title").and_then(Value::as_str).unwrap_or_default()
    }
}

/// What a handler answers with
#[derive(Debug, Clone)]
pub enum Page {
    Render(View),
    Redirect(String),
}

impl From<View> for Page {
    fn from(view: View) -> Self {
        Page::Render(view)
    }
}

pub trait Renderer: Send + Sync {
    fn render(&self, view: &View) -> AppResult<String>;
}

// ---------------------------------------------------------------------------
// Built-in renderer
// ---------------------------------------------------------------------------

enum Input {
    Text,
    TextArea,
    Date,
    /// Single choice among the context array named here
    Select(&'static str),
    /// Multiple choice among the context array named here
    Checkboxes(&'static str),
}

struct Field {
    name: &'static str,
    label: &'static str,
    /// Key of the entity object holding the current value
    value_key: &'static str,
    input: Input,
}

const fn field(name: &'static str, label: &'static str, value_key: &'static str, input: Input) -> Field {
    Field { name, label, value_key, input }
}

const AUTHOR_FIELDS: &[Field] = &[
    field("first_name", "First Name", "first_name", Input::Text),
    field("family_name", "Family Name", "family_name", Input::Text),
    field("date_of_birth", "Date of birth", "date_of_birth_yyyy_mm_dd", Input::Date),
    field("date_of_death", "Date of death", "date_of_death_yyyy_mm_dd", Input::Date),
];

const GENRE_FIELDS: &[Field] = &[field("name", "Genre", "name", Input::Text)];

const BOOK_FIELDS: &[Field] = &[
    field("title", "Title", "title", Input::Text),
    field("author", "Author", "author", Input::Select("authors")),
    field("summary", "Summary", "summary", Input::TextArea),
    field("isbn", "ISBN", "isbn", Input::Text),
    field("genre", "Genre", "genre", Input::Checkboxes("genres")),
];

const BOOK_INSTANCE_FIELDS: &[Field] = &[
    field("book", "Book", "book_id", Input::Select("book_list")),
    field("imprint", "Imprint", "imprint", Input::Text),
    field("due_back", "Date when book available", "due_back_yyyy_mm_dd", Input::Date),
    field("status", "Status", "status", Input::Select("statuses")),
];

/// Per resource: entity key in the context, form fields, the dependents
/// shown on the delete page and whether they block the delete.
struct Resource {
    entity: &'static str,
    fields: &'static [Field],
    dependents: Option<(&'static str, bool)>,
    id_field: &'static str,
}

fn resource(template: &str) -> Option<Resource> {
    let name = template.split('/').next()?;
    let resource = match name {
        "author" => Resource {
            entity: "author",
            fields: AUTHOR_FIELDS,
            dependents: Some(("author_books", true)),
            id_field: "authorid",
        },
        "genre" => Resource {
            entity: "genre",
            fields: GENRE_FIELDS,
            dependents: Some(("genre_books", true)),
            id_field: "genreid",
        },
        "book" => Resource {
            entity: "book",
            fields: BOOK_FIELDS,
            dependents: Some(("book_instances", false)),
            id_field: "bookid",
        },
        "bookinstance" => Resource {
            entity: "bookinstance",
            fields: BOOK_INSTANCE_FIELDS,
            dependents: None,
            id_field: "bookinstanceid",
        },
        _ => return None,
    };
    Some(resource)
}

/// Plain HTML renderer driven by the view context
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, view: &View) -> AppResult<String> {
        let mut body = String::new();
        body.push_str(&format!("<h1>{}</h1>\n", escape(view.title())));
        render_errors(&mut body, view.get("errors"));

        let action = view.template.rsplit('/').next().unwrap_or_default();
        match (resource(view.template), action) {
            (Some(resource), "form") => render_form(&mut body, view, &resource),
            (Some(resource), "delete") => render_delete(&mut body, view, &resource),
            (_, "list" | "detail") | (None, _) => {
                for (key, value) in &view.context {
                    if key != "title" && key != "errors" {
                        render_section(&mut body, key, value);
                    }
                }
            }
            (Some(_), other) => {
                return Err(AppError::Template(format!("Unknown template {}", other)));
            }
        }

        Ok(layout(view.title(), &body))
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n\
         <nav><ul>\n\
         <li><a href=\"/catalog/books\">All books</a></li>\n\
         <li><a href=\"/catalog/authors\">All authors</a></li>\n\
         <li><a href=\"/catalog/genres\">All genres</a></li>\n\
         <li><a href=\"/catalog/bookinstances\">All book-instances</a></li>\n\
         <li><a href=\"/catalog/authors/create\">Create new author</a></li>\n\
         <li><a href=\"/catalog/genres/create\">Create new genre</a></li>\n\
         <li><a href=\"/catalog/books/create\">Create new book</a></li>\n\
         <li><a href=\"/catalog/bookinstances/create\">Create new book instance (copy)</a></li>\n\
         </ul></nav>\n<main>\n{}</main>\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn render_errors(out: &mut String, errors: Option<&Value>) {
    let Some(Value::Array(errors)) = errors else {
        return;
    };
    if errors.is_empty() {
        return;
    }
    out.push_str("<ul class=\"errors\">\n");
    for error in errors {
        let message = error.get("message").and_then(Value::as_str).unwrap_or_default();
        out.push_str(&format!("<li>{}</li>\n", escape(message)));
    }
    out.push_str("</ul>\n");
}

/// Text shown for a record: its name, title or imprint
fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(obj) => ["name", "title", "imprint"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_default(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn link_or_text(value: &Value) -> String {
    let text = escape(&label(value));
    match value.get("url").and_then(Value::as_str) {
        Some(url) => format!("<a href=\"{}\">{}</a>", escape(url), text),
        None => text,
    }
}

/// Referenced records and short facts shown next to a list entry,
/// e.g. ` (Herbert, Frank)` for a book
fn summary(item: &Value) -> String {
    let Value::Object(obj) = item else {
        return String::new();
    };
    let parts: Vec<String> = obj
        .iter()
        .filter_map(|(key, value)| match value {
            Value::Object(_) => Some(link_or_text(value)),
            Value::String(s) if SUMMARY_FIELDS.contains(&key.as_str()) && !s.is_empty() => Some(escape(s)),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

const SUMMARY_FIELDS: &[&str] = &["life_span", "status", "due_back_formatted"];

fn render_section(out: &mut String, key: &str, value: &Value) {
    out.push_str(&format!("<section class=\"{}\">\n", escape(key)));
    render_value(out, value);
    out.push_str("</section>\n");
}

fn render_value(out: &mut String, value: &Value) {
    match value {
        Value::Array(items) if items.is_empty() => out.push_str("<p>None.</p>\n"),
        Value::Array(items) => {
            out.push_str("<ul>\n");
            for item in items {
                out.push_str(&format!("<li>{}{}</li>\n", link_or_text(item), summary(item)));
            }
            out.push_str("</ul>\n");
        }
        Value::Object(obj) => {
            out.push_str("<dl>\n");
            for (k, v) in obj {
                if k == "url" || k == "id" {
                    continue;
                }
                let shown = match v {
                    Value::Array(items) => items.iter().map(link_or_text).collect::<Vec<_>>().join(", "),
                    Value::Object(_) => link_or_text(v),
                    Value::Null => continue,
                    other => escape(&label(other)),
                };
                out.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", escape(k), shown));
            }
            out.push_str("</dl>\n");
        }
        other => out.push_str(&format!("<p>{}</p>\n", escape(&label(other)))),
    }
}

fn option_value(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        other => other.get("id").map(label).unwrap_or_default(),
    }
}

fn render_form(out: &mut String, view: &View, resource: &Resource) {
    let entity = view.get(resource.entity);

    out.push_str("<form method=\"POST\">\n");
    for field in resource.fields {
        out.push_str(&format!(
            "<div class=\"form-group\">\n<label for=\"{}\">{}:</label>\n",
            field.name, field.label
        ));
        let current = entity.and_then(|e| e.get(field.value_key));
        let value = current.map(label).unwrap_or_default();
        match field.input {
            Input::Text => out.push_str(&format!(
                "<input id=\"{0}\" type=\"text\" name=\"{0}\" required value=\"{1}\">\n",
                field.name,
                escape(&value)
            )),
            Input::Date => out.push_str(&format!(
                "<input id=\"{0}\" type=\"date\" name=\"{0}\" value=\"{1}\">\n",
                field.name,
                escape(&value)
            )),
            Input::TextArea => out.push_str(&format!(
                "<textarea id=\"{0}\" name=\"{0}\" required>{1}</textarea>\n",
                field.name,
                escape(&value)
            )),
            Input::Select(options) => {
                let selected = view
                    .get(&format!("selected_{}", field.name))
                    .map(label)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(value);
                out.push_str(&format!("<select id=\"{0}\" name=\"{0}\" required>\n", field.name));
                for item in view.get(options).and_then(Value::as_array).into_iter().flatten() {
                    let option = option_value(item);
                    let marker = if option == selected { " selected" } else { "" };
                    out.push_str(&format!(
                        "<option value=\"{}\"{}>{}</option>\n",
                        escape(&option),
                        marker,
                        escape(&label(item))
                    ));
                }
                out.push_str("</select>\n");
            }
            Input::Checkboxes(options) => {
                let checked: Vec<String> = current
                    .and_then(Value::as_array)
                    .map(|ids| ids.iter().map(label).collect())
                    .unwrap_or_default();
                for item in view.get(options).and_then(Value::as_array).into_iter().flatten() {
                    let option = option_value(item);
                    let marker = if checked.contains(&option) { " checked" } else { "" };
                    out.push_str(&format!(
                        "<input type=\"checkbox\" name=\"{}\" value=\"{}\"{}> {}\n",
                        field.name,
                        escape(&option),
                        marker,
                        escape(&label(item))
                    ));
                }
            }
        }
        out.push_str("</div>\n");
    }
    out.push_str("<button type=\"submit\">Submit</button>\n</form>\n");
}

fn render_delete(out: &mut String, view: &View, resource: &Resource) {
    let entity = view.get(resource.entity).cloned().unwrap_or(Value::Null);
    render_section(out, resource.entity, &entity);

    let mut blocked = false;
    if let Some((key, guards)) = resource.dependents {
        let dependents = view.get(key).cloned().unwrap_or(Value::Array(Vec::new()));
        let count = dependents.as_array().map(Vec::len).unwrap_or_default();
        blocked = guards && count > 0;
        if blocked {
            out.push_str(&format!(
                "<p><strong>Delete the following before attempting to delete this {}.</strong></p>\n",
                resource.entity
            ));
        }
        render_section(out, key, &dependents);
    }

    if !blocked {
        let id = entity.get("id").map(label).unwrap_or_default();
        out.push_str(&format!(
            "<p>Do you really want to delete this {}?</p>\n<form method=\"POST\">\n\
             <input type=\"hidden\" name=\"{}\" value=\"{}\">\n\
             <button type=\"submit\">Delete</button>\n</form>\n",
            resource.entity,
            resource.id_field,
            escape(&id)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_view_builder() {
        let view = View::new("genre/list", "Genre List").with("genre_list", vec!["Fantasy"]);
        assert_eq!(view.title(), "Genre List");
        assert_eq!(view.get("genre_list"), Some(&json!(["Fantasy"])));
    }

    #[test]
    fn test_list_renders_links() {
        let view = View::new("genre/list", "Genre List").with(
            "genre_list",
            json!([{ "id": "1", "name": "Fantasy", "url": "/catalog/genres/1" }]),
        );
        let html = HtmlRenderer.render(&view).unwrap();
        assert!(html.contains("<a href=\"&#x2F;catalog&#x2F;genres&#x2F;1\">Fantasy</a>"));
    }

    #[test]
    fn test_form_renders_errors_and_values() {
        let view = View::new("genre/form", "Create Genre")
            .with("genre", json!({ "name": "<b>" }))
            .with("errors", json!([{ "field": "name", "message": "Too short" }]));
        let html = HtmlRenderer.render(&view).unwrap();
        assert!(html.contains("<li>Too short</li>"));
        assert!(html.contains("value=\"&lt;b&gt;\""));
    }

    #[test]
    fn test_select_marks_selected_option() {
        let view = View::new("bookinstance/form", "Create BookInstance")
            .with("book_list", json!([{ "id": "a", "title": "Dune" }, { "id": "b", "title": "Emma" }]))
            .with("statuses", json!(["Maintenance", "Available"]))
            .with("selected_book", "b");
        let html = HtmlRenderer.render(&view).unwrap();
        assert!(html.contains("<option value=\"b\" selected>Emma</option>"));
        assert!(html.contains("<option value=\"a\">Dune</option>"));
    }

    #[test]
    fn test_blocked_delete_has_no_button() {
        let view = View::new("author/delete", "Delete Author")
            .with("author", json!({ "id": "x", "name": "Asimov, Isaac" }))
            .with("author_books", json!([{ "title": "Foundation", "url": "/catalog/books/1" }]));
        let html = HtmlRenderer.render(&view).unwrap();
        assert!(html.contains("Foundation"));
        assert!(!html.contains("name=\"authorid\""));

        let view = View::new("author/delete", "Delete Author")
            .with("author", json!({ "id": "x", "name": "Asimov, Isaac" }))
            .with("author_books", json!([]));
        let html = HtmlRenderer.render(&view).unwrap();
        assert!(html.contains("name=\"authorid\" value=\"x\""));
    }
}
