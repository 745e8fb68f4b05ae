//! Markup for raw table cells.
//!
//! Bootstrap label and button snippets rendered from askama templates, which
//! escape every interpolated value.

use askama::Template;

#[derive(Template)]
#[template(source = r#"<span class="label {{ class }}">{{ title }}</span>"#, ext = "html")]
struct LabelTemplate<'a> {
    title: &'a str,
    class: &'a str,
}

#[derive(Template)]
#[template(
    source = r#"<a href="{{ url }}" class="btn btn-xs btn-outline{% if let Some(class) = class %} {{ class }}{% endif %}">{% if let Some(icon) = icon %}<i class="{{ icon }}"></i> {% endif %}{{ title }}</a>"#,
    ext = "html"
)]
struct ButtonTemplate<'a> {
    url: &'a str,
    title: &'a str,
    icon: Option<&'a str>,
    class: Option<&'a str>,
}

/// `<span class="label {class}">{title}</span>`
pub fn label(title: &str, class: &str) -> askama::Result<String> {
    LabelTemplate { title, class }.render()
}

/// Icon and CSS class of a link button.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonOptions<'a> {
    pub icon: Option<&'a str>,
    pub class: Option<&'a str>,
}

/// Small outlined link button.
pub fn button(url: &str, title: &str, options: ButtonOptions<'_>) -> askama::Result<String> {
    ButtonTemplate {
        url,
        title,
        icon: options.icon,
        class: options.class,
    }
    .render()
}

/// Edit button with the pencil icon.
pub fn edit_button(url: &str, title: &str) -> askama::Result<String> {
    button(
        url,
        title,
        ButtonOptions {
            icon: Some("fa fa-pencil-square-o"),
            class: Some("btn-edit"),
        },
    )
}
