use axum::response::Html;
use tera::{Context, Tera};

use crate::AppResult;

pub const DEFAULT_AVATAR: &str = "/static/default-avatar.png";

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// The page templates, baked into the binary. `.html` names are autoescaped.
///
/// `test.html` is written in markdown and converted before Tera sees it, so
/// values filled in at render time are never read as markdown.
pub fn templates() -> tera::Result<Tera> {
    let test_page = markdown_to_html(include_res!(str, "/pages/test.md"));

    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_res!(str, "/pages/base.html")),
        ("login.html", include_res!(str, "/pages/login.html")),
        ("register.html", include_res!(str, "/pages/register.html")),
        ("chat.html", include_res!(str, "/pages/chat.html")),
        ("profile.html", include_res!(str, "/pages/profile.html")),
        ("test.html", test_page.as_str()),
    ])?;
    Ok(tera)
}

pub fn markdown_to_html(markdown: &str) -> String {
    use pulldown_cmark::{Options, Parser};

    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES);

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

pub fn render(tera: &Tera, name: &str, context: &Context) -> AppResult<Html<String>> {
    Ok(Html(tera.render(name, context)?))
}

fn form_page(tera: &Tera, name: &str, error: Option<&str>) -> AppResult<Html<String>> {
    let mut context = Context::new();
    context.insert("error", &error);
    render(tera, name, &context)
}

pub fn login_page(tera: &Tera, error: Option<&str>) -> AppResult<Html<String>> {
    form_page(tera, "login.html", error)
}

pub fn register_page(tera: &Tera, error: Option<&str>) -> AppResult<Html<String>> {
    form_page(tera, "register.html", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_parse() {
        let tera = templates().unwrap();
        let mut names: Vec<_> = tera.get_template_names().collect();
        names.sort();
        assert_eq!(
            names,
            ["base.html", "chat.html", "login.html", "profile.html", "register.html", "test.html"]
        );
    }

    #[test]
    fn form_pages_escape_the_error() {
        let tera = templates().unwrap();
        let page = login_page(&tera, None).unwrap().0;
        assert!(page.contains("<form method=\"post\" action=\"/login\">"));
        assert!(!page.contains("class=\"error\""));

        let page = login_page(&tera, Some("no <way>")).unwrap().0;
        assert!(page.contains("no &lt;way&gt;"));
        assert!(register_page(&tera, Some("taken")).unwrap().0.contains("taken"));
    }

    #[test]
    fn test_page_keeps_the_quiz_markup() {
        let html = markdown_to_html(include_res!(str, "/pages/test.md"));
        assert!(html.contains("<strong>{{ username }}</strong>"));
        assert!(html.contains("<div id=\"options-container\"></div>"));
        assert!(html.contains("<script src=\"/static/test.js\"></script>"));
    }
}
