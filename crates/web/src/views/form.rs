use dioxus::prelude::*;

use crate::vm::{CategoryVm, FormPageVm, QuestionVm};

const FONT_AWESOME_CSS: &str =
    "https://maxcdn.bootstrapcdn.com/font-awesome/4.7.0/css/font-awesome.min.css";

const PAGE_STYLE: &str = "
body { font-family: sans-serif; margin: 0 auto; max-width: 60em; padding: 1em; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th { text-align: left; padding-right: 1em; font-weight: normal; }
td { padding: 0.2em 0.4em; white-space: nowrap; }
.question textarea { width: 100%; }
.token { background: #f5f5f5; padding: 0.5em 1em; }
.private-hint { color: #777; font-size: 0.9em; }
";

/// Render the complete feedback page, doctype included.
///
/// dioxus renders the page body; the document shell around it is static.
#[must_use]
pub fn render_form_page(page: FormPageVm) -> String {
    let mut dom = VirtualDom::new_with_props(FormPage, FormPageProps { page });
    dom.rebuild_in_place();
    let body = dioxus_ssr::render(&dom);
    format!(
        "<!DOCTYPE html><html lang=\"cs\"><head><meta charset=\"utf-8\">\
         <title>Zpětná vazba</title>\
         <link rel=\"stylesheet\" href=\"{FONT_AWESOME_CSS}\">\
         <style>{PAGE_STYLE}</style></head><body>{body}</body></html>"
    )
}

#[component]
pub fn FormPage(page: FormPageVm) -> Element {
    rsx! {
        div { class: "page",
            h1 { "Zpětná vazba ke kurzu" }
            TokenNotice { token: page.token.clone(), action: page.action.clone(), saved: page.saved }
            form { method: "post", action: "{page.action}",
                for category in page.categories.iter() {
                    CategoryTable { key: "{category.slug}", category: category.clone() }
                }
                for question in page.questions.iter() {
                    QuestionField { key: "{question.field_name}", question: question.clone() }
                }
                button { r#type: "submit", "Odeslat" }
            }
        }
    }
}

#[component]
fn TokenNotice(token: String, action: String, saved: bool) -> Element {
    rsx! {
        div { class: "token",
            if saved {
                p { "Odpovědi jsou uložené. Můžeš je kdykoli upravit." }
            }
            p {
                "Tvůj kód je "
                strong { "{token}" }
                ". Na adrese "
                a { href: "{action}", "{action}" }
                " se k formuláři můžeš vrátit."
            }
        }
    }
}

#[component]
fn CategoryTable(category: CategoryVm) -> Element {
    rsx! {
        section { class: "category",
            h2 { style: "color: {category.color}",
                i { class: "fa fa-{category.icon}" }
                " {category.question}"
            }
            table {
                for row in category.rows.iter() {
                    tr { key: "{row.field_name}",
                        th { "{row.lesson_title}" }
                        for option in row.options.iter() {
                            td {
                                label {
                                    input {
                                        r#type: "radio",
                                        name: "{row.field_name}",
                                        value: "{option.value}",
                                        checked: option.checked,
                                    }
                                    if option.level == 0 {
                                        span { class: "no-mark", "–" }
                                    }
                                    for _ in 0..option.level {
                                        i { class: "fa fa-{category.icon}", style: "color: {category.color}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionField(question: QuestionVm) -> Element {
    rsx! {
        div { class: "question",
            p {
                label { r#for: "{question.field_name}", "{question.prompt}" }
            }
            textarea {
                id: "{question.field_name}",
                name: "{question.field_name}",
                rows: 4,
                "{question.answer}"
            }
            if question.private {
                p { class: "private-hint", "Tuhle odpověď uvidí jen organizátoři." }
            }
        }
    }
}
