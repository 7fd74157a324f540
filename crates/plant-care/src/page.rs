use crate::pipeline::{DocumentState, Outcome, MISSING_INPUT_MESSAGE};
use crate::locate::NOT_FOUND_MESSAGE;

pub const TITLE: &str = "Plant Care Information";
pub const INSTRUCTIONS: &str = "Enter the name of the plant to retrieve care information from the PDF and get detailed care instructions from the care model.";

const STYLE: &str = "\
body{font-family:sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;color:#1d2b1f}\
.banner{padding:.75rem 1rem;border-radius:.4rem;margin:1rem 0}\
.error{background:#fde2e1;border:1px solid #e0908b}\
.warning{background:#fff4d6;border:1px solid #e3c26b}\
.advice{background:#e6f4e8;border:1px solid #8fc79a;white-space:pre-wrap}\
.status{color:#5b6b5d;font-size:.85rem}\
input[type=text]{width:100%;padding:.4rem;margin:.4rem 0}";

pub struct PageView<'a> {
    pub plant_name: &'a str,
    pub document: &'a DocumentState,
    pub outcome: Option<&'a Outcome>,
}

pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>{TITLE}</title><style>{STYLE}</style></head><body>\
<h1>{TITLE}</h1><p>{INSTRUCTIONS}</p>"
    ));

    match view.document {
        DocumentState::Ready(doc) => {
            html.push_str(&format!(
                "<p class=\"status\">Guide loaded: {} page(s), sha256 {}</p>",
                doc.pages,
                escape_html(&doc.digest[..doc.digest.len().min(12)])
            ));
        }
        DocumentState::Unavailable(message) => {
            html.push_str(&banner("error", message));
        }
    }

    html.push_str(&format!(
        "<form method=\"post\" action=\"/\">\
<label for=\"plant_name\">Enter the plant name:</label>\
<input type=\"text\" id=\"plant_name\" name=\"plant_name\" value=\"{}\">\
<button type=\"submit\">Get Plant Care Information</button></form>",
        escape_html(view.plant_name)
    ));

    if let Some(outcome) = view.outcome {
        html.push_str(&render_outcome(outcome));
    }

    html.push_str(
        "<form method=\"post\" action=\"/refresh\">\
<button type=\"submit\">Reload guide</button></form></body></html>",
    );
    html
}

fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::AdviceReady { plant_name, advice } => format!(
            "<section><h2>Plant Care Instructions: {}</h2><div class=\"banner advice\">{}</div></section>",
            escape_html(plant_name),
            escape_html(advice)
        ),
        Outcome::NotFound => banner("warning", NOT_FOUND_MESSAGE),
        Outcome::MissingInput => banner("warning", MISSING_INPUT_MESSAGE),
        Outcome::AdviceFailed(message) => banner("error", message),
    }
}

fn banner(class: &str, message: &str) -> String {
    format!(
        "<div class=\"banner {class}\" role=\"alert\">{}</div>",
        escape_html(message)
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
