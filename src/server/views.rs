//! HTML rendering for the search page

use crate::retrieval::RankedResult;

/// What the search page should show
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Form only, nothing asked yet
    Idle,
    /// Search ran; `result` may legitimately be empty
    Found {
        question: String,
        result: RankedResult,
    },
    /// Search failed; rendered as an empty result list
    Failed { question: String },
}

impl SearchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SearchOutcome::Failed { .. })
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:42rem;margin:3rem auto;padding:0 1rem}\
form{display:flex;gap:.5rem}input[type=text]{flex:1;padding:.5rem}\
table{width:100%;border-collapse:collapse;margin-top:1.5rem}\
td,th{text-align:left;padding:.4rem;border-bottom:1px solid #ddd}\
.notice{color:#8a6d3b;margin-top:1rem}";

/// Render the full search page
pub fn render_page(outcome: &SearchOutcome) -> String {
    let question = match outcome {
        SearchOutcome::Idle => "",
        SearchOutcome::Found { question, .. } | SearchOutcome::Failed { question } => {
            question.as_str()
        }
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>FAQ search</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<h1>Ask a question</h1>\n");
    html.push_str("<form method=\"post\" action=\"/\">\n");
    html.push_str(&format!(
        "<input type=\"text\" name=\"question\" value=\"{}\" \
         placeholder=\"How do I book a flight?\" autofocus>\n",
        escape_html(question)
    ));
    html.push_str("<button type=\"submit\">Search</button>\n</form>\n");

    match outcome {
        SearchOutcome::Idle => {}
        SearchOutcome::Found { result, .. } => html.push_str(&render_results(result)),
        SearchOutcome::Failed { .. } => {
            html.push_str(&render_results(&RankedResult::default()));
            html.push_str("<p class=\"notice\">Search is temporarily unavailable.</p>\n");
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_results(result: &RankedResult) -> String {
    let mut html = String::from(
        "<table id=\"results\">\n\
         <thead><tr><th>Similar question</th><th>Distance</th></tr></thead>\n\
         <tbody>\n",
    );
    for hit in result.iter() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.4}</td></tr>\n",
            escape_html(&hit.title),
            hit.distance
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
