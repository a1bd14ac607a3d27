use std::collections::BTreeMap;

use html_escape::encode_text;

use cohesia_core::{IndexReport, Matrix};

/// Render the index page: one ranked table per metric, defect rows
/// highlighted. A pure function of validated data.
pub fn index_page(report: &IndexReport, params: &BTreeMap<String, String>) -> String {
    let title = title(params, "Cohesion report");
    let mut out = page_head(&title);

    out.push_str(&format!(
        "<p class=\"score\">Overall score: {:.1}/100</p>\n",
        report.score
    ));
    out.push_str("<p class=\"muted\"><a href=\"matrix.html\">Cross-class matrix</a></p>\n");

    for index in &report.metrics {
        out.push_str(&format!(
            "<h2>{} &mdash; {:.1}/100</h2>\n",
            encode_text(&index.metric),
            index.score
        ));
        out.push_str("<table>\n<thead><tr><th>Class</th><th>Value</th><th>Diff</th><th>Defect</th></tr></thead>\n<tbody>\n");
        for entry in &index.entries {
            let row_class = if entry.defect { " class=\"defect\"" } else { "" };
            out.push_str(&format!(
                "<tr{row_class}><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{:+.1}%</td><td>{}</td></tr>\n",
                encode_text(&entry.class),
                entry.value,
                entry.diff,
                if entry.defect { "yes" } else { "no" },
            ));
        }
        out.push_str("</tbody>\n</table>\n");
    }

    out.push_str(PAGE_FOOT);
    out
}

/// Render the matrix page: rows and columns in matrix order, empty cells
/// for absent relations.
pub fn matrix_page(matrix: &Matrix, params: &BTreeMap<String, String>) -> String {
    let title = title(params, "Cross-class matrix");
    let mut out = page_head(&title);

    out.push_str("<p class=\"muted\"><a href=\"index.html\">Back to index</a></p>\n");
    out.push_str("<table>\n<thead><tr><th></th>");
    for column in &matrix.rows {
        out.push_str(&format!("<th>{}</th>", encode_text(column)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for row in &matrix.rows {
        out.push_str(&format!("<tr><th>{}</th>", encode_text(row)));
        for column in &matrix.rows {
            match matrix.weight(row, column) {
                Some(weight) => out.push_str(&format!("<td class=\"num\">{weight}</td>")),
                None => out.push_str("<td></td>"),
            }
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n");
    out.push_str(PAGE_FOOT);
    out
}

fn title(params: &BTreeMap<String, String>, fallback: &str) -> String {
    let text = params.get("title").map(String::as_str).unwrap_or(fallback);
    encode_text(text).into_owned()
}

fn page_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\"/>\n\
         <link rel=\"stylesheet\" href=\"style.css\"/>\n<title>{title}</title>\n</head>\n\
         <body>\n<h1>{title}</h1>\n"
    )
}

const PAGE_FOOT: &str = "</body>\n</html>\n";
