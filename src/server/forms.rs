//! Server-rendered HTML pages over the same registry the JSON API uses.
//!
//! Distances are shown rounded to two decimals; the registry itself never
//! rounds.

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::geo::format_coords;
use crate::school::{CoordinateValue, RankedSchool, School, SchoolDraft};

use super::handlers::{lock_registry, ApiError, ProximityQuery};
use super::state::AppState;

type Page = (StatusCode, Html<String>);

/// Form fields arrive as text; blanks count as missing.
#[derive(Debug, Default, Deserialize)]
pub struct SchoolForm {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl From<&SchoolForm> for SchoolDraft {
    fn from(f: &SchoolForm) -> Self {
        SchoolDraft {
            name: f.name.clone(),
            address: f.address.clone(),
            latitude: f.latitude.clone().map(CoordinateValue::Text),
            longitude: f.longitude.clone().map(CoordinateValue::Text),
        }
    }
}

// ─── GET /schools ────────────────────────────────────────────────

pub async fn search_page(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ProximityQuery>, QueryRejection>,
) -> Page {
    let params = match params {
        Ok(Query(p)) => p,
        Err(e) => return search_error(&ProximityQuery::default(), &e.body_text()),
    };

    // First visit: just the form.
    if params.latitude.is_none() && params.longitude.is_none() {
        return (StatusCode::OK, Html(page("Find schools", &search_form(&params, None))));
    }

    let origin = match params.coordinates() {
        Ok(c) => c,
        Err(e) => return search_error(&params, &e.to_string()),
    };

    let rows = match lock_registry(&state) {
        Ok(registry) => registry.list_by_proximity(origin),
        Err(ApiError(status, msg)) => return error_page(status, &msg),
    };

    tracing::info!(
        latitude = origin.latitude(),
        longitude = origin.longitude(),
        count = rows.len(),
        "GET /schools"
    );

    let mut body = search_form(&params, None);
    let _ = writeln!(
        body,
        "<h2>Schools near {}</h2>",
        escape(&format_coords(origin.latitude(), origin.longitude()))
    );
    body.push_str(&results_table(&rows));
    (StatusCode::OK, Html(page("Find schools", &body)))
}

fn search_error(params: &ProximityQuery, msg: &str) -> Page {
    tracing::warn!("rejected search: {}", msg);
    (
        StatusCode::BAD_REQUEST,
        Html(page("Find schools", &search_form(params, Some(msg)))),
    )
}

fn search_form(params: &ProximityQuery, error: Option<&str>) -> String {
    let mut out = String::from("<h1>Find schools</h1>\n");
    if let Some(msg) = error {
        let _ = writeln!(out, r#"<p class="error">{}</p>"#, escape(msg));
    }
    let _ = write!(
        out,
        r#"<form method="get" action="/schools">
  <label>Latitude <input name="latitude" value="{}" inputmode="decimal"></label>
  <label>Longitude <input name="longitude" value="{}" inputmode="decimal"></label>
  <button type="submit">Search</button>
</form>
"#,
        escape(params.latitude.as_deref().unwrap_or("")),
        escape(params.longitude.as_deref().unwrap_or("")),
    );
    out
}

fn results_table(rows: &[RankedSchool]) -> String {
    if rows.is_empty() {
        return "<p>No schools registered yet.</p>\n".to_string();
    }
    let mut out = String::from(
        "<table>\n<tr><th>#</th><th>Name</th><th>Address</th><th>Distance</th></tr>\n",
    );
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="num">{:.2} km</td></tr>"#,
            i + 1,
            escape(&row.school.name),
            escape(&row.school.address),
            row.distance,
        );
    }
    out.push_str("</table>\n");
    out
}

// ─── GET /schools/new ────────────────────────────────────────────

pub async fn new_school_page() -> Html<String> {
    Html(page("Add a school", &school_form(&SchoolForm::default(), None)))
}

// ─── POST /schools ───────────────────────────────────────────────

pub async fn create_school(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SchoolForm>, FormRejection>,
) -> Page {
    let form = match form {
        Ok(Form(f)) => f,
        Err(e) => return form_error(&SchoolForm::default(), &e.body_text()),
    };

    let draft = SchoolDraft::from(&form);

    let result = match lock_registry(&state) {
        Ok(mut registry) => registry.register(&draft),
        Err(ApiError(status, msg)) => return error_page(status, &msg),
    };

    match result {
        Ok(school) => {
            tracing::info!(id = school.id, name = %school.name, "POST /schools");
            (StatusCode::CREATED, Html(page("School added", &created_notice(&school))))
        }
        Err(RegistryError::Validation(e)) => form_error(&form, &e.to_string()),
        Err(e) => {
            tracing::error!("registration failed: {}", e);
            error_page(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn form_error(form: &SchoolForm, msg: &str) -> Page {
    tracing::warn!("rejected registration: {}", msg);
    (
        StatusCode::BAD_REQUEST,
        Html(page("Add a school", &school_form(form, Some(msg)))),
    )
}

fn school_form(form: &SchoolForm, error: Option<&str>) -> String {
    let field = |v: &Option<String>| escape(v.as_deref().unwrap_or(""));
    let mut out = String::from("<h1>Add a school</h1>\n");
    if let Some(msg) = error {
        let _ = writeln!(out, r#"<p class="error">{}</p>"#, escape(msg));
    }
    let _ = write!(
        out,
        r#"<form method="post" action="/schools">
  <label>Name <input name="name" value="{}"></label>
  <label>Address <input name="address" value="{}"></label>
  <label>Latitude <input name="latitude" value="{}" inputmode="decimal"></label>
  <label>Longitude <input name="longitude" value="{}" inputmode="decimal"></label>
  <button type="submit">Add school</button>
</form>
"#,
        field(&form.name),
        field(&form.address),
        field(&form.latitude),
        field(&form.longitude),
    );
    out
}

fn created_notice(school: &School) -> String {
    format!(
        r#"<h1>School added</h1>
<p class="notice">{} was registered with id {}.</p>
<p>{}<br>{}</p>
<ul class="actions"><li><a href="/schools/new">Add another</a></li><li><a href="/schools?latitude={}&amp;longitude={}">Schools near it</a></li></ul>
"#,
        escape(&school.name),
        school.id,
        escape(&school.address),
        escape(&format_coords(school.latitude, school.longitude)),
        school.latitude,
        school.longitude,
    )
}

// ─── Shared ──────────────────────────────────────────────────────

fn error_page(status: StatusCode, msg: &str) -> Page {
    let body = format!("<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n", escape(msg));
    (status, Html(page("Error", &body)))
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{} | School Locator</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <header><a href="/" class="brand">School Locator</a></header>
  <main>
{}  </main>
</body>
</html>
"#,
        escape(title),
        body
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
