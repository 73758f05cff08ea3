use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use tracing::{debug, info};

use crate::contact::{invalid_person_object, Contact, ContactId, ContactPayload};
use crate::engine::ContactsEngine;
use crate::error::{PhonebookError, Result};

/// `GET /api/persons`
pub(crate) async fn list_contacts<E: ContactsEngine>(
    State(engine): State<E>,
) -> Result<Json<Vec<Contact>>> {
    Ok(Json(engine.list()?))
}

/// `GET /api/persons/:id`
pub(crate) async fn get_contact<E: ContactsEngine>(
    State(engine): State<E>,
    Path(id): Path<String>,
) -> Result<Json<Contact>> {
    let id: ContactId = id.parse()?;
    engine
        .get(id)?
        .map(Json)
        .ok_or_else(|| PhonebookError::NotFound(id.to_string()))
}

/// `POST /api/persons`
///
/// Checks run in this order: both fields present, name not taken, then the format rules. The
/// engine repeats the name check atomically when inserting.
pub(crate) async fn create_contact<E: ContactsEngine>(
    State(engine): State<E>,
    payload: std::result::Result<Json<ContactPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>)> {
    let payload = read_payload(payload)?;
    debug!(?payload, "POST /api/persons");

    let contact = engine.add(payload.require_fields()?)?;
    info!(id = %contact.id, name = %contact.name, "created contact");
    Ok((StatusCode::CREATED, Json(contact)))
}

/// `PUT /api/persons/:id`
pub(crate) async fn update_contact<E: ContactsEngine>(
    State(engine): State<E>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Json<Contact>> {
    let id: ContactId = id.parse()?;
    let payload = read_payload(payload)?;
    debug!(%id, ?payload, "PUT /api/persons");

    let fields = payload.require_fields()?;
    fields.validate()?;

    match engine.update(id, fields)? {
        Some(contact) => {
            info!(%id, name = %contact.name, "updated contact");
            Ok(Json(contact))
        }
        None => Err(PhonebookError::NotFound(id.to_string())),
    }
}

/// `DELETE /api/persons/:id`, answers 204 whether or not the contact existed
pub(crate) async fn delete_contact<E: ContactsEngine>(
    State(engine): State<E>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id: ContactId = id.parse()?;
    match engine.remove(id)? {
        Some(old) => info!(%id, name = %old.name, "deleted contact"),
        None => debug!(%id, "delete of absent contact"),
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /info`
pub(crate) async fn info_page<E: ContactsEngine>(State(engine): State<E>) -> Result<Html<String>> {
    let count = engine.count()?;
    Ok(Html(render_info_page(count, &Local::now())))
}

/// fallback for every unmatched route
pub(crate) async fn unknown_endpoint() -> PhonebookError {
    PhonebookError::UnknownRoute
}

fn read_payload(
    payload: std::result::Result<Json<ContactPayload>, JsonRejection>,
) -> Result<ContactPayload> {
    payload.map(|Json(payload)| payload).map_err(|rejection| {
        debug!(%rejection, "unusable person body");
        invalid_person_object()
    })
}

/// Renders the HTML fragment of the info page: the number of stored contacts followed by the
/// time the page was rendered.
pub fn render_info_page<Tz>(count: usize, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let summary = match count {
        0 => "Phonebook has no records".to_string(),
        1 => "Phonebook has info for 1 person".to_string(),
        n => format!("Phonebook has info for {n} people"),
    };
    format!(
        "<div>{}</div><div>{}</div>",
        summary,
        now.format("%a %b %d %Y %H:%M:%S GMT%z")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn info_page_phrasing_follows_the_count() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert!(render_info_page(0, &now).contains("Phonebook has no records"));
        assert!(render_info_page(1, &now).contains("Phonebook has info for 1 person"));
        assert!(render_info_page(2, &now).contains("Phonebook has info for 2 people"));
    }

    #[test]
    fn info_page_carries_the_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert!(render_info_page(5, &now).contains("<div>Fri Mar 01 2024 12:30:00 GMT+0000</div>"));
    }
}
