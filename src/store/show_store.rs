use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::error::StoreError;
use crate::models::search_models::SearchResults;
use crate::models::show_models::{NewShow, Show, ShowForm, ShowListing};
use crate::schema::{artists, shows, venues};

pub fn list_shows(conn: &mut SqliteConnection) -> Result<Vec<ShowListing>, StoreError> {
    let rows = joined_shows(conn, None)?;
    Ok(rows)
}

/// The term matches when it occurs in either the linked artist's or the
/// linked venue's name.
pub fn search_shows(
    conn: &mut SqliteConnection,
    term: &str,
) -> Result<SearchResults<ShowListing>, StoreError> {
    let data = joined_shows(conn, Some(term))?;
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

/// Both endpoints are resolved strictly by id; an absent id fails without
/// creating anything.
pub fn create_show(conn: &mut SqliteConnection, form: &ShowForm) -> Result<Show, StoreError> {
    let artist: Option<i32> = artists::table
        .find(form.artist_id)
        .select(artists::id)
        .first(conn)
        .optional()?;
    if artist.is_none() {
        return Err(StoreError::NotFound("Artist"));
    }

    let venue: Option<i32> = venues::table
        .find(form.venue_id)
        .select(venues::id)
        .first(conn)
        .optional()?;
    if venue.is_none() {
        return Err(StoreError::NotFound("Venue"));
    }

    let show = diesel::insert_into(shows::table)
        .values(NewShow {
            start_time: form.start_time,
            artist_id: form.artist_id,
            venue_id: form.venue_id,
        })
        .returning(Show::as_returning())
        .get_result(conn)?;
    Ok(show)
}

fn joined_shows(
    conn: &mut SqliteConnection,
    term: Option<&str>,
) -> Result<Vec<ShowListing>, StoreError> {
    let mut query = shows::table
        .inner_join(artists::table)
        .inner_join(venues::table)
        .select((
            shows::start_time,
            artists::id,
            artists::name,
            artists::image_link,
            venues::id,
            venues::name,
        ))
        .into_boxed();

    if let Some(term) = term {
        let pattern = format!("%{}%", term);
        query = query.filter(
            artists::name
                .like(pattern.clone())
                .or(venues::name.like(pattern)),
        );
    }

    let rows: Vec<(NaiveDateTime, i32, String, Option<String>, i32, String)> = query
        .order(shows::start_time.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(
            |(start_time, artist_id, artist_name, artist_image_link, venue_id, venue_name)| {
                ShowListing {
                    venue_id,
                    venue_name,
                    artist_id,
                    artist_name,
                    artist_image_link,
                    start_time,
                }
            },
        )
        .collect())
}
