use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::error::StoreError;
use crate::models::artist_models::{
    Artist, ArtistDetail, ArtistForm, ArtistPrefill, ArtistShow, ArtistSummary, NewArtist,
};
use crate::models::genre_models::NewArtistGenre;
use crate::models::search_models::SearchResults;
use crate::schema::{artist_genres, artists, cities, genres, shows, states, venues};
use crate::store::resolver;

pub fn list_artists(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> Result<Vec<ArtistSummary>, StoreError> {
    let artist_rows: Vec<Artist> = artists::table
        .order(artists::name.asc())
        .select(Artist::as_select())
        .load(conn)?;

    summarize(conn, artist_rows, now)
}

/// Case-insensitive substring match on the artist name. An empty term
/// matches every artist.
pub fn search_artists(
    conn: &mut SqliteConnection,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults<ArtistSummary>, StoreError> {
    let artist_rows: Vec<Artist> = artists::table
        .filter(artists::name.like(format!("%{}%", term)))
        .order(artists::name.asc())
        .select(Artist::as_select())
        .load(conn)?;

    let data = summarize(conn, artist_rows, now)?;
    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

pub fn get_artist(
    conn: &mut SqliteConnection,
    artist_id: i32,
    now: NaiveDateTime,
) -> Result<ArtistDetail, StoreError> {
    let artist = find_artist(conn, artist_id)?;
    let (city_name, state_name) = city_and_state(conn, artist.city_id)?;
    let genre_names = genre_names(conn, artist.id)?;
    let (past, upcoming) = shows_partitioned(conn, artist.id, now)?;

    Ok(ArtistDetail {
        id: artist.id,
        name: artist.name,
        phone: artist.phone,
        image_link: artist.image_link,
        facebook_link: artist.facebook_link,
        website: artist.website,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
        city: city_name,
        state: state_name,
        genres: genre_names,
        past_shows_count: past.len(),
        upcoming_shows_count: upcoming.len(),
        past_shows: past,
        upcoming_shows: upcoming,
    })
}

pub fn artist_prefill(
    conn: &mut SqliteConnection,
    artist_id: i32,
) -> Result<ArtistPrefill, StoreError> {
    let artist = find_artist(conn, artist_id)?;
    let (city_name, state_name) = city_and_state(conn, artist.city_id)?;
    let genre_names = genre_names(conn, artist.id)?;

    Ok(ArtistPrefill {
        id: artist.id,
        name: artist.name,
        city: city_name,
        state: state_name,
        genres: genre_names,
        phone: artist.phone,
        image_link: artist.image_link,
        facebook_link: artist.facebook_link,
        website_link: artist.website,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
    })
}

/// Create-or-replace keyed by artist name: submitting an existing name
/// replaces that record's fields instead of minting a second row.
pub fn create_artist(conn: &mut SqliteConnection, form: &ArtistForm) -> Result<Artist, StoreError> {
    let state = resolver::state_by_name(conn, form.state.trim())?;
    let city = resolver::city_by_name(conn, form.city.trim(), state.id)?;
    let values = artist_values(form, city.id);

    let existing: Option<Artist> = artists::table
        .filter(artists::name.eq(&form.name))
        .select(Artist::as_select())
        .first(conn)
        .optional()?;

    let artist: Artist = match existing {
        Some(found) => diesel::update(artists::table.find(found.id))
            .set(&values)
            .returning(Artist::as_returning())
            .get_result(conn)?,
        None => diesel::insert_into(artists::table)
            .values(&values)
            .returning(Artist::as_returning())
            .get_result(conn)?,
    };

    set_genres(conn, artist.id, &form.genres)?;
    Ok(artist)
}

/// Update strictly by id; renaming mutates the existing row. Only the
/// dependent entities (state, city, genres) go through get-or-create.
pub fn update_artist(
    conn: &mut SqliteConnection,
    artist_id: i32,
    form: &ArtistForm,
) -> Result<Artist, StoreError> {
    find_artist(conn, artist_id)?;

    let state = resolver::state_by_name(conn, form.state.trim())?;
    let city = resolver::city_by_name(conn, form.city.trim(), state.id)?;
    let values = artist_values(form, city.id);

    let artist = diesel::update(artists::table.find(artist_id))
        .set(&values)
        .returning(Artist::as_returning())
        .get_result(conn)?;

    set_genres(conn, artist.id, &form.genres)?;
    Ok(artist)
}

pub fn delete_artist(conn: &mut SqliteConnection, artist_id: i32) -> Result<(), StoreError> {
    let affected = diesel::delete(artists::table.find(artist_id)).execute(conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound("Artist"));
    }
    Ok(())
}

fn find_artist(conn: &mut SqliteConnection, artist_id: i32) -> Result<Artist, StoreError> {
    artists::table
        .find(artist_id)
        .select(Artist::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound("Artist"))
}

fn artist_values(form: &ArtistForm, city_id: i32) -> NewArtist {
    NewArtist {
        name: form.name.clone(),
        phone: form.phone.clone(),
        image_link: form.image_link.clone(),
        facebook_link: form.facebook_link.clone(),
        website: form.website_link.clone(),
        seeking_venue: form.seeking_venue,
        seeking_description: form.seeking_description.clone(),
        city_id,
    }
}

fn summarize(
    conn: &mut SqliteConnection,
    artist_rows: Vec<Artist>,
    now: NaiveDateTime,
) -> Result<Vec<ArtistSummary>, StoreError> {
    let mut summaries = Vec::with_capacity(artist_rows.len());
    for artist in artist_rows {
        summaries.push(ArtistSummary {
            num_upcoming_shows: upcoming_count(conn, artist.id, now)?,
            id: artist.id,
            name: artist.name,
        });
    }
    Ok(summaries)
}

/// Full replacement of the artist's genre set with the resolved list.
fn set_genres(
    conn: &mut SqliteConnection,
    artist_id: i32,
    names: &[String],
) -> Result<(), StoreError> {
    let resolved = resolver::genres_by_name(conn, names)?;

    diesel::delete(artist_genres::table.filter(artist_genres::artist_id.eq(artist_id)))
        .execute(conn)?;

    let links: Vec<NewArtistGenre> = resolved
        .iter()
        .map(|genre| NewArtistGenre {
            artist_id,
            genre_id: genre.id,
        })
        .collect();

    for link in &links {
        diesel::insert_into(artist_genres::table)
            .values(link)
            .on_conflict_do_nothing()
            .execute(conn)?;
    }
    Ok(())
}

fn genre_names(conn: &mut SqliteConnection, artist_id: i32) -> Result<Vec<String>, StoreError> {
    let names = artist_genres::table
        .inner_join(genres::table)
        .filter(artist_genres::artist_id.eq(artist_id))
        .order(genres::name.asc())
        .select(genres::name)
        .load(conn)?;
    Ok(names)
}

fn city_and_state(
    conn: &mut SqliteConnection,
    city_id: i32,
) -> Result<(String, String), StoreError> {
    let row = cities::table
        .inner_join(states::table)
        .filter(cities::id.eq(city_id))
        .select((cities::name, states::name))
        .first(conn)?;
    Ok(row)
}

fn upcoming_count(
    conn: &mut SqliteConnection,
    artist_id: i32,
    now: NaiveDateTime,
) -> Result<i64, StoreError> {
    let count = shows::table
        .filter(shows::artist_id.eq(artist_id))
        .filter(shows::start_time.gt(now))
        .count()
        .get_result(conn)?;
    Ok(count)
}

/// Shows by this artist split around `now`; a show starting exactly at
/// `now` lands in neither partition.
fn shows_partitioned(
    conn: &mut SqliteConnection,
    artist_id: i32,
    now: NaiveDateTime,
) -> Result<(Vec<ArtistShow>, Vec<ArtistShow>), StoreError> {
    let rows: Vec<(NaiveDateTime, i32, String, Option<String>)> = shows::table
        .inner_join(venues::table)
        .filter(shows::artist_id.eq(artist_id))
        .order(shows::start_time.asc())
        .select((
            shows::start_time,
            venues::id,
            venues::name,
            venues::image_link,
        ))
        .load(conn)?;

    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for (start_time, venue_id, venue_name, venue_image_link) in rows {
        let entry = ArtistShow {
            venue_id,
            venue_name,
            venue_image_link,
            start_time,
        };
        if start_time > now {
            upcoming.push(entry);
        } else if start_time < now {
            past.push(entry);
        }
    }
    Ok((past, upcoming))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;
    use chrono::NaiveDate;

    fn artist_form(name: &str) -> ArtistForm {
        ArtistForm {
            name: name.to_owned(),
            city: "San Francisco".to_owned(),
            state: "California".to_owned(),
            phone: Some("326-123-5000".to_owned()),
            genres: vec!["Rock".to_owned()],
            image_link: None,
            facebook_link: None,
            website_link: Some("https://gunsnpetalsband.com".to_owned()),
            seeking_venue: true,
            seeking_description: Some("Looking for shows".to_owned()),
        }
    }

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn create_and_fetch_round_trip() {
        let mut conn = test_conn();

        let artist = create_artist(&mut conn, &artist_form("Guns N Petals")).unwrap();
        let detail = get_artist(&mut conn, artist.id, fixed_now()).unwrap();

        assert_eq!(detail.name, "Guns N Petals");
        assert_eq!(detail.city, "San Francisco");
        assert_eq!(detail.state, "California");
        assert_eq!(detail.genres, vec!["Rock"]);
        assert!(detail.seeking_venue);
    }

    #[test]
    fn artists_in_one_city_share_the_city_row() {
        let mut conn = test_conn();

        let first = create_artist(&mut conn, &artist_form("Guns N Petals")).unwrap();
        let second = create_artist(&mut conn, &artist_form("The Wild Sax Band")).unwrap();

        assert_eq!(first.city_id, second.city_id);

        let city_count: i64 = cities::table.count().get_result(&mut conn).unwrap();
        assert_eq!(city_count, 1);
    }

    #[test]
    fn search_matches_substring_and_reports_count() {
        let mut conn = test_conn();

        create_artist(&mut conn, &artist_form("Guns N Petals")).unwrap();
        create_artist(&mut conn, &artist_form("The Wild Sax Band")).unwrap();

        let results = search_artists(&mut conn, "sax", fixed_now()).unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "The Wild Sax Band");
    }

    #[test]
    fn prefill_flattens_record_into_form_shape() {
        let mut conn = test_conn();

        let artist = create_artist(&mut conn, &artist_form("Guns N Petals")).unwrap();
        let prefill = artist_prefill(&mut conn, artist.id).unwrap();

        assert_eq!(prefill.name, "Guns N Petals");
        assert_eq!(prefill.city, "San Francisco");
        assert_eq!(prefill.state, "California");
        assert_eq!(prefill.genres, vec!["Rock"]);
        assert_eq!(
            prefill.website_link.as_deref(),
            Some("https://gunsnpetalsband.com")
        );
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut conn = test_conn();

        let err = delete_artist(&mut conn, 42).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Artist")));
    }
}
