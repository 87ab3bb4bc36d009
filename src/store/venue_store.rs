use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::error::StoreError;
use crate::models::genre_models::NewVenueGenre;
use crate::models::location_models::City;
use crate::models::search_models::SearchResults;
use crate::models::venue_models::{
    NewVenue, Venue, VenueDetail, VenueForm, VenueGroup, VenuePrefill, VenueShow, VenueSummary,
};
use crate::schema::{artists, cities, genres, shows, states, venue_genres, venues};
use crate::store::resolver;

/// All cities (joined to their state) with their venues and each venue's
/// upcoming-show count, for the hierarchical browse page.
pub fn list_venues(
    conn: &mut SqliteConnection,
    now: NaiveDateTime,
) -> Result<Vec<VenueGroup>, StoreError> {
    let city_rows: Vec<(City, String)> = cities::table
        .inner_join(states::table)
        .order((states::name.asc(), cities::name.asc()))
        .select((City::as_select(), states::name))
        .load(conn)?;

    let mut groups = Vec::with_capacity(city_rows.len());
    for (city, state_name) in city_rows {
        let venue_rows: Vec<Venue> = venues::table
            .filter(venues::city_id.eq(city.id))
            .order(venues::name.asc())
            .select(Venue::as_select())
            .load(conn)?;

        let mut summaries = Vec::with_capacity(venue_rows.len());
        for venue in venue_rows {
            summaries.push(VenueSummary {
                num_upcoming_shows: upcoming_count(conn, venue.id, now)?,
                id: venue.id,
                name: venue.name,
            });
        }

        groups.push(VenueGroup {
            city: city.name,
            state: state_name,
            venues: summaries,
        });
    }
    Ok(groups)
}

/// Case-insensitive substring match on the venue name. An empty term
/// matches every venue.
pub fn search_venues(
    conn: &mut SqliteConnection,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResults<VenueSummary>, StoreError> {
    let venue_rows: Vec<Venue> = venues::table
        .filter(venues::name.like(format!("%{}%", term)))
        .order(venues::name.asc())
        .select(Venue::as_select())
        .load(conn)?;

    let mut data = Vec::with_capacity(venue_rows.len());
    for venue in venue_rows {
        data.push(VenueSummary {
            num_upcoming_shows: upcoming_count(conn, venue.id, now)?,
            id: venue.id,
            name: venue.name,
        });
    }

    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

pub fn get_venue(
    conn: &mut SqliteConnection,
    venue_id: i32,
    now: NaiveDateTime,
) -> Result<VenueDetail, StoreError> {
    let venue = find_venue(conn, venue_id)?;
    let (city_name, state_name) = city_and_state(conn, venue.city_id)?;
    let genre_names = genre_names(conn, venue.id)?;
    let (past, upcoming) = shows_partitioned(conn, venue.id, now)?;

    Ok(VenueDetail {
        id: venue.id,
        name: venue.name,
        address: venue.address,
        phone: venue.phone,
        image_link: venue.image_link,
        facebook_link: venue.facebook_link,
        website: venue.website,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
        city: city_name,
        state: state_name,
        genres: genre_names,
        past_shows_count: past.len(),
        upcoming_shows_count: upcoming.len(),
        past_shows: past,
        upcoming_shows: upcoming,
    })
}

pub fn venue_prefill(
    conn: &mut SqliteConnection,
    venue_id: i32,
) -> Result<VenuePrefill, StoreError> {
    let venue = find_venue(conn, venue_id)?;
    let (city_name, state_name) = city_and_state(conn, venue.city_id)?;
    let genre_names = genre_names(conn, venue.id)?;

    Ok(VenuePrefill {
        id: venue.id,
        name: venue.name,
        city: city_name,
        state: state_name,
        genres: genre_names,
        address: venue.address,
        phone: venue.phone,
        image_link: venue.image_link,
        facebook_link: venue.facebook_link,
        website_link: venue.website,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
    })
}

/// Create-or-replace keyed by venue name: submitting an existing name
/// replaces that record's fields instead of minting a second row.
pub fn create_venue(conn: &mut SqliteConnection, form: &VenueForm) -> Result<Venue, StoreError> {
    let state = resolver::state_by_name(conn, form.state.trim())?;
    let city = resolver::city_by_name(conn, form.city.trim(), state.id)?;
    let values = venue_values(form, city.id);

    let existing: Option<Venue> = venues::table
        .filter(venues::name.eq(&form.name))
        .select(Venue::as_select())
        .first(conn)
        .optional()?;

    let venue: Venue = match existing {
        Some(found) => diesel::update(venues::table.find(found.id))
            .set(&values)
            .returning(Venue::as_returning())
            .get_result(conn)?,
        None => diesel::insert_into(venues::table)
            .values(&values)
            .returning(Venue::as_returning())
            .get_result(conn)?,
    };

    set_genres(conn, venue.id, &form.genres)?;
    Ok(venue)
}

/// Update strictly by id; renaming mutates the existing row. Only the
/// dependent entities (state, city, genres) go through get-or-create.
pub fn update_venue(
    conn: &mut SqliteConnection,
    venue_id: i32,
    form: &VenueForm,
) -> Result<Venue, StoreError> {
    find_venue(conn, venue_id)?;

    let state = resolver::state_by_name(conn, form.state.trim())?;
    let city = resolver::city_by_name(conn, form.city.trim(), state.id)?;
    let values = venue_values(form, city.id);

    let venue = diesel::update(venues::table.find(venue_id))
        .set(&values)
        .returning(Venue::as_returning())
        .get_result(conn)?;

    set_genres(conn, venue.id, &form.genres)?;
    Ok(venue)
}

pub fn delete_venue(conn: &mut SqliteConnection, venue_id: i32) -> Result<(), StoreError> {
    let affected = diesel::delete(venues::table.find(venue_id)).execute(conn)?;
    if affected == 0 {
        return Err(StoreError::NotFound("Venue"));
    }
    Ok(())
}

fn find_venue(conn: &mut SqliteConnection, venue_id: i32) -> Result<Venue, StoreError> {
    venues::table
        .find(venue_id)
        .select(Venue::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound("Venue"))
}

fn venue_values(form: &VenueForm, city_id: i32) -> NewVenue {
    NewVenue {
        name: form.name.clone(),
        address: form.address.clone(),
        phone: form.phone.clone(),
        image_link: form.image_link.clone(),
        facebook_link: form.facebook_link.clone(),
        website: form.website_link.clone(),
        seeking_talent: form.seeking_talent,
        seeking_description: form.seeking_description.clone(),
        city_id,
    }
}

/// Full replacement of the venue's genre set with the resolved list.
fn set_genres(
    conn: &mut SqliteConnection,
    venue_id: i32,
    names: &[String],
) -> Result<(), StoreError> {
    let resolved = resolver::genres_by_name(conn, names)?;

    diesel::delete(venue_genres::table.filter(venue_genres::venue_id.eq(venue_id)))
        .execute(conn)?;

    let links: Vec<NewVenueGenre> = resolved
        .iter()
        .map(|genre| NewVenueGenre {
            venue_id,
            genre_id: genre.id,
        })
        .collect();

    for link in &links {
        diesel::insert_into(venue_genres::table)
            .values(link)
            .on_conflict_do_nothing()
            .execute(conn)?;
    }
    Ok(())
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

fn genre_names(conn: &mut SqliteConnection, venue_id: i32) -> Result<Vec<String>, StoreError> {
    let names = venue_genres::table
        .inner_join(genres::table)
        .filter(venue_genres::venue_id.eq(venue_id))
        .order(genres::name.asc())
        .select(genres::name)
        .load(conn)?;
    Ok(names)
}

fn upcoming_count(
    conn: &mut SqliteConnection,
    venue_id: i32,
    now: NaiveDateTime,
) -> Result<i64, StoreError> {
    let count = shows::table
        .filter(shows::venue_id.eq(venue_id))
        .filter(shows::start_time.gt(now))
        .count()
        .get_result(conn)?;
    Ok(count)
}

/// Shows at this venue split around `now`; a show starting exactly at
/// `now` lands in neither partition.
fn shows_partitioned(
    conn: &mut SqliteConnection,
    venue_id: i32,
    now: NaiveDateTime,
) -> Result<(Vec<VenueShow>, Vec<VenueShow>), StoreError> {
    let rows: Vec<(NaiveDateTime, i32, String, Option<String>)> = shows::table
        .inner_join(artists::table)
        .filter(shows::venue_id.eq(venue_id))
        .order(shows::start_time.asc())
        .select((
            shows::start_time,
            artists::id,
            artists::name,
            artists::image_link,
        ))
        .load(conn)?;

    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for (start_time, artist_id, artist_name, artist_image_link) in rows {
        let entry = VenueShow {
            artist_id,
            artist_name,
            artist_image_link,
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
    use crate::models::show_models::ShowForm;
    use crate::store::show_store;
    use chrono::{Duration, NaiveDate};

    fn venue_form(name: &str) -> VenueForm {
        VenueForm {
            name: name.to_owned(),
            city: "San Francisco".to_owned(),
            state: "California".to_owned(),
            address: Some("1805 Geary Blvd".to_owned()),
            phone: Some("415-000-0000".to_owned()),
            genres: vec!["Rock".to_owned(), "Jazz".to_owned()],
            image_link: None,
            facebook_link: None,
            website_link: None,
            seeking_talent: false,
            seeking_description: None,
        }
    }

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn create_builds_city_state_and_genres() {
        let mut conn = test_conn();

        let venue = create_venue(&mut conn, &venue_form("The Fillmore")).unwrap();
        let detail = get_venue(&mut conn, venue.id, fixed_now()).unwrap();

        assert_eq!(detail.name, "The Fillmore");
        assert_eq!(detail.city, "San Francisco");
        assert_eq!(detail.state, "California");
        assert_eq!(detail.genres, vec!["Jazz", "Rock"]);
    }

    #[test]
    fn create_with_existing_name_replaces_fields() {
        let mut conn = test_conn();

        let first = create_venue(&mut conn, &venue_form("The Fillmore")).unwrap();

        let mut resubmitted = venue_form("The Fillmore");
        resubmitted.phone = Some("415-111-1111".to_owned());
        let second = create_venue(&mut conn, &resubmitted).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.phone.as_deref(), Some("415-111-1111"));

        let total: i64 = venues::table.count().get_result(&mut conn).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn genre_set_is_fully_replaced_on_edit() {
        let mut conn = test_conn();

        let venue = create_venue(&mut conn, &venue_form("The Fillmore")).unwrap();

        let mut edited = venue_form("The Fillmore");
        edited.genres = vec!["Rock".to_owned()];
        update_venue(&mut conn, venue.id, &edited).unwrap();

        let detail = get_venue(&mut conn, venue.id, fixed_now()).unwrap();
        assert_eq!(detail.genres, vec!["Rock"]);
    }

    #[test]
    fn update_by_id_renames_in_place() {
        let mut conn = test_conn();

        let venue = create_venue(&mut conn, &venue_form("The Fillmore")).unwrap();

        let mut renamed = venue_form("The Fillmore West");
        renamed.genres = vec![];
        let updated = update_venue(&mut conn, venue.id, &renamed).unwrap();

        assert_eq!(updated.id, venue.id);
        assert_eq!(updated.name, "The Fillmore West");

        let total: i64 = venues::table.count().get_result(&mut conn).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut conn = test_conn();

        let err = update_venue(&mut conn, 999, &venue_form("Nowhere")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Venue")));
    }

    #[test]
    fn empty_search_term_matches_every_venue() {
        let mut conn = test_conn();

        create_venue(&mut conn, &venue_form("Jazz Club")).unwrap();
        create_venue(&mut conn, &venue_form("Blues Bar")).unwrap();

        let results = search_venues(&mut conn, "", fixed_now()).unwrap();
        assert_eq!(results.count, 2);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut conn = test_conn();

        create_venue(&mut conn, &venue_form("Jazz Club")).unwrap();
        create_venue(&mut conn, &venue_form("Blues Bar")).unwrap();

        let results = search_venues(&mut conn, "jazz", fixed_now()).unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].name, "Jazz Club");
    }

    #[test]
    fn delete_unknown_id_is_not_found_and_leaves_store_unchanged() {
        let mut conn = test_conn();

        create_venue(&mut conn, &venue_form("The Fillmore")).unwrap();

        let err = delete_venue(&mut conn, 999).unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Venue")));

        let total: i64 = venues::table.count().get_result(&mut conn).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn delete_cascades_to_shows_and_genre_links() {
        let mut conn = test_conn();

        let venue = create_venue(&mut conn, &venue_form("The Fillmore")).unwrap();
        let artist = crate::store::artist_store::create_artist(
            &mut conn,
            &crate::models::artist_models::ArtistForm {
                name: "Guns N Petals".to_owned(),
                city: "San Francisco".to_owned(),
                state: "California".to_owned(),
                phone: None,
                genres: vec![],
                image_link: None,
                facebook_link: None,
                website_link: None,
                seeking_venue: false,
                seeking_description: None,
            },
        )
        .unwrap();
        show_store::create_show(
            &mut conn,
            &ShowForm {
                artist_id: artist.id,
                venue_id: venue.id,
                start_time: fixed_now() + Duration::days(30),
            },
        )
        .unwrap();

        delete_venue(&mut conn, venue.id).unwrap();

        let show_count: i64 = shows::table.count().get_result(&mut conn).unwrap();
        let link_count: i64 = venue_genres::table.count().get_result(&mut conn).unwrap();
        assert_eq!(show_count, 0);
        assert_eq!(link_count, 0);
    }

    #[test]
    fn listing_groups_venues_by_city_and_state() {
        let mut conn = test_conn();

        create_venue(&mut conn, &venue_form("The Fillmore")).unwrap();
        let mut ny_form = venue_form("Bowery Ballroom");
        ny_form.city = "New York".to_owned();
        ny_form.state = "New York".to_owned();
        create_venue(&mut conn, &ny_form).unwrap();

        let groups = list_venues(&mut conn, fixed_now()).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].state, "California");
        assert_eq!(groups[0].venues[0].name, "The Fillmore");
        assert_eq!(groups[1].city, "New York");
    }

    #[test]
    fn shows_partition_around_now_with_strict_bounds() {
        let mut conn = test_conn();
        let now = fixed_now();

        let venue = create_venue(&mut conn, &venue_form("The Fillmore")).unwrap();
        let artist = crate::store::artist_store::create_artist(
            &mut conn,
            &crate::models::artist_models::ArtistForm {
                name: "Guns N Petals".to_owned(),
                city: "San Francisco".to_owned(),
                state: "California".to_owned(),
                phone: None,
                genres: vec![],
                image_link: None,
                facebook_link: None,
                website_link: None,
                seeking_venue: false,
                seeking_description: None,
            },
        )
        .unwrap();

        for offset in [-Duration::hours(1), Duration::zero(), Duration::hours(1)] {
            show_store::create_show(
                &mut conn,
                &ShowForm {
                    artist_id: artist.id,
                    venue_id: venue.id,
                    start_time: now + offset,
                },
            )
            .unwrap();
        }

        let detail = get_venue(&mut conn, venue.id, now).unwrap();
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 1);
        assert!(detail.past_shows[0].start_time < now);
        assert!(detail.upcoming_shows[0].start_time > now);
    }
}
