//! Get-or-create lookups for the natural-key entities (states, cities,
//! genres). These run inside the caller's transaction and never commit;
//! the caller owns the transaction boundary.

use diesel::prelude::*;

use crate::error::StoreError;
use crate::models::genre_models::{Genre, NewGenre};
use crate::models::location_models::{City, NewCity, NewState, State};
use crate::schema::{cities, genres, states};

pub fn state_by_name(
    conn: &mut SqliteConnection,
    state_name: &str,
) -> Result<State, StoreError> {
    if let Some(state) = states::table
        .filter(states::name.eq(state_name))
        .select(State::as_select())
        .first(conn)
        .optional()?
    {
        return Ok(state);
    }

    // A concurrent writer may have inserted the same name between the read
    // and this insert; the conflict is absorbed and the re-read wins.
    diesel::insert_into(states::table)
        .values(NewState {
            name: state_name.to_owned(),
        })
        .on_conflict_do_nothing()
        .execute(conn)?;

    let state = states::table
        .filter(states::name.eq(state_name))
        .select(State::as_select())
        .first(conn)?;
    Ok(state)
}

pub fn city_by_name(
    conn: &mut SqliteConnection,
    city_name: &str,
    state_id: i32,
) -> Result<City, StoreError> {
    if let Some(city) = cities::table
        .filter(cities::name.eq(city_name))
        .filter(cities::state_id.eq(state_id))
        .select(City::as_select())
        .first(conn)
        .optional()?
    {
        return Ok(city);
    }

    diesel::insert_into(cities::table)
        .values(NewCity {
            name: city_name.to_owned(),
            state_id,
        })
        .on_conflict_do_nothing()
        .execute(conn)?;

    let city = cities::table
        .filter(cities::name.eq(city_name))
        .filter(cities::state_id.eq(state_id))
        .select(City::as_select())
        .first(conn)?;
    Ok(city)
}

pub fn genre_by_name(
    conn: &mut SqliteConnection,
    genre_name: &str,
) -> Result<Genre, StoreError> {
    if let Some(genre) = genres::table
        .filter(genres::name.eq(genre_name))
        .select(Genre::as_select())
        .first(conn)
        .optional()?
    {
        return Ok(genre);
    }

    diesel::insert_into(genres::table)
        .values(NewGenre {
            name: genre_name.to_owned(),
        })
        .on_conflict_do_nothing()
        .execute(conn)?;

    let genre = genres::table
        .filter(genres::name.eq(genre_name))
        .select(Genre::as_select())
        .first(conn)?;
    Ok(genre)
}

/// Resolve a list of genre names in input order.
pub fn genres_by_name(
    conn: &mut SqliteConnection,
    names: &[String],
) -> Result<Vec<Genre>, StoreError> {
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        resolved.push(genre_by_name(conn, name)?);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_conn;

    #[test]
    fn genre_get_or_create_is_idempotent() {
        let mut conn = test_conn();

        let first = genre_by_name(&mut conn, "Jazz").unwrap();
        let second = genre_by_name(&mut conn, "Jazz").unwrap();

        assert_eq!(first.id, second.id);

        let total: i64 = genres::table.count().get_result(&mut conn).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn city_natural_key_includes_state() {
        let mut conn = test_conn();

        let ny = state_by_name(&mut conn, "New York").unwrap();
        let ca = state_by_name(&mut conn, "California").unwrap();

        let albany_ny = city_by_name(&mut conn, "Albany", ny.id).unwrap();
        let albany_ny_again = city_by_name(&mut conn, "Albany", ny.id).unwrap();
        let albany_ca = city_by_name(&mut conn, "Albany", ca.id).unwrap();

        assert_eq!(albany_ny.id, albany_ny_again.id);
        assert_ne!(albany_ny.id, albany_ca.id);
    }

    #[test]
    fn state_get_or_create_reuses_existing_row() {
        let mut conn = test_conn();

        let a = state_by_name(&mut conn, "California").unwrap();
        let b = state_by_name(&mut conn, "California").unwrap();
        assert_eq!(a.id, b.id);

        let total: i64 = states::table.count().get_result(&mut conn).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn resolver_leaves_nothing_behind_on_rollback() {
        use diesel::Connection;

        let mut conn = test_conn();

        let result: Result<(), StoreError> = conn.transaction(|conn| {
            genre_by_name(conn, "Jazz")?;
            state_by_name(conn, "California")?;
            Err(StoreError::Validation("rejected".to_owned()))
        });
        assert!(result.is_err());

        let genre_count: i64 = genres::table.count().get_result(&mut conn).unwrap();
        let state_count: i64 = states::table.count().get_result(&mut conn).unwrap();
        assert_eq!(genre_count, 0);
        assert_eq!(state_count, 0);
    }
}
