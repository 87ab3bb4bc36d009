use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::Serialize;

use crate::schema::{artist_genres, genres, venue_genres};

#[derive(Queryable, Selectable, Serialize, Debug)]
#[diesel(table_name = genres)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = genres)]
pub struct NewGenre {
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = venue_genres)]
pub struct NewVenueGenre {
    pub venue_id: i32,
    pub genre_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = artist_genres)]
pub struct NewArtistGenre {
    pub artist_id: i32,
    pub genre_id: i32,
}
