use chrono::NaiveDateTime;
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::schema::shows;

#[derive(Queryable, Selectable, Serialize, Debug)]
#[diesel(table_name = shows)]
pub struct Show {
    pub id: i32,
    pub start_time: NaiveDateTime,
    pub artist_id: i32,
    pub venue_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = shows)]
pub struct NewShow {
    pub start_time: NaiveDateTime,
    pub artist_id: i32,
    pub venue_id: i32,
}

#[derive(Deserialize)]
pub struct ShowForm {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: NaiveDateTime,
}

#[derive(Serialize)]
pub struct ShowListing {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}
