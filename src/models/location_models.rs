use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::Serialize;

use crate::schema::{cities, states};

#[derive(Queryable, Selectable, Serialize, Debug)]
#[diesel(table_name = states)]
pub struct State {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = states)]
pub struct NewState {
    pub name: String,
}

#[derive(Queryable, Selectable, Serialize, Debug)]
#[diesel(table_name = cities)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub state_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = cities)]
pub struct NewCity {
    pub name: String,
    pub state_id: i32,
}
