pub mod artist_models;
pub mod genre_models;
pub mod location_models;
pub mod search_models;
pub mod show_models;
pub mod venue_models;
