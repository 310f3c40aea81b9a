pub mod country;
pub mod genre;
pub mod martial_art;
pub mod movie;
pub mod movie_country;
pub mod movie_genre;
pub mod movie_martial_art;
