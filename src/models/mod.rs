pub mod episode;
pub mod media;
