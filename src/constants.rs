pub mod artwork {

    /// FanArt season value meaning "applies to every season".
    pub const ALL_SEASONS: &str = "all";
}

pub mod episodes {

    /// Minimum digits for the season and number parts of an episode code.
    pub const CODE_WIDTH: usize = 2;
}

pub mod limits {

    pub const DEFAULT_UPSERT_CHUNK_SIZE: usize = 500;
}

pub mod http {

    pub const USER_AGENT: &str = concat!("lundflix/", env!("CARGO_PKG_VERSION"));
}
