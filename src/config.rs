use std::{env, net::SocketAddr};

use crate::error::{invalid_input_error, Error};
use crate::matching::MatchCriteria;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Rest,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub listen_addr: SocketAddr,
    pub store: StoreKind,
    pub criteria: MatchCriteria,
}

impl Config {
    /// Reads `CARONA_*` variables, after loading a `.env` file if there is one.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let api_url = lookup("CARONA_API_URL").unwrap_or_else(|| "http://localhost:3000".into());

        let listen_addr = lookup("CARONA_LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".into())
            .parse()?;

        let store = match lookup("CARONA_STORE").as_deref() {
            None | Some("rest") => StoreKind::Rest,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(invalid_input_error(format!(
                    "CARONA_STORE must be rest or memory, got {}",
                    other
                )))
            }
        };

        let mut criteria = MatchCriteria::default();

        if let Some(radius) = lookup("CARONA_MATCH_RADIUS_KM") {
            criteria.radius_km = radius
                .parse()
                .map_err(|_| invalid_input_error("CARONA_MATCH_RADIUS_KM must be a number"))?;
        }

        if let Some(window) = lookup("CARONA_MATCH_WINDOW_MINUTES") {
            criteria.window_minutes = window
                .parse()
                .map_err(|_| invalid_input_error("CARONA_MATCH_WINDOW_MINUTES must be an integer"))?;
        }

        Ok(Self {
            api_url,
            listen_addr,
            store,
            criteria,
        })
    }
}
