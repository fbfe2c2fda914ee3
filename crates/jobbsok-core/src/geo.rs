//! Municipality-to-city-name expansion table.
//!
//! Job posts record their location as free-text `Sted` definition
//! values ("Oslo", "5003 Bergen", ...). Search requests instead carry
//! county-level municipality tokens. This table maps a normalized
//! token to the literal place-name substrings to look for.
//!
//! The table is an injected, read-only dependency constructed once at
//! startup, not a process-wide global.

use std::collections::HashMap;

use crate::error::AppError;

/// Lowercases a municipality token and strips all spaces.
///
/// Applied to both user tokens and table keys so multi-word counties
/// ("møre og romsdal") resolve regardless of spacing.
pub fn normalize_token(token: &str) -> String {
    token.to_lowercase().replace(' ', "")
}

/// Read-only municipality → place-name lookup table.
#[derive(Debug, Clone)]
pub struct GeoTable {
    entries: HashMap<String, Vec<String>>,
}

impl GeoTable {
    /// Builds a table from (municipality, place names) pairs.
    ///
    /// Keys are normalized on insertion with the same function used on
    /// lookup tokens.
    pub fn from_entries<K, P>(entries: impl IntoIterator<Item = (K, Vec<P>)>) -> Self
    where
        K: AsRef<str>,
        P: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, places)| {
                (
                    normalize_token(key.as_ref()),
                    places.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// The Norwegian county table used in production.
    pub fn norwegian() -> Self {
        Self::from_entries([
            ("oslo", vec!["Oslo"]),
            (
                "akershus",
                vec!["Askim", "Drøbak", "Halden", "Lillestrøm", "Moss", "Ski", "Ås"],
            ),
            (
                "buskerud",
                vec!["Drammen", "Hokksund", "Kongsberg", "Mjøndalen", "Øvre Eiker"],
            ),
            ("østfold", vec!["Fredrikstad", "Halden", "Moss", "Sarpsborg"]),
            (
                "innlandet",
                vec![
                    "Hamar",
                    "Gjøvik",
                    "Lillehammer",
                    "Kongsvinger",
                    "Elverum",
                    "Alvdal",
                    "Brumunddal",
                    "Fagernes",
                    "Otta",
                    "Rena",
                    "Trysil",
                ],
            ),
            (
                "vestfold og telemark",
                vec![
                    "Tønsberg",
                    "Sandefjord",
                    "Larvik",
                    "Skien",
                    "Porsgrunn",
                    "Brevik",
                    "Flekkefjord",
                    "Grimstad",
                    "Kragerø",
                    "Notodden",
                    "Stathelle",
                ],
            ),
            (
                "agder",
                vec![
                    "Kristiansand",
                    "Arendal",
                    "Grimstad",
                    "Mandal",
                    "Flekkefjord",
                    "Risør",
                    "Tvedestrand",
                ],
            ),
            (
                "rogaland",
                vec!["Stavanger", "Sandnes", "Haugesund", "Bryne", "Egersund", "Eigersund"],
            ),
            (
                "vestland",
                vec![
                    "Bergen", "Florø", "Førde", "Kvam", "Leirvik", "Måløy", "Sogndal", "Stryn",
                    "Ulsteinvik", "Voss",
                ],
            ),
            (
                "møre og romsdal",
                vec!["Ålesund", "Kristiansund", "Molde", "Ulsteinvik"],
            ),
            (
                "trøndelag",
                vec![
                    "Brekstad",
                    "Heimdal",
                    "Levanger",
                    "Namsos",
                    "Steinkjer",
                    "Stjørdalshalsen",
                    "Trondheim",
                ],
            ),
            (
                "nordland",
                vec!["Bodø", "Mo i Rana", "Narvik", "Sandnessjøen", "Svolvær"],
            ),
            (
                "troms og finnmark",
                vec!["Alta", "Hammerfest", "Harstad", "Kirkenes", "Tromsø", "Vadsø"],
            ),
        ])
    }

    /// Expands one municipality token into its place-name substrings.
    ///
    /// Unknown tokens are a data gap and fail the request rather than
    /// silently matching nothing.
    pub fn expand(&self, token: &str) -> Result<&[String], AppError> {
        let normalized = normalize_token(token);
        self.entries
            .get(&normalized)
            .map(Vec::as_slice)
            .ok_or(AppError::UnknownMunicipality(normalized))
    }

    /// Expands a comma-separated municipality list, one place-name
    /// group per token. Blank segments are ignored.
    pub fn expand_csv(&self, csv: &str) -> Result<Vec<Vec<String>>, AppError> {
        csv.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| self.expand(token).map(<[String]>::to_vec))
            .collect()
    }
}
